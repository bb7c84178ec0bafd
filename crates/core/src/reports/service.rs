//! Period aggregation.
//!
//! Every function here is pure: it takes a reporting year and the raw
//! entity collections, filters them to the year and folds them into
//! summaries. Callers re-invoke after any data change. Totals are summed in
//! input order without intermediate rounding, so identical input yields
//! bit-identical output, non-finite values included.

use crate::currency::{Currency, ExpenseCurrency};
use crate::expense::Expense;
use crate::fiscal::ReportingYear;
use crate::invoice::Invoice;
use crate::withdrawal::Withdrawal;

use super::offramp::Offramp;
use super::types::{
    Dashboard, ExpenseSection, IncomeSection, InvoiceMonthGroup, InvoiceTotals, MonthSummary,
    MonthlySummary, OfframpTotals, SlippageLine, TaxReport, TaxSummary, VatPolicy,
    WithdrawalSection, YearSummary, YearlySummary,
};

/// Service for dashboard and tax report aggregation.
pub struct ReportService;

impl ReportService {
    /// Totals for the year, bucketed by native currency.
    #[must_use]
    pub fn year_summary<O: Offramp>(
        year: &ReportingYear,
        invoices: &[Invoice],
        offramps: &[O],
    ) -> YearSummary {
        let mut invoice_totals = InvoiceTotals::default();
        for invoice in invoices.iter().filter(|i| year.contains(i.date)) {
            invoice_totals.add(invoice);
        }

        let mut offramp_totals = OfframpTotals::default();
        for offramp in Self::offramps_in(year, offramps) {
            offramp_totals.count += 1;
            offramp_totals.total_eur_amount += offramp.offramp_eur();
        }

        YearSummary {
            year: year.year(),
            invoices: invoice_totals,
            offramps: offramp_totals,
        }
    }

    /// Twelve monthly totals with running cumulative EUR totals.
    ///
    /// Monthly sums are filled first; cumulative totals are computed in a
    /// second pass in ascending month order.
    #[must_use]
    pub fn month_summaries<O: Offramp>(
        year: &ReportingYear,
        invoices: &[Invoice],
        offramps: &[O],
    ) -> [MonthSummary; 12] {
        let mut months: [MonthSummary; 12] = std::array::from_fn(|month| MonthSummary {
            month,
            ..MonthSummary::default()
        });

        for invoice in invoices {
            let Some(m) = year.month_index(invoice.date) else {
                continue;
            };
            let month = &mut months[m];
            match invoice.currency {
                Currency::Usd => month.invoices_usd += invoice.after_tax_amount,
                Currency::Chf => month.invoices_chf += invoice.after_tax_amount,
            }
            month.invoices_eur += invoice.after_tax_eur_amount;
        }

        for offramp in offramps.iter().filter(|o| o.is_offramp()) {
            if let Some(m) = year.month_index(offramp.effective_at()) {
                months[m].offramps_eur += offramp.offramp_eur();
            }
        }

        let mut running_eur = 0.0;
        let mut running_offramp_eur = 0.0;
        for month in &mut months {
            running_eur += month.invoices_eur;
            running_offramp_eur += month.offramps_eur;
            month.cumulative_eur = running_eur;
            month.cumulative_offramp_eur = running_offramp_eur;
        }

        months
    }

    /// Year summary and month series together.
    #[must_use]
    pub fn dashboard<O: Offramp>(
        year: &ReportingYear,
        invoices: &[Invoice],
        offramps: &[O],
    ) -> Dashboard {
        Dashboard {
            summary: Self::year_summary(year, invoices, offramps),
            months: Self::month_summaries(year, invoices, offramps),
        }
    }

    /// Invoices grouped by month, non-empty months only, newest month first.
    #[must_use]
    pub fn invoice_months(year: &ReportingYear, invoices: &[Invoice]) -> Vec<InvoiceMonthGroup> {
        let mut groups: Vec<InvoiceMonthGroup> = (0..12)
            .map(|month| InvoiceMonthGroup {
                month,
                invoices: Vec::new(),
                totals: InvoiceTotals::default(),
            })
            .collect();

        for invoice in invoices {
            if let Some(m) = year.month_index(invoice.date) {
                groups[m].totals.add(invoice);
                groups[m].invoices.push(invoice.clone());
            }
        }

        groups.retain(|g| !g.invoices.is_empty());
        groups.reverse();
        groups
    }

    /// Tax and profit/loss report for the year.
    ///
    /// The average withdrawal rate is total EUR received over USD-pegged
    /// tokens sent. Slippage is measured against that average for each
    /// USD-pegged withdrawal.
    #[must_use]
    pub fn tax_report(
        year: &ReportingYear,
        invoices: &[Invoice],
        expenses: &[Expense],
        withdrawals: &[Withdrawal],
        policy: VatPolicy,
    ) -> TaxReport {
        let mut income = IncomeSection::default();
        for invoice in invoices.iter().filter(|i| year.contains(i.date)) {
            income.invoice_count += 1;
            income.total_eur += invoice.after_tax_eur_amount;
            income.total_vat_eur += invoice.vat_eur_amount;
        }

        let mut expense_section = ExpenseSection::default();
        for expense in expenses.iter().filter(|e| year.contains(e.date)) {
            match expense.currency {
                ExpenseCurrency::Usd => expense_section.total_usd += expense.amount,
                ExpenseCurrency::Eur => expense_section.total_eur += expense.amount,
            }
            if expense.vat_deductible {
                expense_section.vat_deductible +=
                    expense.amount * policy.deductible_percent / 100.0;
            }
        }

        let withdrawal_section = Self::withdrawal_section(year, withdrawals);

        let summary = TaxSummary {
            net_income_eur: income.total_eur - expense_section.total_eur,
            net_exchange_profit_loss: withdrawal_section.total_slippage,
            vat_payable: income.total_vat_eur - expense_section.vat_deductible,
        };

        TaxReport {
            year: year.year(),
            deductible_vat_percent: policy.deductible_percent,
            income,
            expenses: expense_section,
            withdrawals: withdrawal_section,
            summary,
        }
    }

    /// Snapshot rows in the persisted summary shape, months 1-12.
    #[must_use]
    pub fn ledger_summary(
        year: &ReportingYear,
        invoices: &[Invoice],
        expenses: &[Expense],
        withdrawals: &[Withdrawal],
    ) -> YearlySummary {
        let mut months: Vec<MonthlySummary> = (1..=12)
            .map(|month| MonthlySummary {
                year: year.year(),
                month,
                ..MonthlySummary::default()
            })
            .collect();

        for invoice in invoices {
            let Some(m) = year.month_index(invoice.date) else {
                continue;
            };
            let row = &mut months[m];
            match invoice.currency {
                Currency::Usd => row.total_invoiced_usd += invoice.after_tax_amount,
                Currency::Chf => row.total_invoiced_chf += invoice.after_tax_amount,
            }
            row.total_invoiced_eur += invoice.after_tax_eur_amount;
            row.total_vat_collected_eur += invoice.vat_eur_amount;
        }

        for expense in expenses {
            if expense.currency != ExpenseCurrency::Eur {
                continue;
            }
            if let Some(m) = year.month_index(expense.date) {
                months[m].total_expenses_eur += expense.amount;
            }
        }

        for withdrawal in withdrawals {
            if let Some(m) = year.month_index(withdrawal.date) {
                months[m].total_withdrawals_eur += withdrawal.target_amount;
            }
        }

        for row in &mut months {
            row.profit_loss_eur =
                row.total_invoiced_eur - row.total_vat_collected_eur - row.total_expenses_eur;
        }

        let sum = |field: fn(&MonthlySummary) -> f64| months.iter().map(field).sum::<f64>();
        let mut yearly = YearlySummary {
            year: year.year(),
            monthly_summaries: Vec::new(),
            total_invoiced_usd: sum(|m| m.total_invoiced_usd),
            total_invoiced_chf: sum(|m| m.total_invoiced_chf),
            total_invoiced_eur: sum(|m| m.total_invoiced_eur),
            total_vat_collected_eur: sum(|m| m.total_vat_collected_eur),
            total_expenses_eur: sum(|m| m.total_expenses_eur),
            total_withdrawals_eur: sum(|m| m.total_withdrawals_eur),
            profit_loss_eur: sum(|m| m.profit_loss_eur),
        };
        yearly.monthly_summaries = months;
        yearly
    }

    fn offramps_in<'a, O: Offramp>(
        year: &'a ReportingYear,
        offramps: &'a [O],
    ) -> impl Iterator<Item = &'a O> {
        offramps
            .iter()
            .filter(|o| o.is_offramp() && year.contains(o.effective_at()))
    }

    fn withdrawal_section(year: &ReportingYear, withdrawals: &[Withdrawal]) -> WithdrawalSection {
        let in_year: Vec<&Withdrawal> = withdrawals
            .iter()
            .filter(|w| year.contains(w.date))
            .collect();

        let total_source_usd: f64 = in_year
            .iter()
            .filter(|w| w.source_currency.is_usd_pegged())
            .map(|w| w.source_amount)
            .sum();
        let total_target_eur: f64 = in_year.iter().map(|w| w.target_amount).sum();
        let average_exchange_rate = total_target_eur / total_source_usd;

        let lines: Vec<SlippageLine> = in_year
            .iter()
            .filter(|w| w.source_currency.is_usd_pegged())
            .map(|w| {
                let expected_target_amount = w.source_amount * average_exchange_rate;
                SlippageLine {
                    withdrawal_id: w.id,
                    date: w.date,
                    source_amount: w.source_amount,
                    target_amount: w.target_amount,
                    expected_target_amount,
                    slippage: w.target_amount - expected_target_amount,
                }
            })
            .collect();
        let total_slippage = lines.iter().map(|l| l.slippage).sum();

        WithdrawalSection {
            total_source_usd,
            total_target_eur,
            average_exchange_rate,
            lines,
            total_slippage,
        }
    }
}

/// Formats an amount for display with two decimals; non-finite values
/// render as `n/a`.
#[must_use]
pub fn format_amount(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "n/a".to_string()
    }
}
