//! Report data types.

use chrono::{DateTime, Utc};
use onchaincounting_shared::types::WithdrawalId;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::invoice::Invoice;

/// Invoice totals bucketed by native currency, plus EUR totals across all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Number of invoices.
    pub count: usize,
    /// USD before tax.
    pub total_before_tax_usd_amount: f64,
    /// USD after tax.
    pub total_after_tax_usd_amount: f64,
    /// USD VAT.
    pub total_vat_usd_amount: f64,
    /// CHF before tax.
    pub total_before_tax_chf_amount: f64,
    /// CHF after tax.
    pub total_after_tax_chf_amount: f64,
    /// CHF VAT.
    pub total_vat_chf_amount: f64,
    /// EUR before tax.
    pub total_before_tax_eur_amount: f64,
    /// EUR after tax.
    pub total_after_tax_eur_amount: f64,
    /// EUR VAT.
    pub total_vat_eur_amount: f64,
}

impl InvoiceTotals {
    pub(crate) fn add(&mut self, invoice: &Invoice) {
        self.count += 1;
        match invoice.currency {
            Currency::Usd => {
                self.total_before_tax_usd_amount += invoice.before_tax_amount;
                self.total_after_tax_usd_amount += invoice.after_tax_amount;
                self.total_vat_usd_amount += invoice.vat_amount;
            }
            Currency::Chf => {
                self.total_before_tax_chf_amount += invoice.before_tax_amount;
                self.total_after_tax_chf_amount += invoice.after_tax_amount;
                self.total_vat_chf_amount += invoice.vat_amount;
            }
        }
        self.total_before_tax_eur_amount += invoice.before_tax_eur_amount;
        self.total_after_tax_eur_amount += invoice.after_tax_eur_amount;
        self.total_vat_eur_amount += invoice.vat_eur_amount;
    }
}

/// Off-ramp totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfframpTotals {
    /// Number of off-ramps.
    pub count: usize,
    /// EUR received.
    pub total_eur_amount: f64,
}

/// Year totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearSummary {
    /// Calendar year.
    pub year: i32,
    /// Invoice totals.
    pub invoices: InvoiceTotals,
    /// Off-ramp totals.
    pub offramps: OfframpTotals,
}

/// One month of the dashboard series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// Month index, 0-11.
    pub month: usize,
    /// USD invoiced after tax.
    pub invoices_usd: f64,
    /// CHF invoiced after tax.
    pub invoices_chf: f64,
    /// EUR invoiced after tax.
    pub invoices_eur: f64,
    /// EUR received through off-ramps.
    pub offramps_eur: f64,
    /// Running EUR invoiced total up to and including this month.
    pub cumulative_eur: f64,
    /// Running off-ramp total up to and including this month.
    pub cumulative_offramp_eur: f64,
}

/// Dashboard view model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Year totals.
    pub summary: YearSummary,
    /// Twelve months, January first.
    pub months: [MonthSummary; 12],
}

/// Invoices of one month with their totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceMonthGroup {
    /// Month index, 0-11.
    pub month: usize,
    /// Invoices in input order.
    pub invoices: Vec<Invoice>,
    /// Totals over `invoices`.
    pub totals: InvoiceTotals,
}

/// How input VAT on expenses is estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VatPolicy {
    /// Percentage of a deductible expense's amount treated as VAT.
    pub deductible_percent: f64,
}

impl Default for VatPolicy {
    fn default() -> Self {
        Self {
            deductible_percent: 20.0,
        }
    }
}

/// Income section of the tax report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSection {
    /// Number of invoices.
    pub invoice_count: usize,
    /// EUR invoiced after tax.
    pub total_eur: f64,
    /// EUR VAT collected.
    pub total_vat_eur: f64,
}

/// Expense section of the tax report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSection {
    /// Expenses paid in USD.
    pub total_usd: f64,
    /// Expenses paid in EUR.
    pub total_eur: f64,
    /// Estimated deductible input VAT.
    pub vat_deductible: f64,
}

/// Per-withdrawal deviation from the average rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageLine {
    /// Withdrawal ID.
    pub withdrawal_id: WithdrawalId,
    /// Execution date.
    pub date: DateTime<Utc>,
    /// Tokens sent.
    pub source_amount: f64,
    /// EUR received.
    pub target_amount: f64,
    /// EUR the average rate would have produced.
    pub expected_target_amount: f64,
    /// `target_amount - expected_target_amount`.
    pub slippage: f64,
}

/// Withdrawal section of the tax report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalSection {
    /// USD-pegged tokens sent.
    pub total_source_usd: f64,
    /// EUR received across all withdrawals.
    pub total_target_eur: f64,
    /// `total_target_eur / total_source_usd`; non-finite when nothing was sent.
    pub average_exchange_rate: f64,
    /// One line per USD-pegged withdrawal.
    pub lines: Vec<SlippageLine>,
    /// Sum of line slippage.
    pub total_slippage: f64,
}

/// Bottom line of the tax report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSummary {
    /// EUR income after tax minus EUR expenses.
    pub net_income_eur: f64,
    /// Exchange gain or loss on withdrawals.
    pub net_exchange_profit_loss: f64,
    /// VAT collected minus deductible VAT.
    pub vat_payable: f64,
}

/// Yearly tax and profit/loss report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxReport {
    /// Calendar year.
    pub year: i32,
    /// Percentage used for deductible VAT.
    pub deductible_vat_percent: f64,
    /// Income.
    pub income: IncomeSection,
    /// Expenses.
    pub expenses: ExpenseSection,
    /// Withdrawals.
    pub withdrawals: WithdrawalSection,
    /// Bottom line.
    pub summary: TaxSummary,
}

/// Persisted monthly snapshot row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// USD invoiced after tax.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_invoiced_usd: f64,
    /// CHF invoiced after tax.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_invoiced_chf: f64,
    /// EUR invoiced after tax.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_invoiced_eur: f64,
    /// EUR VAT collected.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_vat_collected_eur: f64,
    /// EUR expenses.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_expenses_eur: f64,
    /// EUR received through withdrawals.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_withdrawals_eur: f64,
    /// `total_invoiced_eur - total_vat_collected_eur - total_expenses_eur`.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub profit_loss_eur: f64,
}

/// Persisted yearly snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    /// Calendar year.
    pub year: i32,
    /// Twelve rows, January first.
    pub monthly_summaries: Vec<MonthlySummary>,
    /// USD invoiced after tax.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_invoiced_usd: f64,
    /// CHF invoiced after tax.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_invoiced_chf: f64,
    /// EUR invoiced after tax.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_invoiced_eur: f64,
    /// EUR VAT collected.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_vat_collected_eur: f64,
    /// EUR expenses.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_expenses_eur: f64,
    /// EUR received through withdrawals.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub total_withdrawals_eur: f64,
    /// Year profit or loss in EUR.
    #[serde(deserialize_with = "crate::currency::conversion::amount_or_nan")]
    pub profit_loss_eur: f64,
}
