//! Plain-text output.
//!
//! Amounts go through `format_amount`, so non-finite values print as "n/a".

use chrono::Month;
use chrono_tz::Tz;
use onchaincounting_core::expense::Expense;
use onchaincounting_core::invoice::Invoice;
use onchaincounting_core::order::{Balance, OrderYearGroup, SyncStatus};
use onchaincounting_core::reports::{
    Dashboard, InvoiceMonthGroup, InvoiceTotals, TaxReport, YearlySummary, format_amount,
};
use onchaincounting_core::withdrawal::Withdrawal;

/// English name of a 0-based month index.
pub fn month_name(index: usize) -> &'static str {
    u8::try_from(index + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("?", |m| m.name())
}

pub fn dashboard(dashboard: &Dashboard) {
    let summary = &dashboard.summary;
    println!("Year {}", summary.year);
    invoice_totals(&summary.invoices);
    println!(
        "Off-ramps: {} totalling EUR {}",
        summary.offramps.count,
        format_amount(summary.offramps.total_eur_amount)
    );
    println!();
    println!(
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14}",
        "Month", "USD", "CHF", "EUR", "Off-ramp", "Cumulative", "Cum. off-ramp"
    );
    for month in &dashboard.months {
        println!(
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>14} {:>14}",
            month_name(month.month),
            format_amount(month.invoices_usd),
            format_amount(month.invoices_chf),
            format_amount(month.invoices_eur),
            format_amount(month.offramps_eur),
            format_amount(month.cumulative_eur),
            format_amount(month.cumulative_offramp_eur),
        );
    }
}

fn invoice_totals(totals: &InvoiceTotals) {
    println!("Invoices: {}", totals.count);
    println!(
        "  USD  before {}  after {}  VAT {}",
        format_amount(totals.total_before_tax_usd_amount),
        format_amount(totals.total_after_tax_usd_amount),
        format_amount(totals.total_vat_usd_amount)
    );
    println!(
        "  CHF  before {}  after {}  VAT {}",
        format_amount(totals.total_before_tax_chf_amount),
        format_amount(totals.total_after_tax_chf_amount),
        format_amount(totals.total_vat_chf_amount)
    );
    println!(
        "  EUR  before {}  after {}  VAT {}",
        format_amount(totals.total_before_tax_eur_amount),
        format_amount(totals.total_after_tax_eur_amount),
        format_amount(totals.total_vat_eur_amount)
    );
}

pub fn tax_report(report: &TaxReport) {
    println!("Tax report {}", report.year);
    println!();
    println!("Income");
    println!("  Invoices            {}", report.income.invoice_count);
    println!("  Total (EUR)         {}", format_amount(report.income.total_eur));
    println!("  VAT collected (EUR) {}", format_amount(report.income.total_vat_eur));
    println!();
    println!("Expenses");
    println!("  USD                 {}", format_amount(report.expenses.total_usd));
    println!("  EUR                 {}", format_amount(report.expenses.total_eur));
    println!(
        "  Deductible VAT      {} ({}% of deductible expenses)",
        format_amount(report.expenses.vat_deductible),
        report.deductible_vat_percent
    );
    println!();
    println!("Withdrawals");
    let withdrawals = &report.withdrawals;
    println!("  Sent (USD)          {}", format_amount(withdrawals.total_source_usd));
    println!("  Received (EUR)      {}", format_amount(withdrawals.total_target_eur));
    println!(
        "  Average rate        {}",
        format_amount(withdrawals.average_exchange_rate)
    );
    for line in &withdrawals.lines {
        println!(
            "    {}  {:>12} -> {:>12}  expected {:>12}  slippage {:>10}",
            line.date.format("%Y-%m-%d"),
            format_amount(line.source_amount),
            format_amount(line.target_amount),
            format_amount(line.expected_target_amount),
            format_amount(line.slippage)
        );
    }
    println!(
        "  Total slippage      {}",
        format_amount(withdrawals.total_slippage)
    );
    println!();
    println!("Summary");
    println!("  Net income (EUR)    {}", format_amount(report.summary.net_income_eur));
    println!(
        "  Exchange P/L (EUR)  {}",
        format_amount(report.summary.net_exchange_profit_loss)
    );
    println!("  VAT payable (EUR)   {}", format_amount(report.summary.vat_payable));
}

pub fn invoices(invoices: &[Invoice], tz: Tz) {
    for invoice in invoices {
        invoice_line(invoice, tz);
    }
}

fn invoice_line(invoice: &Invoice, tz: Tz) {
    println!(
        "{}  {}  {:<16} {:<24} {} {:>12}  EUR {:>12}",
        invoice.id,
        invoice.date.with_timezone(&tz).format("%Y-%m-%d"),
        invoice.invoice_number,
        invoice.client_name,
        invoice.currency,
        format_amount(invoice.after_tax_amount),
        format_amount(invoice.after_tax_eur_amount)
    );
}

pub fn invoice_months(groups: &[InvoiceMonthGroup], tz: Tz) {
    for group in groups {
        println!("{}", month_name(group.month));
        for invoice in &group.invoices {
            invoice_line(invoice, tz);
        }
        println!(
            "  {} invoices, EUR {} (VAT {})",
            group.totals.count,
            format_amount(group.totals.total_after_tax_eur_amount),
            format_amount(group.totals.total_vat_eur_amount)
        );
    }
}

pub fn expenses(expenses: &[Expense], tz: Tz) {
    for expense in expenses {
        println!(
            "{}  {}  {:<12} {:<32} {} {:>12}{}",
            expense.id,
            expense.date.with_timezone(&tz).format("%Y-%m-%d"),
            expense.category,
            expense.description,
            expense.currency,
            format_amount(expense.amount),
            if expense.vat_deductible { "  VAT" } else { "" }
        );
    }
}

pub fn withdrawals(withdrawals: &[Withdrawal], tz: Tz) {
    for withdrawal in withdrawals {
        println!(
            "{}  {}  {:>12} {} on {}  ->  EUR {:>12}  ({})",
            withdrawal.id,
            withdrawal.date.with_timezone(&tz).format("%Y-%m-%d"),
            format_amount(withdrawal.source_amount),
            withdrawal.source_currency,
            withdrawal.source_network,
            format_amount(withdrawal.target_amount),
            withdrawal.status
        );
    }
}

pub fn order_groups(groups: &[OrderYearGroup], tz: Tz) {
    for year in groups {
        println!("{}", year.year);
        for month in &year.months {
            println!("  {}", month_name(month.month as usize));
            for order in &month.orders {
                let name = order
                    .counterpart
                    .details
                    .name
                    .as_deref()
                    .unwrap_or("-");
                println!(
                    "    {}  {:<6} EUR {:>12}  {:<10} {}  {}",
                    order.effective_at().with_timezone(&tz).format("%Y-%m-%d"),
                    order.kind,
                    format_amount(order.amount),
                    order.meta.state,
                    name,
                    order.memo.as_deref().unwrap_or("")
                );
            }
        }
    }
}

pub fn balances(balances: &[Balance]) {
    for balance in balances {
        println!(
            "  {} {}{}",
            format_amount(balance.amount),
            balance.currency,
            balance
                .chain
                .as_deref()
                .map(|c| format!(" on {c}"))
                .unwrap_or_default()
        );
    }
}

pub fn sync_status(status: &SyncStatus) {
    match status.last_synced {
        Some(at) => println!("Last synced {}", at.to_rfc3339()),
        None => println!("Never synced"),
    }
}

pub fn yearly_summary(summary: &YearlySummary) {
    println!(
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Month", "USD", "CHF", "EUR", "VAT", "Expenses", "Withdrawn", "P/L"
    );
    for month in &summary.monthly_summaries {
        println!(
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            month_name(month.month.saturating_sub(1) as usize),
            format_amount(month.total_invoiced_usd),
            format_amount(month.total_invoiced_chf),
            format_amount(month.total_invoiced_eur),
            format_amount(month.total_vat_collected_eur),
            format_amount(month.total_expenses_eur),
            format_amount(month.total_withdrawals_eur),
            format_amount(month.profit_loss_eur),
        );
    }
    println!(
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        summary.year,
        format_amount(summary.total_invoiced_usd),
        format_amount(summary.total_invoiced_chf),
        format_amount(summary.total_invoiced_eur),
        format_amount(summary.total_vat_collected_eur),
        format_amount(summary.total_expenses_eur),
        format_amount(summary.total_withdrawals_eur),
        format_amount(summary.profit_loss_eur),
    );
}
