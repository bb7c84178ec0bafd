//! Property-based tests for reports module.

use chrono::{DateTime, TimeZone, Utc};
use onchaincounting_shared::types::{ExpenseId, InvoiceId, WithdrawalId};
use proptest::prelude::*;

use super::service::{ReportService, format_amount};
use super::types::{MonthSummary, VatPolicy};
use crate::currency::{BlockchainNetwork, CryptoCurrency, Currency, ExpenseCurrency};
use crate::expense::{Expense, ExpenseCategory, ExpenseDraft};
use crate::fiscal::ReportingYear;
use crate::invoice::{Invoice, InvoiceDraft, InvoiceService};
use crate::order::{
    Counterpart, CounterpartDetails, CounterpartIdentifier, Order, OrderKind, OrderMeta,
    OrderState,
};
use crate::withdrawal::{Withdrawal, WithdrawalDraft, WithdrawalStatus};

fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
}

fn year(y: i32) -> ReportingYear {
    ReportingYear::new(y, chrono_tz::UTC).unwrap()
}

fn invoice(
    date: DateTime<Utc>,
    currency: Currency,
    before: f64,
    after: f64,
    rate: f64,
) -> Invoice {
    let draft = InvoiceDraft {
        invoice_number: "INV-1".to_string(),
        date: Some(date),
        client_name: "Client".to_string(),
        currency: Some(currency),
        after_tax_amount: Some(after),
        before_tax_amount: Some(before),
        exchange_rate: Some(rate),
        vat_rate: Some(20.0),
        ..InvoiceDraft::default()
    };
    InvoiceService::create(draft, InvoiceId::new(), date).unwrap()
}

fn order(kind: OrderKind, amount: f64, placed: DateTime<Utc>, approved: Option<DateTime<Utc>>) -> Order {
    Order {
        id: format!("ord-{}", placed.timestamp()),
        kind,
        amount,
        counterpart: Counterpart {
            identifier: CounterpartIdentifier::Iban {
                iban: "DE00".to_string(),
            },
            details: CounterpartDetails::default(),
        },
        memo: None,
        meta: OrderMeta {
            state: OrderState::Processed,
            placed_at: placed,
            approved_at: approved,
        },
        last_synced: None,
    }
}

fn withdrawal(
    date: DateTime<Utc>,
    currency: CryptoCurrency,
    source: f64,
    target: f64,
) -> Withdrawal {
    let draft = WithdrawalDraft {
        date,
        source_amount: source,
        source_currency: currency,
        source_network: BlockchainNetwork::Gnosis,
        target_amount: target,
        exchange_rate: target / source,
        transaction_hash: None,
        status: WithdrawalStatus::Completed,
        external_reference: None,
        notes: None,
    };
    Withdrawal::create(draft, WithdrawalId::new(), date)
}

fn expense(date: DateTime<Utc>, amount: f64, currency: ExpenseCurrency, deductible: bool) -> Expense {
    let draft = ExpenseDraft {
        date,
        category: ExpenseCategory::Service,
        description: "hosting".to_string(),
        amount,
        currency,
        vat_deductible: deductible,
        receipt: None,
        notes: None,
    };
    Expense::create(draft, ExpenseId::new(), date)
}

fn month_bits(months: &[MonthSummary; 12]) -> Vec<u64> {
    months
        .iter()
        .flat_map(|m| {
            [
                m.invoices_usd,
                m.invoices_chf,
                m.invoices_eur,
                m.offramps_eur,
                m.cumulative_eur,
                m.cumulative_offramp_eur,
            ]
        })
        .map(f64::to_bits)
        .collect()
}

fn arb_invoice() -> impl Strategy<Value = Invoice> {
    (
        1u32..=12,
        1u32..=28,
        any::<bool>(),
        0.0f64..1_000_000.0,
        0.0f64..0.3,
        0.5f64..2.0,
    )
        .prop_map(|(month, day, usd, before, vat, rate)| {
            let currency = if usd { Currency::Usd } else { Currency::Chf };
            invoice(
                at(2024, month, day, 12, 0, 0),
                currency,
                before,
                before * (1.0 + vat),
                rate,
            )
        })
}

fn arb_order() -> impl Strategy<Value = Order> {
    (1u32..=12, 1u32..=28, any::<bool>(), 0.0f64..100_000.0).prop_map(
        |(month, day, redeem, amount)| {
            let kind = if redeem {
                OrderKind::Redeem
            } else {
                OrderKind::Issue
            };
            order(kind, amount, at(2024, month, day, 8, 0, 0), None)
        },
    )
}

proptest! {
    /// Monthly EUR invoice totals add up to the year's EUR after-tax total.
    #[test]
    fn prop_months_sum_to_year_total(
        invoices in prop::collection::vec(arb_invoice(), 0..40),
    ) {
        let y = year(2024);
        let no_offramps: &[Order] = &[];
        let dashboard = ReportService::dashboard(&y, &invoices, no_offramps);

        let month_total: f64 = dashboard.months.iter().map(|m| m.invoices_eur).sum();
        let year_total = dashboard.summary.invoices.total_after_tax_eur_amount;
        prop_assert!((month_total - year_total).abs() <= 1e-9 * (1.0 + year_total.abs()));

        let month_count: usize = ReportService::invoice_months(&y, &invoices)
            .iter()
            .map(|g| g.totals.count)
            .sum();
        prop_assert_eq!(month_count, dashboard.summary.invoices.count);
    }

    /// Cumulative series never decrease for non-negative inputs.
    #[test]
    fn prop_cumulative_is_non_decreasing(
        invoices in prop::collection::vec(arb_invoice(), 0..40),
        orders in prop::collection::vec(arb_order(), 0..40),
    ) {
        let months = ReportService::month_summaries(&year(2024), &invoices, &orders);

        for pair in months.windows(2) {
            prop_assert!(pair[1].cumulative_eur >= pair[0].cumulative_eur);
            prop_assert!(pair[1].cumulative_offramp_eur >= pair[0].cumulative_offramp_eur);
        }
        prop_assert_eq!(months[0].cumulative_eur.to_bits(), months[0].invoices_eur.to_bits());
    }

    /// Identical input gives bit-identical output, non-finite values included.
    #[test]
    fn prop_aggregation_is_idempotent(
        mut invoices in prop::collection::vec(arb_invoice(), 1..20),
        orders in prop::collection::vec(arb_order(), 0..20),
    ) {
        let zero_rate = invoice(at(2024, 5, 1, 0, 0, 0), Currency::Usd, 10.0, 12.0, 0.0);
        invoices.push(zero_rate);
        let y = year(2024);

        let first = ReportService::dashboard(&y, &invoices, &orders);
        let second = ReportService::dashboard(&y, &invoices, &orders);

        prop_assert_eq!(month_bits(&first.months), month_bits(&second.months));
        prop_assert_eq!(
            first.summary.invoices.total_after_tax_eur_amount.to_bits(),
            second.summary.invoices.total_after_tax_eur_amount.to_bits()
        );
        prop_assert!(!first.months[4].invoices_eur.is_finite());
    }
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_single_june_invoice() {
        let invoices = vec![invoice(at(2024, 6, 15, 0, 0, 0), Currency::Usd, 100.0, 120.0, 1.1)];
        let no_offramps: &[Order] = &[];
        let dashboard = ReportService::dashboard(&year(2024), &invoices, no_offramps);

        let totals = dashboard.summary.invoices;
        assert_eq!(totals.count, 1);
        assert!((totals.total_after_tax_usd_amount - 120.0).abs() < 1e-9);
        assert!((totals.total_before_tax_usd_amount - 100.0).abs() < 1e-9);
        assert!((totals.total_after_tax_eur_amount - 109.09).abs() < 0.01);

        assert!((dashboard.months[5].invoices_eur - 109.09).abs() < 0.01);
        for month in &dashboard.months[..5] {
            assert_eq!(month.cumulative_eur, 0.0);
        }
        for month in &dashboard.months[5..] {
            assert!((month.cumulative_eur - 109.09).abs() < 0.01);
        }
    }

    #[test]
    fn test_dashboard_serializes_unconvertible_month_as_null() {
        let invoices = vec![
            invoice(at(2024, 2, 10, 0, 0, 0), Currency::Chf, 100.0, 108.1, 1.0),
            invoice(at(2024, 3, 10, 0, 0, 0), Currency::Chf, 100.0, 108.1, 0.0),
        ];
        let no_offramps: &[Order] = &[];
        let dashboard = ReportService::dashboard(&year(2024), &invoices, no_offramps);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert!((json["months"][1]["invoicesEur"].as_f64().unwrap() - 108.1).abs() < 1e-9);
        assert!(json["months"][2]["invoicesEur"].is_null());
        assert!(json["months"][2]["cumulativeEur"].is_null());
        assert_eq!(json["months"][2]["invoicesChf"].as_f64(), Some(108.1));
    }

    #[test]
    fn test_last_second_included_next_year_excluded() {
        let invoices = vec![
            invoice(at(2024, 12, 31, 23, 59, 59), Currency::Chf, 10.0, 10.0, 1.0),
            invoice(at(2025, 1, 1, 0, 0, 0), Currency::Chf, 99.0, 99.0, 1.0),
        ];
        let no_offramps: &[Order] = &[];
        let dashboard = ReportService::dashboard(&year(2024), &invoices, no_offramps);

        assert_eq!(dashboard.summary.invoices.count, 1);
        assert!((dashboard.months[11].invoices_chf - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_unapproved_order_counts_on_placed_date() {
        let orders = vec![order(OrderKind::Redeem, 500.0, at(2024, 3, 15, 0, 0, 0), None)];
        let months = ReportService::month_summaries(&year(2024), &[], &orders);

        assert!((months[2].offramps_eur - 500.0).abs() < 1e-9);
        assert!((months[11].cumulative_offramp_eur - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_approved_order_counts_on_approval_date() {
        // Placed in 2023, approved in 2024: belongs to 2024.
        let orders = vec![order(
            OrderKind::Redeem,
            75.0,
            at(2023, 12, 30, 0, 0, 0),
            Some(at(2024, 1, 2, 0, 0, 0)),
        )];

        let summary_2023 = ReportService::year_summary(&year(2023), &[], &orders);
        let summary_2024 = ReportService::year_summary(&year(2024), &[], &orders);

        assert_eq!(summary_2023.offramps.count, 0);
        assert_eq!(summary_2024.offramps.count, 1);
        assert!((summary_2024.offramps.total_eur_amount - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_issue_orders_are_not_offramps() {
        let orders = vec![
            order(OrderKind::Issue, 1000.0, at(2024, 2, 1, 0, 0, 0), None),
            order(OrderKind::Redeem, 10.0, at(2024, 2, 2, 0, 0, 0), None),
        ];
        let summary = ReportService::year_summary(&year(2024), &[], &orders);

        assert_eq!(summary.offramps.count, 1);
        assert!((summary.offramps.total_eur_amount - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_withdrawals_feed_the_same_offramp_series() {
        let withdrawals = vec![withdrawal(
            at(2024, 7, 1, 0, 0, 0),
            CryptoCurrency::Usdc,
            1000.0,
            920.0,
        )];
        let months = ReportService::month_summaries(&year(2024), &[], &withdrawals);
        assert!((months[6].offramps_eur - 920.0).abs() < 1e-9);
    }

    #[test]
    fn test_tax_report_figures() {
        let y = year(2024);
        let invoices = vec![invoice(at(2024, 2, 1, 0, 0, 0), Currency::Usd, 1000.0, 1200.0, 1.0)];
        let expenses = vec![
            expense(at(2024, 3, 1, 0, 0, 0), 100.0, ExpenseCurrency::Eur, true),
            expense(at(2024, 3, 2, 0, 0, 0), 50.0, ExpenseCurrency::Usd, false),
        ];
        let withdrawals = vec![
            withdrawal(at(2024, 4, 1, 0, 0, 0), CryptoCurrency::Usdc, 1000.0, 900.0),
            withdrawal(at(2024, 5, 1, 0, 0, 0), CryptoCurrency::Usdc, 1000.0, 1000.0),
        ];

        let report =
            ReportService::tax_report(&y, &invoices, &expenses, &withdrawals, VatPolicy::default());

        assert!((report.income.total_eur - 1200.0).abs() < 1e-9);
        assert!((report.income.total_vat_eur - 200.0).abs() < 1e-9);
        assert!((report.expenses.total_eur - 100.0).abs() < 1e-9);
        assert!((report.expenses.total_usd - 50.0).abs() < 1e-9);
        assert!((report.expenses.vat_deductible - 20.0).abs() < 1e-9);

        assert!((report.withdrawals.average_exchange_rate - 0.95).abs() < 1e-9);
        assert_eq!(report.withdrawals.lines.len(), 2);
        assert!((report.withdrawals.lines[0].slippage + 50.0).abs() < 1e-9);
        assert!((report.withdrawals.lines[1].slippage - 50.0).abs() < 1e-9);

        assert!((report.summary.net_income_eur - 1100.0).abs() < 1e-9);
        assert!((report.summary.vat_payable - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_configured_deductible_percentage() {
        let expenses = vec![expense(at(2024, 3, 1, 0, 0, 0), 200.0, ExpenseCurrency::Eur, true)];
        let policy = VatPolicy {
            deductible_percent: 8.1,
        };
        let report = ReportService::tax_report(&year(2024), &[], &expenses, &[], policy);
        assert!((report.expenses.vat_deductible - 16.2).abs() < 1e-9);
    }

    #[test]
    fn test_no_usd_withdrawals_yields_non_finite_rate() {
        let withdrawals = vec![withdrawal(
            at(2024, 4, 1, 0, 0, 0),
            CryptoCurrency::Eure,
            100.0,
            100.0,
        )];
        let report =
            ReportService::tax_report(&year(2024), &[], &[], &withdrawals, VatPolicy::default());

        assert!(!report.withdrawals.average_exchange_rate.is_finite());
        assert!(report.withdrawals.lines.is_empty());
        assert_eq!(report.withdrawals.total_slippage, 0.0);
        assert_eq!(format_amount(report.withdrawals.average_exchange_rate), "n/a");
    }

    #[test]
    fn test_invoice_months_newest_first_non_empty_only() {
        let invoices = vec![
            invoice(at(2024, 1, 10, 0, 0, 0), Currency::Usd, 10.0, 12.0, 1.0),
            invoice(at(2024, 9, 10, 0, 0, 0), Currency::Chf, 20.0, 22.0, 1.0),
            invoice(at(2024, 1, 20, 0, 0, 0), Currency::Usd, 30.0, 36.0, 1.0),
        ];
        let groups = ReportService::invoice_months(&year(2024), &invoices);

        assert_eq!(groups.iter().map(|g| g.month).collect::<Vec<_>>(), vec![8, 0]);
        assert_eq!(groups[1].invoices.len(), 2);
        assert!((groups[1].totals.total_after_tax_usd_amount - 48.0).abs() < 1e-9);
        assert!((groups[0].totals.total_before_tax_chf_amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_ledger_summary_rows() {
        let y = year(2024);
        let invoices = vec![invoice(at(2024, 2, 1, 0, 0, 0), Currency::Usd, 100.0, 120.0, 1.0)];
        let expenses = vec![
            expense(at(2024, 2, 3, 0, 0, 0), 30.0, ExpenseCurrency::Eur, false),
            expense(at(2024, 2, 4, 0, 0, 0), 99.0, ExpenseCurrency::Usd, false),
        ];
        let withdrawals = vec![withdrawal(at(2024, 8, 1, 0, 0, 0), CryptoCurrency::Usdc, 50.0, 45.0)];

        let summary = ReportService::ledger_summary(&y, &invoices, &expenses, &withdrawals);

        assert_eq!(summary.monthly_summaries.len(), 12);
        assert_eq!(summary.monthly_summaries[0].month, 1);
        assert_eq!(summary.monthly_summaries[11].month, 12);

        let feb = summary.monthly_summaries[1];
        assert!((feb.total_invoiced_eur - 120.0).abs() < 1e-9);
        assert!((feb.total_vat_collected_eur - 20.0).abs() < 1e-9);
        assert!((feb.total_expenses_eur - 30.0).abs() < 1e-9);
        assert!((feb.profit_loss_eur - 70.0).abs() < 1e-9);

        assert!((summary.total_withdrawals_eur - 45.0).abs() < 1e-9);
        assert!((summary.profit_loss_eur - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(109.090_909), "109.09");
        assert_eq!(format_amount(f64::INFINITY), "n/a");
        assert_eq!(format_amount(f64::NAN), "n/a");
    }
}
