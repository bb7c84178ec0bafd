//! Integration tests for report queries over stored records.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use onchaincounting_core::currency::{
    BlockchainNetwork, CryptoCurrency, Currency, ExpenseCurrency,
};
use onchaincounting_core::expense::{ExpenseCategory, ExpenseDraft};
use onchaincounting_core::invoice::InvoiceDraft;
use onchaincounting_core::reports::VatPolicy;
use onchaincounting_core::withdrawal::{WithdrawalDraft, WithdrawalStatus};
use onchaincounting_db::{
    ExpenseRepository, InvoiceRepository, OfframpSource, OrderRepository, ReportingQueries,
    RepositoryError, SummaryRepository, WithdrawalRepository, connect_and_migrate,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

async fn setup() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:", 1)
        .await
        .expect("Failed to open test database")
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

async fn seed_june_invoice(db: &DatabaseConnection) {
    InvoiceRepository::new(db.clone())
        .create(InvoiceDraft {
            invoice_number: "OD-6".to_string(),
            date: Some(at(2024, 6, 15)),
            client_name: "Acme Labs".to_string(),
            currency: Some(Currency::Usd),
            after_tax_amount: Some(120.0),
            before_tax_amount: Some(100.0),
            exchange_rate: Some(1.1),
            vat_rate: Some(20.0),
            ..InvoiceDraft::default()
        })
        .await
        .unwrap();
}

async fn seed_withdrawal(db: &DatabaseConnection, date: DateTime<Utc>, source: f64, target: f64) {
    WithdrawalRepository::new(db.clone())
        .create(WithdrawalDraft {
            date,
            source_amount: source,
            source_currency: CryptoCurrency::Usdc,
            source_network: BlockchainNetwork::Gnosis,
            target_amount: target,
            exchange_rate: target / source,
            transaction_hash: None,
            status: WithdrawalStatus::Completed,
            external_reference: None,
            notes: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dashboard_for_single_invoice() {
    let db = setup().await;
    seed_june_invoice(&db).await;
    let queries = ReportingQueries::new(db, Tz::UTC, VatPolicy::default());

    let dashboard = queries
        .dashboard(2024, OfframpSource::Withdrawals)
        .await
        .unwrap();

    assert_eq!(dashboard.summary.invoices.count, 1);
    assert!((dashboard.summary.invoices.total_after_tax_usd_amount - 120.0).abs() < 1e-9);
    let expected_eur = 120.0 / 1.1;
    assert!((dashboard.summary.invoices.total_after_tax_eur_amount - expected_eur).abs() < 1e-9);
    assert!((dashboard.months[5].invoices_eur - expected_eur).abs() < 1e-9);
    for month in &dashboard.months[..5] {
        assert!(month.cumulative_eur.abs() < f64::EPSILON);
    }
    for month in &dashboard.months[5..] {
        assert!((month.cumulative_eur - expected_eur).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_dashboard_offramp_sources() {
    let db = setup().await;
    seed_withdrawal(&db, at(2024, 2, 10), 1000.0, 900.0).await;
    let redeem = serde_json::from_value(json!({
        "id": "ord-1",
        "kind": "redeem",
        "amount": "250",
        "counterpart": { "identifier": { "standard": "iban", "iban": "CH9300762011623852957" } },
        "meta": { "state": "processed", "placedAt": "2024-03-15T00:00:00Z" }
    }))
    .unwrap();
    OrderRepository::new(db.clone())
        .sync_orders(vec![redeem], Utc::now())
        .await
        .unwrap();
    let queries = ReportingQueries::new(db, Tz::UTC, VatPolicy::default());

    let by_orders = queries.dashboard(2024, OfframpSource::Orders).await.unwrap();
    assert_eq!(by_orders.summary.offramps.count, 1);
    assert!((by_orders.months[2].offramps_eur - 250.0).abs() < 1e-9);

    let by_withdrawals = queries
        .dashboard(2024, OfframpSource::Withdrawals)
        .await
        .unwrap();
    assert!((by_withdrawals.summary.offramps.total_eur_amount - 900.0).abs() < 1e-9);
    assert!((by_withdrawals.months[1].offramps_eur - 900.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_tax_report_uses_configured_policy() {
    let db = setup().await;
    seed_june_invoice(&db).await;
    ExpenseRepository::new(db.clone())
        .create(ExpenseDraft {
            date: at(2024, 4, 1),
            category: ExpenseCategory::Hardware,
            description: "Laptop".to_string(),
            amount: 1000.0,
            currency: ExpenseCurrency::Eur,
            vat_deductible: true,
            receipt: None,
            notes: None,
        })
        .await
        .unwrap();
    let queries = ReportingQueries::new(
        db,
        Tz::UTC,
        VatPolicy {
            deductible_percent: 8.1,
        },
    );

    let report = queries.tax_report(2024).await.unwrap();
    assert!((report.deductible_vat_percent - 8.1).abs() < f64::EPSILON);
    assert!((report.expenses.vat_deductible - 81.0).abs() < 1e-9);
    assert!((report.summary.vat_payable - (20.0 / 1.1 - 81.0)).abs() < 1e-9);
    assert!((report.summary.net_income_eur - (120.0 / 1.1 - 1000.0)).abs() < 1e-9);
}

#[tokio::test]
async fn test_refresh_summaries_persists_snapshot() {
    let db = setup().await;
    seed_june_invoice(&db).await;
    seed_withdrawal(&db, at(2024, 6, 20), 100.0, 92.0).await;
    let queries = ReportingQueries::new(db.clone(), Tz::UTC, VatPolicy::default());

    let yearly = queries.refresh_summaries(2024).await.unwrap();
    assert_eq!(yearly.monthly_summaries.len(), 12);

    let summaries = SummaryRepository::new(db);
    assert_eq!(summaries.find_year(2024).await.unwrap(), Some(yearly.clone()));

    let june = summaries.find_month(2024, 6).await.unwrap().unwrap();
    assert!((june.total_invoiced_usd - 120.0).abs() < 1e-9);
    assert!((june.total_withdrawals_eur - 92.0).abs() < 1e-9);
    assert!((june.profit_loss_eur - 100.0 / 1.1).abs() < 1e-9);

    // Refreshing again replaces rather than duplicates.
    queries.refresh_summaries(2024).await.unwrap();
    assert_eq!(summaries.find_year(2024).await.unwrap(), Some(yearly));
}

#[tokio::test]
async fn test_unrepresentable_year_is_rejected() {
    let db = setup().await;
    let queries = ReportingQueries::new(db, Tz::UTC, VatPolicy::default());

    let result = queries.tax_report(i32::MAX).await;
    assert!(matches!(result, Err(RepositoryError::InvalidYear(_))));
}
