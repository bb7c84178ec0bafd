//! Integration tests for export and atomic import.

use chrono::{TimeZone, Utc};
use onchaincounting_core::backup::{BackupDocument, ImportMode};
use onchaincounting_core::currency::{
    BlockchainNetwork, CryptoCurrency, Currency, ExpenseCurrency, NonFiniteAmount,
};
use onchaincounting_core::expense::{ExpenseCategory, ExpenseDraft};
use onchaincounting_core::invoice::{CryptoPayment, InvoiceDraft, InvoiceError, InvoiceService};
use onchaincounting_core::order::Order;
use onchaincounting_core::reports::{MonthlySummary, YearlySummary};
use onchaincounting_core::withdrawal::{WithdrawalDraft, WithdrawalStatus};
use onchaincounting_db::{
    BackupRepository, ExpenseRepository, ImportError, InvoiceRepository, RepositoryError,
    WithdrawalRepository, connect_and_migrate,
};
use onchaincounting_shared::types::InvoiceId;
use sea_orm::DatabaseConnection;
use serde_json::json;

async fn setup() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:", 1)
        .await
        .expect("Failed to open test database")
}

fn sample_document() -> BackupDocument {
    let created = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
    let invoices = [(3, 1.1), (6, 0.0)]
        .into_iter()
        .map(|(month, rate)| {
            let draft = InvoiceDraft {
                invoice_number: format!("OD-{month}"),
                date: Some(Utc.with_ymd_and_hms(2024, month, 10, 0, 0, 0).unwrap()),
                client_name: "Acme Labs".to_string(),
                currency: Some(Currency::Chf),
                after_tax_amount: Some(108.1),
                before_tax_amount: Some(100.0),
                exchange_rate: Some(rate),
                vat_rate: Some(8.1),
                crypto_payments: vec![CryptoPayment {
                    amount: 108.1,
                    currency: CryptoCurrency::Usdc,
                    network: BlockchainNetwork::Starknet,
                }],
                ..InvoiceDraft::default()
            };
            InvoiceService::create(draft, InvoiceId::new(), created).unwrap()
        })
        .collect();

    let order: Order = serde_json::from_value(json!({
        "id": "ord-1",
        "kind": "redeem",
        "amount": "250.50",
        "counterpart": {
            "identifier": { "standard": "iban", "iban": "CH9300762011623852957" },
            "details": { "name": "Own account" }
        },
        "meta": {
            "state": "processed",
            "placedAt": "2024-03-14T09:00:00Z",
            "approvedAt": "2024-03-15T10:00:00Z"
        }
    }))
    .unwrap();

    let month = MonthlySummary {
        year: 2024,
        month: 3,
        total_invoiced_chf: 108.1,
        total_invoiced_eur: 98.27,
        ..MonthlySummary::default()
    };
    let yearly = YearlySummary {
        year: 2024,
        monthly_summaries: vec![month],
        total_invoiced_chf: 108.1,
        total_invoiced_eur: f64::NAN,
        ..YearlySummary::default()
    };

    BackupDocument {
        invoices,
        expenses: Vec::new(),
        withdrawals: Vec::new(),
        monthly_summaries: vec![month],
        yearly_summaries: vec![yearly],
        orders: vec![order],
    }
}

#[tokio::test]
async fn test_replace_import_then_export_reproduces_document() {
    let db = setup().await;
    let repo = BackupRepository::new(db);
    let document = sample_document();

    let applied = repo.import(&document, ImportMode::Replace).await.unwrap();
    assert_eq!(applied, document.record_count());

    let exported = repo.export().await.unwrap();
    // Non-finite amounts only compare equal through their JSON form.
    assert_eq!(exported.to_json().unwrap(), document.to_json().unwrap());
    assert!(!exported.invoices[1].after_tax_eur_amount.is_finite());
}

#[tokio::test]
async fn test_merge_into_empty_store_equals_replace() {
    let document = sample_document();

    let replaced = BackupRepository::new(setup().await);
    replaced.import(&document, ImportMode::Replace).await.unwrap();

    let merged = BackupRepository::new(setup().await);
    merged.import(&document, ImportMode::Merge).await.unwrap();

    assert_eq!(
        merged.export().await.unwrap().to_json().unwrap(),
        replaced.export().await.unwrap().to_json().unwrap()
    );
}

#[tokio::test]
async fn test_replace_clears_records_missing_from_document() {
    let db = setup().await;
    let invoices = InvoiceRepository::new(db.clone());
    let repo = BackupRepository::new(db);

    let local = invoices
        .create(InvoiceDraft::from_invoice(&sample_document().invoices[0]))
        .await
        .unwrap();

    repo.import(&sample_document(), ImportMode::Replace)
        .await
        .unwrap();
    assert!(invoices.find_by_id(local.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_merge_keeps_local_records_and_overwrites_by_key() {
    let db = setup().await;
    let invoices = InvoiceRepository::new(db.clone());
    let repo = BackupRepository::new(db);

    let local = invoices
        .create(InvoiceDraft::from_invoice(&sample_document().invoices[0]))
        .await
        .unwrap();

    let mut document = sample_document();
    repo.import(&document, ImportMode::Merge).await.unwrap();

    document.invoices[0].notes = Some("paid late".to_string());
    document.orders[0].memo = Some("rent".to_string());
    repo.import(&document, ImportMode::Merge).await.unwrap();

    let exported = repo.export().await.unwrap();
    assert_eq!(exported.invoices.len(), 3);
    assert!(exported.invoices.iter().any(|i| i.id == local.id));
    let edited = exported
        .invoices
        .iter()
        .find(|i| i.id == document.invoices[0].id)
        .unwrap();
    assert_eq!(edited.notes.as_deref(), Some("paid late"));
    assert_eq!(exported.orders.len(), 1);
    assert_eq!(exported.orders[0].memo.as_deref(), Some("rent"));
}

#[tokio::test]
async fn test_malformed_file_changes_nothing() {
    let db = setup().await;
    let repo = BackupRepository::new(db);
    repo.import(&sample_document(), ImportMode::Replace)
        .await
        .unwrap();
    let before = repo.export().await.unwrap().to_json().unwrap();

    let err = repo
        .import_json(r#"{ "invoices": [ { "id": 42 } ] }"#, ImportMode::Replace)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Malformed { .. }));
    assert_eq!(
        err.to_string(),
        "Failed to import database. Please check the file format."
    );

    assert_eq!(repo.export().await.unwrap().to_json().unwrap(), before);
}

#[tokio::test]
async fn test_rejected_record_rolls_back_every_collection() {
    let db = setup().await;
    let repo = BackupRepository::new(db);

    // Same key twice: the second insert fails after the first collections were written.
    let mut document = sample_document();
    let duplicate = document.yearly_summaries[0].clone();
    document.yearly_summaries.push(duplicate);

    let err = repo
        .import(&document, ImportMode::Replace)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Database { .. }));

    let exported = repo.export().await.unwrap();
    assert_eq!(exported.record_count(), 0);
}

#[tokio::test]
async fn test_legacy_order_key_is_accepted() {
    let db = setup().await;
    let repo = BackupRepository::new(db);

    let mut value = serde_json::to_value(sample_document()).unwrap();
    let orders = value["orders"].take();
    value.as_object_mut().unwrap().remove("orders");
    value["moneriumOrders"] = orders;

    let applied = repo
        .import_json(&value.to_string(), ImportMode::Merge)
        .await
        .unwrap();
    assert_eq!(applied, sample_document().record_count());
    assert_eq!(repo.export().await.unwrap().orders.len(), 1);
}

#[tokio::test]
async fn test_non_finite_drafts_are_rejected_and_export_stays_importable() {
    let db = setup().await;
    let date = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();

    let invoices = InvoiceRepository::new(db.clone());
    let invoice = InvoiceDraft {
        invoice_number: "OD-NAN".to_string(),
        date: Some(date),
        client_name: "Acme Labs".to_string(),
        currency: Some(Currency::Chf),
        after_tax_amount: Some(f64::NAN),
        before_tax_amount: Some(100.0),
        exchange_rate: Some(1.1),
        vat_rate: Some(8.1),
        ..InvoiceDraft::default()
    };
    assert!(matches!(
        invoices.create(invoice).await,
        Err(RepositoryError::Validation(InvoiceError::NotFinite(
            "after tax amount"
        )))
    ));

    let expenses = ExpenseRepository::new(db.clone());
    let mut expense = ExpenseDraft {
        date,
        category: ExpenseCategory::Software,
        description: "IDE license".to_string(),
        amount: f64::NAN,
        currency: ExpenseCurrency::Eur,
        vat_deductible: true,
        receipt: None,
        notes: None,
    };
    assert!(matches!(
        expenses.create(expense.clone()).await,
        Err(RepositoryError::InvalidAmount(NonFiniteAmount("amount")))
    ));
    expense.amount = 49.0;
    let stored = expenses.create(expense.clone()).await.unwrap();
    expense.amount = f64::INFINITY;
    assert!(matches!(
        expenses.update(stored.id, expense).await,
        Err(RepositoryError::InvalidAmount(_))
    ));

    let withdrawals = WithdrawalRepository::new(db.clone());
    let withdrawal = WithdrawalDraft {
        date,
        source_amount: 1000.0,
        source_currency: CryptoCurrency::Usdc,
        source_network: BlockchainNetwork::Gnosis,
        target_amount: 920.0,
        exchange_rate: 920.0 / 0.0,
        transaction_hash: None,
        status: WithdrawalStatus::Completed,
        external_reference: None,
        notes: None,
    };
    assert!(matches!(
        withdrawals.create(withdrawal).await,
        Err(RepositoryError::InvalidAmount(NonFiniteAmount(
            "exchange rate"
        )))
    ));

    let repo = BackupRepository::new(db);
    let exported = repo.export().await.unwrap();
    assert_eq!(exported.invoices.len(), 0);
    assert_eq!(exported.expenses.len(), 1);
    assert!((exported.expenses[0].amount - 49.0).abs() < f64::EPSILON);
    assert_eq!(exported.withdrawals.len(), 0);

    let text = exported.to_json().unwrap();
    let applied = repo.import_json(&text, ImportMode::Replace).await.unwrap();
    assert_eq!(applied, exported.record_count());
}
