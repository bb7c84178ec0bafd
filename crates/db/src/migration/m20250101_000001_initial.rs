//! Initial database migration.
//!
//! Creates every collection table with a date index for year range queries.
//! Ids are UUID blobs except for mirrored orders, whose ids come from the
//! payment institution.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in UP_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in [
            "sync_state",
            "yearly_summaries",
            "monthly_summaries",
            "orders",
            "withdrawals",
            "expenses",
            "invoices",
        ] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table};"))
                .await?;
        }
        Ok(())
    }
}

const UP_SQL: &[&str] = &[
    r"
CREATE TABLE invoices (
    id BLOB PRIMARY KEY NOT NULL,
    date TEXT NOT NULL,
    invoice_number TEXT NOT NULL,
    client_name TEXT NOT NULL,
    before_tax_amount REAL,
    after_tax_amount REAL,
    vat_rate REAL,
    vat_amount REAL,
    currency TEXT NOT NULL CHECK (currency IN ('USD', 'CHF')),
    before_tax_eur_amount REAL,
    after_tax_eur_amount REAL,
    vat_eur_amount REAL,
    exchange_rate REAL,
    crypto_payments TEXT NOT NULL DEFAULT '[]',
    pdf_path TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    "CREATE INDEX idx_invoices_date ON invoices(date)",
    r"
CREATE TABLE expenses (
    id BLOB PRIMARY KEY NOT NULL,
    date TEXT NOT NULL,
    category TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL,
    currency TEXT NOT NULL CHECK (currency IN ('USD', 'EUR')),
    vat_deductible INTEGER NOT NULL DEFAULT 0,
    receipt TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    "CREATE INDEX idx_expenses_date ON expenses(date)",
    r"
CREATE TABLE withdrawals (
    id BLOB PRIMARY KEY NOT NULL,
    date TEXT NOT NULL,
    source_amount REAL,
    source_currency TEXT NOT NULL,
    source_network TEXT NOT NULL,
    target_amount REAL,
    exchange_rate REAL,
    transaction_hash TEXT,
    status TEXT NOT NULL CHECK (status IN ('pending', 'completed', 'failed')),
    external_reference TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    "CREATE INDEX idx_withdrawals_date ON withdrawals(date)",
    r"
CREATE TABLE orders (
    id TEXT PRIMARY KEY NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('issue', 'redeem')),
    amount REAL,
    counterpart TEXT NOT NULL,
    memo TEXT,
    state TEXT NOT NULL,
    placed_at TEXT NOT NULL,
    approved_at TEXT,
    effective_at TEXT NOT NULL,
    last_synced TEXT
)",
    "CREATE INDEX idx_orders_placed_at ON orders(placed_at)",
    "CREATE INDEX idx_orders_effective_at ON orders(effective_at)",
    r"
CREATE TABLE monthly_summaries (
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    total_invoiced_usd REAL,
    total_invoiced_chf REAL,
    total_invoiced_eur REAL,
    total_vat_collected_eur REAL,
    total_expenses_eur REAL,
    total_withdrawals_eur REAL,
    profit_loss_eur REAL,
    PRIMARY KEY (year, month)
)",
    r"
CREATE TABLE yearly_summaries (
    year INTEGER PRIMARY KEY NOT NULL,
    monthly_summaries TEXT NOT NULL,
    total_invoiced_usd REAL,
    total_invoiced_chf REAL,
    total_invoiced_eur REAL,
    total_vat_collected_eur REAL,
    total_expenses_eur REAL,
    total_withdrawals_eur REAL,
    profit_loss_eur REAL
)",
    r"
CREATE TABLE sync_state (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)",
];
