//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions over an embedded SQLite file
//! - Repository abstractions for data access
//! - Atomic backup import/export
//! - The local mirror of payment institution orders
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod mirror;
pub mod reporting;
pub mod repositories;

pub use mirror::{MirrorService, MirrorView, SyncError};
pub use reporting::{OfframpSource, ReportingQueries};
pub use repositories::{
    BackupRepository, ExpenseRepository, ImportError, InvoiceRepository, OrderRepository,
    RepositoryError, SummaryRepository, WithdrawalRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use migration::Migrator;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Connects with a bounded pool and applies pending migrations.
///
/// SQLite allows one writer, so a pool of one is the usual setting.
///
/// # Errors
///
/// Returns an error if the connection fails or a migration cannot be applied.
pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections.max(1))
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
