//! Whole-store export and atomic import.

use onchaincounting_core::backup::{BackupDocument, ImportMode};
use onchaincounting_core::expense::Expense;
use onchaincounting_core::invoice::Invoice;
use onchaincounting_core::order::Order;
use onchaincounting_core::reports::{MonthlySummary, YearlySummary};
use onchaincounting_core::withdrawal::Withdrawal;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, TransactionTrait,
};
use tracing::{error, info};

use super::summary::{insert_monthly, insert_yearly};
use super::{ImportError, RepositoryError, order};
use crate::entities::{
    expenses, invoices, monthly_summaries, orders, withdrawals, yearly_summaries,
};

/// Backup repository.
#[derive(Debug, Clone)]
pub struct BackupRepository {
    db: DatabaseConnection,
}

impl BackupRepository {
    /// Creates a new backup repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads every collection from one consistent snapshot.
    pub async fn export(&self) -> Result<BackupDocument, RepositoryError> {
        let txn = self.db.begin().await?;

        let invoices = invoices::Entity::find()
            .order_by_asc(invoices::Column::Date)
            .order_by_asc(invoices::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<Result<Vec<_>, DbErr>>()?;
        let expenses = expenses::Entity::find()
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect::<Result<Vec<_>, DbErr>>()?;
        let withdrawals = withdrawals::Entity::find()
            .order_by_asc(withdrawals::Column::Date)
            .order_by_asc(withdrawals::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .map(Withdrawal::try_from)
            .collect::<Result<Vec<_>, DbErr>>()?;
        let monthly_summaries = monthly_summaries::Entity::find()
            .order_by_asc(monthly_summaries::Column::Year)
            .order_by_asc(monthly_summaries::Column::Month)
            .all(&txn)
            .await?
            .into_iter()
            .map(MonthlySummary::try_from)
            .collect::<Result<Vec<_>, DbErr>>()?;
        let yearly_summaries = yearly_summaries::Entity::find()
            .order_by_asc(yearly_summaries::Column::Year)
            .all(&txn)
            .await?
            .into_iter()
            .map(YearlySummary::try_from)
            .collect::<Result<Vec<_>, DbErr>>()?;
        let orders = orders::Entity::find()
            .order_by_asc(orders::Column::PlacedAt)
            .order_by_asc(orders::Column::Id)
            .all(&txn)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, DbErr>>()?;

        txn.commit().await?;

        let document = BackupDocument {
            invoices,
            expenses,
            withdrawals,
            monthly_summaries,
            yearly_summaries,
            orders,
        };
        info!(records = document.record_count(), "Database exported");
        Ok(document)
    }

    /// Applies a document in one transaction.
    ///
    /// On any failure nothing is written and the mode's failure message is
    /// returned. Returns the number of records applied.
    pub async fn import(
        &self,
        document: &BackupDocument,
        mode: ImportMode,
    ) -> Result<usize, ImportError> {
        if let Err(source) = self.apply(document, mode).await {
            error!(error = %source, mode = ?mode, "Failed to import backup");
            return Err(ImportError::Database { mode, source });
        }

        info!(records = document.record_count(), mode = ?mode, "Backup imported");
        Ok(document.record_count())
    }

    /// Parses backup text and applies it.
    pub async fn import_json(&self, text: &str, mode: ImportMode) -> Result<usize, ImportError> {
        let document = BackupDocument::from_json(text).map_err(|source| {
            error!(error = %source, mode = ?mode, "Failed to parse backup");
            ImportError::Malformed { mode, source }
        })?;
        self.import(&document, mode).await
    }

    async fn apply(&self, document: &BackupDocument, mode: ImportMode) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        let merge = mode == ImportMode::Merge;

        if !merge {
            clear(&txn).await?;
        }

        for invoice in &document.invoices {
            if merge {
                invoices::Entity::delete_by_id(invoice.id.into_inner())
                    .exec(&txn)
                    .await?;
            }
            invoices::Entity::insert(invoices::ActiveModel::from_domain(invoice)?)
                .exec(&txn)
                .await?;
        }

        for expense in &document.expenses {
            if merge {
                expenses::Entity::delete_by_id(expense.id.into_inner())
                    .exec(&txn)
                    .await?;
            }
            expenses::Entity::insert(expenses::ActiveModel::from(expense))
                .exec(&txn)
                .await?;
        }

        for withdrawal in &document.withdrawals {
            if merge {
                withdrawals::Entity::delete_by_id(withdrawal.id.into_inner())
                    .exec(&txn)
                    .await?;
            }
            withdrawals::Entity::insert(withdrawals::ActiveModel::from(withdrawal))
                .exec(&txn)
                .await?;
        }

        for month in &document.monthly_summaries {
            if merge {
                monthly_summaries::Entity::delete_by_id((month.year, month.month as i32))
                    .exec(&txn)
                    .await?;
            }
            insert_monthly(&txn, month).await?;
        }

        for yearly in &document.yearly_summaries {
            if merge {
                yearly_summaries::Entity::delete_by_id(yearly.year)
                    .exec(&txn)
                    .await?;
            }
            insert_yearly(&txn, yearly).await?;
        }

        for mirrored in &document.orders {
            order::upsert(&txn, mirrored).await?;
        }

        txn.commit().await
    }
}

async fn clear<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    invoices::Entity::delete_many().exec(conn).await?;
    expenses::Entity::delete_many().exec(conn).await?;
    withdrawals::Entity::delete_many().exec(conn).await?;
    monthly_summaries::Entity::delete_many().exec(conn).await?;
    yearly_summaries::Entity::delete_many().exec(conn).await?;
    orders::Entity::delete_many().exec(conn).await?;
    Ok(())
}
