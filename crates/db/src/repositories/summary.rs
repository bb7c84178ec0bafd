//! Persisted monthly and yearly summary snapshots.

use onchaincounting_core::reports::{MonthlySummary, YearlySummary};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use tracing::info;

use super::RepositoryError;
use crate::entities::{monthly_summaries, yearly_summaries};

/// Summary snapshot repository.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    db: DatabaseConnection,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replaces the snapshot of one year and its month rows atomically.
    pub async fn replace_year(&self, yearly: &YearlySummary) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        monthly_summaries::Entity::delete_many()
            .filter(monthly_summaries::Column::Year.eq(yearly.year))
            .exec(&txn)
            .await?;
        yearly_summaries::Entity::delete_by_id(yearly.year)
            .exec(&txn)
            .await?;

        insert_yearly(&txn, yearly).await?;
        for month in &yearly.monthly_summaries {
            insert_monthly(&txn, month).await?;
        }

        txn.commit().await?;

        info!(year = yearly.year, "Summaries refreshed");
        Ok(())
    }

    /// Snapshot of one year.
    pub async fn find_year(&self, year: i32) -> Result<Option<YearlySummary>, RepositoryError> {
        let model = yearly_summaries::Entity::find_by_id(year)
            .one(&self.db)
            .await?;
        Ok(model.map(YearlySummary::try_from).transpose()?)
    }

    /// Snapshot of one month, `month` in 1..=12.
    pub async fn find_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthlySummary>, RepositoryError> {
        let model = monthly_summaries::Entity::find_by_id((year, month as i32))
            .one(&self.db)
            .await?;
        Ok(model.map(MonthlySummary::try_from).transpose()?)
    }
}

pub(crate) async fn insert_yearly<C: ConnectionTrait>(
    conn: &C,
    yearly: &YearlySummary,
) -> Result<(), DbErr> {
    yearly_summaries::Entity::insert(yearly_summaries::ActiveModel::from_domain(yearly)?)
        .exec(conn)
        .await?;
    Ok(())
}

pub(crate) async fn insert_monthly<C: ConnectionTrait>(
    conn: &C,
    month: &MonthlySummary,
) -> Result<(), DbErr> {
    monthly_summaries::Entity::insert(monthly_summaries::ActiveModel::from(month))
        .exec(conn)
        .await?;
    Ok(())
}
