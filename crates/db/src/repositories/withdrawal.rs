//! Withdrawal repository.

use chrono::{DateTime, Duration, Utc};
use onchaincounting_core::withdrawal::{Withdrawal, WithdrawalDraft};
use onchaincounting_shared::types::WithdrawalId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::RepositoryError;
use crate::entities::withdrawals;

/// Withdrawal repository.
#[derive(Debug, Clone)]
pub struct WithdrawalRepository {
    db: DatabaseConnection,
}

impl WithdrawalRepository {
    /// Creates a new withdrawal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new withdrawal.
    pub async fn create(&self, draft: WithdrawalDraft) -> Result<Withdrawal, RepositoryError> {
        draft.validate()?;
        let withdrawal = Withdrawal::create(draft, WithdrawalId::new(), Utc::now());
        withdrawals::Entity::insert(withdrawals::ActiveModel::from(&withdrawal))
            .exec(&self.db)
            .await?;

        info!(
            withdrawal_id = %withdrawal.id,
            target_amount = withdrawal.target_amount,
            "Withdrawal created"
        );
        Ok(withdrawal)
    }

    /// Replaces a withdrawal, keeping its ID and creation time.
    pub async fn update(
        &self,
        id: WithdrawalId,
        draft: WithdrawalDraft,
    ) -> Result<Withdrawal, RepositoryError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("withdrawal", id))?;
        draft.validate()?;
        let withdrawal = existing.replace(draft, Utc::now());
        withdrawals::Entity::update(withdrawals::ActiveModel::from(&withdrawal))
            .exec(&self.db)
            .await?;

        info!(withdrawal_id = %id, "Withdrawal updated");
        Ok(withdrawal)
    }

    /// Deletes a withdrawal.
    pub async fn delete(&self, id: WithdrawalId) -> Result<(), RepositoryError> {
        let result = withdrawals::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("withdrawal", id));
        }

        info!(withdrawal_id = %id, "Withdrawal deleted");
        Ok(())
    }

    /// Finds a withdrawal by ID.
    pub async fn find_by_id(&self, id: WithdrawalId) -> Result<Option<Withdrawal>, RepositoryError> {
        let model = withdrawals::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(model.map(Withdrawal::try_from).transpose()?)
    }

    /// Withdrawals dated within `[start, end]`, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Withdrawal>, RepositoryError> {
        let models = withdrawals::Entity::find()
            .filter(withdrawals::Column::Date.gte(start))
            .filter(withdrawals::Column::Date.lt(end + Duration::seconds(1)))
            .order_by_asc(withdrawals::Column::Date)
            .order_by_asc(withdrawals::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }

    /// Every withdrawal, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Withdrawal>, RepositoryError> {
        let models = withdrawals::Entity::find()
            .order_by_asc(withdrawals::Column::Date)
            .order_by_asc(withdrawals::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }
}

fn to_domain(models: Vec<withdrawals::Model>) -> Result<Vec<Withdrawal>, RepositoryError> {
    models
        .into_iter()
        .map(|m| Withdrawal::try_from(m).map_err(RepositoryError::from))
        .collect()
}
