//! Expense repository.

use chrono::{DateTime, Duration, Utc};
use onchaincounting_core::expense::{Expense, ExpenseDraft};
use onchaincounting_shared::types::ExpenseId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use super::RepositoryError;
use crate::entities::expenses;

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new expense.
    pub async fn create(&self, draft: ExpenseDraft) -> Result<Expense, RepositoryError> {
        draft.validate()?;
        let expense = Expense::create(draft, ExpenseId::new(), Utc::now());
        expenses::Entity::insert(expenses::ActiveModel::from(&expense))
            .exec(&self.db)
            .await?;

        info!(expense_id = %expense.id, category = %expense.category, "Expense created");
        Ok(expense)
    }

    /// Replaces an expense, keeping its ID and creation time.
    pub async fn update(
        &self,
        id: ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Expense, RepositoryError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("expense", id))?;
        draft.validate()?;
        let expense = existing.replace(draft, Utc::now());
        expenses::Entity::update(expenses::ActiveModel::from(&expense))
            .exec(&self.db)
            .await?;

        info!(expense_id = %id, "Expense updated");
        Ok(expense)
    }

    /// Deletes an expense.
    pub async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let result = expenses::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("expense", id));
        }

        info!(expense_id = %id, "Expense deleted");
        Ok(())
    }

    /// Finds an expense by ID.
    pub async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, RepositoryError> {
        let model = expenses::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;
        Ok(model.map(Expense::try_from).transpose()?)
    }

    /// Expenses dated within `[start, end]` at whole-second precision, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::Date.gte(start))
            .filter(expenses::Column::Date.lt(end + Duration::seconds(1)))
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }

    /// Every expense, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Expense>, RepositoryError> {
        let models = expenses::Entity::find()
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }
}

fn to_domain(models: Vec<expenses::Model>) -> Result<Vec<Expense>, RepositoryError> {
    models
        .into_iter()
        .map(|m| Expense::try_from(m).map_err(RepositoryError::from))
        .collect()
}
