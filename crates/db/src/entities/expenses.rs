//! `SeaORM` Entity for expenses table.

use onchaincounting_core::expense::Expense;
use onchaincounting_shared::types::ExpenseId;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{amount_from_column, amount_to_column, parse_text};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTimeUtc,
    pub category: String,
    pub description: String,
    pub amount: Option<f64>,
    pub currency: String,
    pub vat_deductible: bool,
    pub receipt: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: Set(expense.id.into_inner()),
            date: Set(expense.date),
            category: Set(expense.category.as_str().to_string()),
            description: Set(expense.description.clone()),
            amount: Set(amount_to_column(expense.amount)),
            currency: Set(expense.currency.as_str().to_string()),
            vat_deductible: Set(expense.vat_deductible),
            receipt: Set(expense.receipt.clone()),
            notes: Set(expense.notes.clone()),
            created_at: Set(expense.created_at),
            updated_at: Set(expense.updated_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ExpenseId::from_uuid(model.id),
            date: model.date,
            category: parse_text("expenses.category", &model.category)?,
            description: model.description,
            amount: amount_from_column(model.amount),
            currency: parse_text("expenses.currency", &model.currency)?,
            vat_deductible: model.vat_deductible,
            receipt: model.receipt,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
