//! `SeaORM` Entity for yearly summary snapshots.
//!
//! The month rows are embedded as JSON so a yearly snapshot restores
//! exactly as exported, independent of the `monthly_summaries` table.

use onchaincounting_core::reports::YearlySummary;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{amount_from_column, amount_to_column, from_json, to_json};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "yearly_summaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    pub monthly_summaries: Json,
    pub total_invoiced_usd: Option<f64>,
    pub total_invoiced_chf: Option<f64>,
    pub total_invoiced_eur: Option<f64>,
    pub total_vat_collected_eur: Option<f64>,
    pub total_expenses_eur: Option<f64>,
    pub total_withdrawals_eur: Option<f64>,
    pub profit_loss_eur: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Builds a fully set active model from a yearly snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Json` if the month rows cannot be serialized.
    pub fn from_domain(summary: &YearlySummary) -> Result<Self, DbErr> {
        Ok(Self {
            year: Set(summary.year),
            monthly_summaries: Set(to_json(&summary.monthly_summaries)?),
            total_invoiced_usd: Set(amount_to_column(summary.total_invoiced_usd)),
            total_invoiced_chf: Set(amount_to_column(summary.total_invoiced_chf)),
            total_invoiced_eur: Set(amount_to_column(summary.total_invoiced_eur)),
            total_vat_collected_eur: Set(amount_to_column(summary.total_vat_collected_eur)),
            total_expenses_eur: Set(amount_to_column(summary.total_expenses_eur)),
            total_withdrawals_eur: Set(amount_to_column(summary.total_withdrawals_eur)),
            profit_loss_eur: Set(amount_to_column(summary.profit_loss_eur)),
        })
    }
}

impl TryFrom<Model> for YearlySummary {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            year: model.year,
            monthly_summaries: from_json(model.monthly_summaries)?,
            total_invoiced_usd: amount_from_column(model.total_invoiced_usd),
            total_invoiced_chf: amount_from_column(model.total_invoiced_chf),
            total_invoiced_eur: amount_from_column(model.total_invoiced_eur),
            total_vat_collected_eur: amount_from_column(model.total_vat_collected_eur),
            total_expenses_eur: amount_from_column(model.total_expenses_eur),
            total_withdrawals_eur: amount_from_column(model.total_withdrawals_eur),
            profit_loss_eur: amount_from_column(model.profit_loss_eur),
        })
    }
}
