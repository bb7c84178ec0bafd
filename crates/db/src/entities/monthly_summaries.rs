//! `SeaORM` Entity for monthly summary snapshots.

use onchaincounting_core::reports::MonthlySummary;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{amount_from_column, amount_to_column};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "monthly_summaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: i32,
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

impl From<&MonthlySummary> for ActiveModel {
    fn from(summary: &MonthlySummary) -> Self {
        Self {
            year: Set(summary.year),
            month: Set(summary.month as i32),
            total_invoiced_usd: Set(amount_to_column(summary.total_invoiced_usd)),
            total_invoiced_chf: Set(amount_to_column(summary.total_invoiced_chf)),
            total_invoiced_eur: Set(amount_to_column(summary.total_invoiced_eur)),
            total_vat_collected_eur: Set(amount_to_column(summary.total_vat_collected_eur)),
            total_expenses_eur: Set(amount_to_column(summary.total_expenses_eur)),
            total_withdrawals_eur: Set(amount_to_column(summary.total_withdrawals_eur)),
            profit_loss_eur: Set(amount_to_column(summary.profit_loss_eur)),
        }
    }
}

impl TryFrom<Model> for MonthlySummary {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month = u32::try_from(model.month)
            .map_err(|_| DbErr::Type(format!("monthly_summaries.month: {}", model.month)))?;
        Ok(Self {
            year: model.year,
            month,
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
