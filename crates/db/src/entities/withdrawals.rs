//! `SeaORM` Entity for withdrawals table.

use onchaincounting_core::withdrawal::Withdrawal;
use onchaincounting_shared::types::WithdrawalId;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{amount_from_column, amount_to_column, parse_text};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "withdrawals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub date: DateTimeUtc,
    pub source_amount: Option<f64>,
    pub source_currency: String,
    pub source_network: String,
    pub target_amount: Option<f64>,
    pub exchange_rate: Option<f64>,
    pub transaction_hash: Option<String>,
    pub status: String,
    pub external_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Withdrawal> for ActiveModel {
    fn from(withdrawal: &Withdrawal) -> Self {
        Self {
            id: Set(withdrawal.id.into_inner()),
            date: Set(withdrawal.date),
            source_amount: Set(amount_to_column(withdrawal.source_amount)),
            source_currency: Set(withdrawal.source_currency.as_str().to_string()),
            source_network: Set(withdrawal.source_network.as_str().to_string()),
            target_amount: Set(amount_to_column(withdrawal.target_amount)),
            exchange_rate: Set(amount_to_column(withdrawal.exchange_rate)),
            transaction_hash: Set(withdrawal.transaction_hash.clone()),
            status: Set(withdrawal.status.as_str().to_string()),
            external_reference: Set(withdrawal.external_reference.clone()),
            notes: Set(withdrawal.notes.clone()),
            created_at: Set(withdrawal.created_at),
            updated_at: Set(withdrawal.updated_at),
        }
    }
}

impl TryFrom<Model> for Withdrawal {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: WithdrawalId::from_uuid(model.id),
            date: model.date,
            source_amount: amount_from_column(model.source_amount),
            source_currency: parse_text("withdrawals.source_currency", &model.source_currency)?,
            source_network: parse_text("withdrawals.source_network", &model.source_network)?,
            target_amount: amount_from_column(model.target_amount),
            exchange_rate: amount_from_column(model.exchange_rate),
            transaction_hash: model.transaction_hash,
            status: parse_text("withdrawals.status", &model.status)?,
            external_reference: model.external_reference,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
