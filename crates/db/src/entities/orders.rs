//! `SeaORM` Entity for mirrored orders.

use onchaincounting_core::order::{Order, OrderMeta};
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{amount_from_column, amount_to_column, from_json, parse_text, to_json};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount: Option<f64>,
    pub counterpart: Json,
    pub memo: Option<String>,
    pub state: String,
    pub placed_at: DateTimeUtc,
    pub approved_at: Option<DateTimeUtc>,
    /// Approval time if set, else placement time. Indexed for year queries.
    pub effective_at: DateTimeUtc,
    pub last_synced: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Builds a fully set active model from a mirrored order.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Json` if the counterpart cannot be serialized.
    pub fn from_domain(order: &Order) -> Result<Self, DbErr> {
        Ok(Self {
            id: Set(order.id.clone()),
            kind: Set(order.kind.as_str().to_string()),
            amount: Set(amount_to_column(order.amount)),
            counterpart: Set(to_json(&order.counterpart)?),
            memo: Set(order.memo.clone()),
            state: Set(order.meta.state.as_str().to_string()),
            placed_at: Set(order.meta.placed_at),
            approved_at: Set(order.meta.approved_at),
            effective_at: Set(order.effective_at()),
            last_synced: Set(order.last_synced),
        })
    }
}

impl TryFrom<Model> for Order {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: parse_text("orders.kind", &model.kind)?,
            amount: amount_from_column(model.amount),
            counterpart: from_json(model.counterpart)?,
            memo: model.memo,
            meta: OrderMeta {
                state: parse_text("orders.state", &model.state)?,
                placed_at: model.placed_at,
                approved_at: model.approved_at,
            },
            last_synced: model.last_synced,
        })
    }
}
