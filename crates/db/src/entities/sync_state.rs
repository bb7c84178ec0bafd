//! `SeaORM` Entity for small key/value sync bookkeeping.

use sea_orm::entity::prelude::*;

/// Key holding the RFC 3339 time of the last order sync.
pub const LAST_ORDER_SYNC: &str = "orders.last_sync";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
