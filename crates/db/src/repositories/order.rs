//! Local mirror of payment institution orders.
//!
//! The mirror is written only by [`OrderRepository::sync_orders`]: an upsert
//! keyed by order ID, stamped with the local sync time. Orders that vanish
//! from the institution are kept.

use chrono::{DateTime, Duration, Utc};
use onchaincounting_core::order::{Order, SyncStatus};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::RepositoryError;
use crate::entities::{orders, sync_state};

/// Mirrored order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Upserts fetched orders and records `now` as the last sync time.
    ///
    /// Runs in one transaction. Returns the orders as stored.
    pub async fn sync_orders(
        &self,
        orders: Vec<Order>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let txn = self.db.begin().await?;

        let mut synced = Vec::with_capacity(orders.len());
        for mut order in orders {
            order.last_synced = Some(now);
            upsert(&txn, &order).await?;
            synced.push(order);
        }
        record_sync(&txn, now).await?;

        txn.commit().await?;

        info!(count = synced.len(), synced_at = %now, "Orders synced");
        Ok(synced)
    }

    /// Last sync time and whether any order is mirrored.
    pub async fn sync_status(&self) -> Result<SyncStatus, RepositoryError> {
        let last_synced = match sync_state::Entity::find_by_id(sync_state::LAST_ORDER_SYNC)
            .one(&self.db)
            .await?
        {
            Some(row) => Some(
                DateTime::parse_from_rfc3339(&row.value)
                    .map_err(|e| DbErr::Type(format!("sync_state.value: {e}")))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };
        let count = orders::Entity::find().count(&self.db).await?;

        Ok(SyncStatus {
            last_synced,
            has_local_data: count > 0,
        })
    }

    /// Every mirrored order, most recently placed first.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let models = orders::Entity::find()
            .order_by_desc(orders::Column::PlacedAt)
            .order_by_asc(orders::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }

    /// Orders whose effective date lies within `[start, end]`, oldest first.
    pub async fn list_effective_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let models = orders::Entity::find()
            .filter(orders::Column::EffectiveAt.gte(start))
            .filter(orders::Column::EffectiveAt.lt(end + Duration::seconds(1)))
            .order_by_asc(orders::Column::EffectiveAt)
            .order_by_asc(orders::Column::Id)
            .all(&self.db)
            .await?;
        to_domain(models)
    }
}

/// Replaces the stored row for `order.id`, if any.
pub(crate) async fn upsert<C: ConnectionTrait>(conn: &C, order: &Order) -> Result<(), DbErr> {
    orders::Entity::delete_by_id(order.id.clone())
        .exec(conn)
        .await?;
    orders::Entity::insert(orders::ActiveModel::from_domain(order)?)
        .exec(conn)
        .await?;
    Ok(())
}

async fn record_sync<C: ConnectionTrait>(conn: &C, now: DateTime<Utc>) -> Result<(), DbErr> {
    sync_state::Entity::delete_by_id(sync_state::LAST_ORDER_SYNC)
        .exec(conn)
        .await?;
    sync_state::Entity::insert(sync_state::ActiveModel {
        key: Set(sync_state::LAST_ORDER_SYNC.to_string()),
        value: Set(now.to_rfc3339()),
    })
    .exec(conn)
    .await?;
    Ok(())
}

fn to_domain(models: Vec<orders::Model>) -> Result<Vec<Order>, RepositoryError> {
    models
        .into_iter()
        .map(|m| Order::try_from(m).map_err(RepositoryError::from))
        .collect()
}
