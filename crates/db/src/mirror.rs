//! User-initiated refresh of the local order mirror.
//!
//! A refresh fetches orders and balances once. Success is written to the
//! mirror; failure falls back to the mirrored data when there is any. There
//! is no automatic retry: the caller decides whether to offer one.

use chrono::{DateTime, Utc};
use onchaincounting_core::order::{Balance, Order, PaymentInstitution, SourceError};
use onchaincounting_shared::AppError;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::{info, warn};

use crate::repositories::{OrderRepository, RepositoryError};

/// What the caller can show after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorView {
    /// Fresh data from the institution.
    Live {
        /// Orders as just synced.
        orders: Vec<Order>,
        /// Current balances.
        balances: Vec<Balance>,
        /// Time of this sync.
        last_synced: DateTime<Utc>,
    },
    /// The institution failed; last mirrored orders instead.
    Offline {
        /// Mirrored orders.
        orders: Vec<Order>,
        /// Time of the last successful sync.
        last_synced: Option<DateTime<Utc>>,
        /// Why the refresh failed.
        error: SourceError,
    },
}

/// Refresh failures with nothing to fall back to.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Institution failed and nothing is mirrored locally.
    #[error("Payment institution unavailable: {source}")]
    Unavailable {
        /// Institution failure.
        #[source]
        source: SourceError,
        /// Whether a manual retry may succeed.
        retryable: bool,
    },

    /// Local store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Unavailable { retryable, .. } => Self::external(err.to_string(), retryable),
            SyncError::Repository(e) => e.into(),
        }
    }
}

/// Order mirror over a payment institution.
#[derive(Debug, Clone)]
pub struct MirrorService<S> {
    source: S,
    orders: OrderRepository,
}

impl<S: PaymentInstitution> MirrorService<S> {
    /// Creates a mirror service.
    #[must_use]
    pub fn new(source: S, db: DatabaseConnection) -> Self {
        Self {
            source,
            orders: OrderRepository::new(db),
        }
    }

    /// Fetches from the institution once and updates the mirror.
    pub async fn refresh(&self) -> Result<MirrorView, SyncError> {
        match self.fetch().await {
            Ok((orders, balances)) => {
                let now = Utc::now();
                let orders = self.orders.sync_orders(orders, now).await?;
                info!(orders = orders.len(), balances = balances.len(), "Mirror refreshed");
                Ok(MirrorView::Live {
                    orders,
                    balances,
                    last_synced: now,
                })
            }
            Err(error) => {
                let status = self.orders.sync_status().await?;
                if !status.has_local_data {
                    return Err(SyncError::Unavailable {
                        retryable: error.is_retryable(),
                        source: error,
                    });
                }

                warn!(error = %error, "Payment institution unavailable, showing mirrored orders");
                Ok(MirrorView::Offline {
                    orders: self.orders.list_all().await?,
                    last_synced: status.last_synced,
                    error,
                })
            }
        }
    }

    async fn fetch(&self) -> Result<(Vec<Order>, Vec<Balance>), SourceError> {
        let orders = self.source.orders().await?;
        let balances = self.source.balances().await?;
        Ok((orders, balances))
    }
}
