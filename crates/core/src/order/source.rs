//! Payment institution collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::types::{Balance, Order};

/// Failures reported by the payment institution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Credentials missing, expired or revoked.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Institution unreachable.
    #[error("Network error: {0}")]
    Network(String),

    /// Response could not be understood.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Returns true when asking the user to retry makes sense.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Network(_))
    }
}

/// Read-only source of orders and balances.
#[async_trait]
pub trait PaymentInstitution: Send + Sync {
    /// Fetches every order visible to the account.
    async fn orders(&self) -> Result<Vec<Order>, SourceError>;

    /// Fetches current balances.
    async fn balances(&self) -> Result<Vec<Balance>, SourceError>;
}

/// State of the local order mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// Time of the last successful sync.
    pub last_synced: Option<DateTime<Utc>>,
    /// Whether any order is mirrored locally.
    pub has_local_data: bool,
}
