//! Repository error types.

use onchaincounting_core::backup::{BackupError, ImportMode};
use onchaincounting_core::currency::NonFiniteAmount;
use onchaincounting_core::invoice::InvoiceError;
use onchaincounting_shared::AppError;
use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised by record repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No record with the given key.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Collection name.
        entity: &'static str,
        /// Key that was looked up.
        id: String,
    },

    /// Invoice draft failed validation.
    #[error("Invalid invoice: {0}")]
    Validation(#[from] InvoiceError),

    /// Expense or withdrawal draft carried a NaN or infinite value.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] NonFiniteAmount),

    /// Calendar year cannot be represented in the reporting time zone.
    #[error("Invalid reporting year: {0}")]
    InvalidYear(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::Validation(e) => Self::Validation(e.to_string()),
            RepositoryError::InvalidAmount(_) | RepositoryError::InvalidYear(_) => {
                Self::Validation(err.to_string())
            }
            RepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A backup could not be applied. Nothing was written.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file is not a valid backup document.
    #[error("{}", .mode.failure_message())]
    Malformed {
        /// Requested mode.
        mode: ImportMode,
        /// Parse failure.
        #[source]
        source: BackupError,
    },

    /// A record was rejected by the store.
    #[error("{}", .mode.failure_message())]
    Database {
        /// Requested mode.
        mode: ImportMode,
        /// Store failure.
        #[source]
        source: DbErr,
    },
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        Self::Import(err.to_string())
    }
}
