//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Entity not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (e.g., duplicate key).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Backup file could not be imported or merged.
    #[error("Import failed: {0}")]
    Import(String),

    /// Payment institution unreachable or refused the request.
    #[error("External service error: {message}")]
    ExternalService {
        /// Error message.
        message: String,
        /// Whether a manual retry may succeed.
        retryable: bool,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an external service error.
    #[must_use]
    pub fn external(message: impl Into<String>, retryable: bool) -> Self {
        Self::ExternalService {
            message: message.into(),
            retryable,
        }
    }

    /// Returns the stable error code shown next to user-facing messages.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Import(_) => "IMPORT_FAILED",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true when the user should be offered a retry action.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService { retryable: true, .. })
    }
}
