//! Backup error types.

use thiserror::Error;

/// Errors reading or writing a backup document.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Document is not valid JSON or does not match the expected shape.
    #[error("Invalid backup document: {0}")]
    Parse(#[source] serde_json::Error),

    /// Document could not be serialized.
    #[error("Failed to serialize backup: {0}")]
    Serialize(#[source] serde_json::Error),
}
