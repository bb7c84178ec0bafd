//! JSON backup document.
//!
//! One document holds every persisted collection. Dates are RFC 3339
//! strings; every collection key is optional on input.

mod document;
mod error;

pub use document::{BackupDocument, ImportMode, backup_file_name};
pub use error::BackupError;
