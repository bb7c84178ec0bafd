//! Backup document and import modes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::BackupError;
use crate::expense::Expense;
use crate::invoice::Invoice;
use crate::order::Order;
use crate::reports::{MonthlySummary, YearlySummary};
use crate::withdrawal::Withdrawal;

/// Every persisted collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    /// Invoices.
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    /// Expenses.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Withdrawals.
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
    /// Monthly summary snapshots.
    #[serde(default)]
    pub monthly_summaries: Vec<MonthlySummary>,
    /// Yearly summary snapshots.
    #[serde(default)]
    pub yearly_summaries: Vec<YearlySummary>,
    /// Mirrored orders.
    #[serde(default, alias = "moneriumOrders")]
    pub orders: Vec<Order>,
}

impl BackupDocument {
    /// Parses a backup document.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Parse` if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, BackupError> {
        serde_json::from_str(text).map_err(BackupError::Parse)
    }

    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Serialize` if serialization fails.
    pub fn to_json(&self) -> Result<String, BackupError> {
        serde_json::to_string_pretty(self).map_err(BackupError::Serialize)
    }

    /// Total number of records across all collections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.invoices.len()
            + self.expenses.len()
            + self.withdrawals.len()
            + self.monthly_summaries.len()
            + self.yearly_summaries.len()
            + self.orders.len()
    }
}

/// How an imported document is applied to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Clear every collection, then insert.
    Replace,
    /// Upsert by primary key, keeping records absent from the document.
    Merge,
}

impl ImportMode {
    /// User-facing message when the import fails.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Replace => "Failed to import database. Please check the file format.",
            Self::Merge => "Failed to merge database. Please check the file format.",
        }
    }
}

/// Default file name for an export made on `date`.
#[must_use]
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("onchaincounting-backup-{}.json", date.format("%Y-%m-%d"))
}
