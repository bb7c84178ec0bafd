//! Dashboard and tax report aggregation.
//!
//! This module provides pure business logic for:
//! - Yearly totals by native currency and in EUR
//! - Monthly series with running cumulative totals
//! - Monthly invoice listings
//! - Tax and profit/loss figures
//! - Persisted summary snapshots

mod offramp;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use offramp::Offramp;
pub use service::{ReportService, format_amount};
pub use types::*;
