//! Reporting year boundaries.

pub mod period;

pub use period::{ReportingYear, local_midnight};
