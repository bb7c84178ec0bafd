//! Core bookkeeping logic for onchaincounting.
//!
//! This crate contains pure business logic with ZERO database or I/O dependencies.
//! All domain types, derivation rules, and aggregations live here.
//!
//! # Modules
//!
//! - `currency` - Native, crypto and reporting currencies
//! - `invoice` - Invoices and their cached EUR amounts
//! - `expense` - Business expenses
//! - `withdrawal` - Recorded crypto-to-fiat withdrawals
//! - `order` - Mirrored payment institution orders and balances
//! - `fiscal` - Reporting year boundaries
//! - `reports` - Dashboard and tax report aggregation
//! - `backup` - JSON export/import document
//! - `extraction` - Best-effort invoice field extraction from document text

#[macro_use]
mod text_enum;

pub mod backup;
pub mod currency;
pub mod expense;
pub mod extraction;
pub mod fiscal;
pub mod invoice;
pub mod order;
pub mod reports;
pub mod withdrawal;

pub use text_enum::UnknownVariant;
