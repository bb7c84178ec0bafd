//! Invoices and their cached EUR amounts.
//!
//! The EUR columns of an invoice are derived once, when the invoice is
//! created or replaced, and never recomputed on read.

pub mod error;
pub mod service;
pub mod types;

pub use error::InvoiceError;
pub use service::InvoiceService;
pub use types::{CryptoPayment, Invoice, InvoiceDraft};
