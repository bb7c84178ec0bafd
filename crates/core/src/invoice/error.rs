//! Invoice error types.

use thiserror::Error;

/// Errors raised while validating an invoice draft.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvoiceError {
    /// A required field was left empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A monetary field or rate was negative.
    #[error("{0} must not be negative")]
    NegativeValue(&'static str),

    /// A monetary field or rate was NaN or infinite.
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    /// VAT rate outside 0..=100 percent.
    #[error("VAT rate must be between 0 and 100, got {0}")]
    VatRateOutOfRange(f64),
}
