//! Conversion into the reporting currency.
//!
//! Exchange rates are EUR/CUR quotes: units of the native currency per
//! one EUR. Amounts stay `f64` end to end and are never rounded here;
//! rounding is a display concern.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Currency every summary is normalized into.
pub const REPORTING_CURRENCY: &str = "EUR";

/// Converts a native amount into EUR using an EUR/CUR quote.
///
/// A zero rate yields a non-finite result instead of panicking.
#[must_use]
pub fn to_reporting(amount: f64, exchange_rate: f64) -> f64 {
    amount * (1.0 / exchange_rate)
}

/// Turns a CUR/EUR quote (EUR per unit) into an EUR/CUR quote,
/// rounded to 4 decimal places like quotes printed on invoices.
#[must_use]
pub fn invert_quote(eur_per_unit: f64) -> f64 {
    ((1.0 / eur_per_unit) * 10_000.0).round() / 10_000.0
}

/// An amount field held NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} must be a finite number")]
pub struct NonFiniteAmount(pub &'static str);

/// Returns `value` if it is a real number.
///
/// # Errors
///
/// Returns `NonFiniteAmount` naming `field` for NaN or infinity.
pub fn finite(value: f64, field: &'static str) -> Result<f64, NonFiniteAmount> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NonFiniteAmount(field))
    }
}

/// Reads an amount written as `null`, which is how JSON stores
/// non-finite numbers.
pub(crate) fn amount_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_reporting_divides_by_quote() {
        let eur = to_reporting(120.0, 1.1);
        assert!((eur - 109.090_909_09).abs() < 1e-6);
    }

    #[test]
    fn test_unit_rate_is_identity() {
        assert!((to_reporting(42.5, 1.0) - 42.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_rate_is_non_finite() {
        assert!(!to_reporting(100.0, 0.0).is_finite());
        assert!(to_reporting(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_finite_rejects_nan_and_infinity() {
        assert_eq!(finite(12.5, "amount"), Ok(12.5));
        assert_eq!(finite(f64::NAN, "amount"), Err(NonFiniteAmount("amount")));
        assert_eq!(
            finite(f64::NEG_INFINITY, "amount").unwrap_err().to_string(),
            "amount must be a finite number"
        );
    }

    #[test]
    fn test_invert_quote_rounds_to_four_places() {
        assert!((invert_quote(0.92) - 1.087).abs() < 1e-12);
    }
}
