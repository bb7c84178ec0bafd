//! `SeaORM` entity definitions.
//!
//! Enumerations are stored as their text form and amounts as nullable
//! `REAL` columns: SQLite turns NaN into NULL, so NULL reads back as NaN.

pub mod expenses;
pub mod invoices;
pub mod monthly_summaries;
pub mod orders;
pub mod sync_state;
pub mod withdrawals;
pub mod yearly_summaries;

use sea_orm::DbErr;

pub(crate) fn amount_to_column(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

pub(crate) fn amount_from_column(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

pub(crate) fn parse_text<T>(column: &str, value: &str) -> Result<T, DbErr>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| DbErr::Type(format!("{column}: {e}")))
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DbErr> {
    serde_json::to_value(value).map_err(|e| DbErr::Json(e.to_string()))
}

pub(crate) fn from_json<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, DbErr> {
    serde_json::from_value(value).map_err(|e| DbErr::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_maps_to_null_and_back() {
        assert_eq!(amount_to_column(f64::NAN), None);
        assert!(amount_from_column(None).is_nan());
        assert_eq!(amount_to_column(f64::INFINITY), Some(f64::INFINITY));
        assert_eq!(amount_from_column(Some(1.5)).to_bits(), 1.5f64.to_bits());
    }
}
