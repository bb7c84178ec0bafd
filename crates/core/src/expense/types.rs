//! Expense data types.

use chrono::{DateTime, Utc};
use onchaincounting_shared::types::ExpenseId;
use serde::{Deserialize, Serialize};

use crate::currency::{ExpenseCurrency, NonFiniteAmount, finite};

text_enum! {
    /// Expense classification.
    pub enum ExpenseCategory {
        /// Software licenses and tools.
        Software => "software",
        /// Hardware purchases.
        Hardware => "hardware",
        /// Recurring subscriptions.
        Subscription => "subscription",
        /// Contracted services.
        Service => "service",
        /// Anything else.
        Other => "other",
    }
}

/// A business expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Payment date.
    pub date: DateTime<Utc>,
    /// Category.
    pub category: ExpenseCategory,
    /// What was paid for.
    pub description: String,
    /// Amount in `currency`.
    pub amount: f64,
    /// Payment currency.
    pub currency: ExpenseCurrency,
    /// Whether input VAT can be deducted.
    pub vat_deductible: bool,
    /// Path of the receipt file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Expense form input.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// Payment date.
    pub date: DateTime<Utc>,
    /// Category.
    pub category: ExpenseCategory,
    /// What was paid for.
    pub description: String,
    /// Amount in `currency`.
    pub amount: f64,
    /// Payment currency.
    pub currency: ExpenseCurrency,
    /// Whether input VAT can be deducted.
    pub vat_deductible: bool,
    /// Path of the receipt file.
    pub receipt: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl ExpenseDraft {
    /// Rejects a NaN or infinite amount.
    pub fn validate(&self) -> Result<(), NonFiniteAmount> {
        finite(self.amount, "amount").map(|_| ())
    }
}

impl Expense {
    /// Builds a new expense stamped with `now`.
    #[must_use]
    pub fn create(draft: ExpenseDraft, id: ExpenseId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            date: draft.date,
            category: draft.category,
            description: draft.description,
            amount: draft.amount,
            currency: draft.currency,
            vat_deductible: draft.vat_deductible,
            receipt: draft.receipt,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replace keeping id and creation time.
    #[must_use]
    pub fn replace(&self, draft: ExpenseDraft, now: DateTime<Utc>) -> Self {
        Self {
            created_at: self.created_at,
            ..Self::create(draft, self.id, now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn draft(amount: f64) -> ExpenseDraft {
        ExpenseDraft {
            date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            category: ExpenseCategory::Software,
            description: "IDE license".to_string(),
            amount,
            currency: ExpenseCurrency::Eur,
            vat_deductible: true,
            receipt: None,
            notes: None,
        }
    }

    #[test]
    fn test_replace_keeps_identity() {
        let created = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let expense = Expense::create(draft(10.0), ExpenseId::new(), created);

        let later = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let replaced = expense.replace(draft(25.0), later);

        assert_eq!(replaced.id, expense.id);
        assert_eq!(replaced.created_at, created);
        assert_eq!(replaced.updated_at, later);
        assert!((replaced.amount - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_non_finite_amount() {
        assert!(draft(10.0).validate().is_ok());
        assert_eq!(draft(f64::NAN).validate(), Err(NonFiniteAmount("amount")));
        assert_eq!(
            draft(f64::NEG_INFINITY).validate(),
            Err(NonFiniteAmount("amount"))
        );
    }

    #[test]
    fn test_category_round_trips_through_text() {
        for category in ExpenseCategory::ALL {
            assert_eq!(
                ExpenseCategory::from_str(category.as_str()).unwrap(),
                *category
            );
        }
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let expense = Expense::create(draft(10.0), ExpenseId::new(), Utc::now());
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["vatDeductible"], true);
        assert_eq!(json["category"], "software");
        assert!(json.get("receipt").is_none());
    }
}
