//! Recorded crypto-to-fiat withdrawals.

use chrono::{DateTime, Utc};
use onchaincounting_shared::types::WithdrawalId;
use serde::{Deserialize, Serialize};

use crate::currency::{BlockchainNetwork, CryptoCurrency, NonFiniteAmount, finite};

text_enum! {
    /// Withdrawal lifecycle.
    pub enum WithdrawalStatus {
        /// Submitted, not yet settled.
        Pending => "pending",
        /// EUR received.
        Completed => "completed",
        /// Rejected or reverted.
        Failed => "failed",
    }
}

/// A token amount converted to EUR through the off-ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Withdrawal ID.
    pub id: WithdrawalId,
    /// Execution date.
    pub date: DateTime<Utc>,
    /// Token amount sent.
    pub source_amount: f64,
    /// Token sent.
    pub source_currency: CryptoCurrency,
    /// Network the token was sent on.
    pub source_network: BlockchainNetwork,
    /// EUR received.
    pub target_amount: f64,
    /// Rate applied by the off-ramp.
    pub exchange_rate: f64,
    /// On-chain transaction hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// Lifecycle status.
    pub status: WithdrawalStatus,
    /// Payment institution reference.
    #[serde(
        default,
        alias = "moneuriumReference",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_reference: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Withdrawal form input.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalDraft {
    /// Execution date.
    pub date: DateTime<Utc>,
    /// Token amount sent.
    pub source_amount: f64,
    /// Token sent.
    pub source_currency: CryptoCurrency,
    /// Network the token was sent on.
    pub source_network: BlockchainNetwork,
    /// EUR received.
    pub target_amount: f64,
    /// Rate applied by the off-ramp.
    pub exchange_rate: f64,
    /// On-chain transaction hash.
    pub transaction_hash: Option<String>,
    /// Lifecycle status.
    pub status: WithdrawalStatus,
    /// Payment institution reference.
    pub external_reference: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl WithdrawalDraft {
    /// Rejects NaN or infinite amounts and rate.
    pub fn validate(&self) -> Result<(), NonFiniteAmount> {
        finite(self.source_amount, "source amount")?;
        finite(self.target_amount, "target amount")?;
        finite(self.exchange_rate, "exchange rate")?;
        Ok(())
    }
}

impl Withdrawal {
    /// Builds a new withdrawal stamped with `now`.
    #[must_use]
    pub fn create(draft: WithdrawalDraft, id: WithdrawalId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            date: draft.date,
            source_amount: draft.source_amount,
            source_currency: draft.source_currency,
            source_network: draft.source_network,
            target_amount: draft.target_amount,
            exchange_rate: draft.exchange_rate,
            transaction_hash: draft.transaction_hash,
            status: draft.status,
            external_reference: draft.external_reference,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replace keeping id and creation time.
    #[must_use]
    pub fn replace(&self, draft: WithdrawalDraft, now: DateTime<Utc>) -> Self {
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

    fn draft() -> WithdrawalDraft {
        WithdrawalDraft {
            date: Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap(),
            source_amount: 1000.0,
            source_currency: CryptoCurrency::Usdc,
            source_network: BlockchainNetwork::Gnosis,
            target_amount: 920.0,
            exchange_rate: 0.92,
            transaction_hash: Some("0xabc".to_string()),
            status: WithdrawalStatus::Completed,
            external_reference: None,
            notes: None,
        }
    }

    #[test]
    fn test_replace_keeps_identity() {
        let created = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap();
        let withdrawal = Withdrawal::create(draft(), WithdrawalId::new(), created);

        let mut edit = draft();
        edit.status = WithdrawalStatus::Failed;
        let later = Utc.with_ymd_and_hms(2024, 4, 3, 12, 0, 0).unwrap();
        let replaced = withdrawal.replace(edit, later);

        assert_eq!(replaced.id, withdrawal.id);
        assert_eq!(replaced.created_at, created);
        assert_eq!(replaced.status, WithdrawalStatus::Failed);
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        assert!(draft().validate().is_ok());

        let mut input = draft();
        input.exchange_rate = 920.0 / 0.0;
        assert_eq!(input.validate(), Err(NonFiniteAmount("exchange rate")));

        let mut input = draft();
        input.target_amount = f64::NAN;
        assert_eq!(input.validate(), Err(NonFiniteAmount("target amount")));
    }

    #[test]
    fn test_accepts_legacy_reference_key() {
        let mut json = serde_json::to_value(Withdrawal::create(
            draft(),
            WithdrawalId::new(),
            Utc::now(),
        ))
        .unwrap();
        json["moneuriumReference"] = serde_json::json!("ref-1");

        let parsed: Withdrawal = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.external_reference.as_deref(), Some("ref-1"));
    }
}
