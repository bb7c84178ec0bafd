//! Order data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

text_enum! {
    /// Direction of an order as seen by the account holder.
    pub enum OrderKind {
        /// EUR received and minted on chain (incoming).
        Issue => "issue",
        /// Tokens burned and EUR paid out (outgoing off-ramp).
        Redeem => "redeem",
    }
}

text_enum! {
    /// Order lifecycle state.
    pub enum OrderState {
        /// Submitted by the user.
        Placed => "placed",
        /// Awaiting processing.
        Pending => "pending",
        /// Settled.
        Processed => "processed",
        /// Refused.
        Rejected => "rejected",
    }
}

/// Where the money came from or went to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "standard", rename_all = "lowercase")]
pub enum CounterpartIdentifier {
    /// Bank account.
    Iban {
        /// Account number.
        iban: String,
    },
    /// On-chain address.
    Chain {
        /// Wallet address.
        address: String,
        /// Chain name.
        chain: String,
    },
}

/// Descriptive counterpart fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartDetails {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Order counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterpart {
    /// Account identifier.
    pub identifier: CounterpartIdentifier,
    /// Descriptive fields.
    #[serde(default)]
    pub details: CounterpartDetails,
}

impl Counterpart {
    /// Returns true when the counterpart is a bank account.
    #[must_use]
    pub const fn is_iban(&self) -> bool {
        matches!(self.identifier, CounterpartIdentifier::Iban { .. })
    }
}

/// Order timestamps and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMeta {
    /// Lifecycle state.
    pub state: OrderState,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// When the order was approved, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

/// A mirrored payment institution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID assigned by the institution.
    pub id: String,
    /// Direction.
    pub kind: OrderKind,
    /// EUR amount.
    #[serde(deserialize_with = "amount_from_text_or_number")]
    pub amount: f64,
    /// Counterpart account.
    pub counterpart: Counterpart,
    /// Payment reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Timestamps and state.
    pub meta: OrderMeta,
    /// Local time of the sync that last wrote this order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,
}

impl Order {
    /// Date the order counts on: approval if present, else placement.
    #[must_use]
    pub fn effective_at(&self) -> DateTime<Utc> {
        self.meta.approved_at.unwrap_or(self.meta.placed_at)
    }

    /// Returns true for incoming orders.
    #[must_use]
    pub const fn is_incoming(&self) -> bool {
        matches!(self.kind, OrderKind::Issue)
    }
}

/// Token balance held at the institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Currency code.
    pub currency: String,
    /// Amount held.
    #[serde(deserialize_with = "amount_from_text_or_number")]
    pub amount: f64,
    /// Chain the tokens live on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

/// The institution reports amounts as decimal strings; local data uses numbers.
fn amount_from_text_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
