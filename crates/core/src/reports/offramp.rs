//! Sources of off-ramp totals.
//!
//! The dashboard can count EUR payouts either from mirrored institution
//! orders or from manually recorded withdrawals. Both feed the same
//! aggregation through [`Offramp`].

use chrono::{DateTime, Utc};

use crate::order::{Order, OrderKind};
use crate::withdrawal::Withdrawal;

/// An entity that may represent EUR leaving the crypto side.
pub trait Offramp {
    /// Date the payout counts on.
    fn effective_at(&self) -> DateTime<Utc>;

    /// EUR paid out.
    fn offramp_eur(&self) -> f64;

    /// Whether this entity counts as an off-ramp at all.
    fn is_offramp(&self) -> bool {
        true
    }
}

impl Offramp for Order {
    fn effective_at(&self) -> DateTime<Utc> {
        Self::effective_at(self)
    }

    fn offramp_eur(&self) -> f64 {
        self.amount
    }

    fn is_offramp(&self) -> bool {
        self.kind == OrderKind::Redeem
    }
}

impl Offramp for Withdrawal {
    fn effective_at(&self) -> DateTime<Utc> {
        self.date
    }

    fn offramp_eur(&self) -> f64 {
        self.target_amount
    }
}
