//! Payment institution orders mirrored into local storage.
//!
//! Orders are read-only facts owned by the payment institution. Locally they
//! are only upserted during a sync, stamped with the time of that sync.

mod filter;
mod source;
mod types;

pub use filter::{Direction, OrderFilter, OrderMonthGroup, OrderYearGroup, Rail, group_by_period};
pub use source::{PaymentInstitution, SourceError, SyncStatus};
pub use types::{
    Balance, Counterpart, CounterpartDetails, CounterpartIdentifier, Order, OrderKind, OrderMeta,
    OrderState,
};
