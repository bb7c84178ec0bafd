//! Native, crypto and reporting currencies.

pub mod conversion;
pub mod types;

pub use conversion::{NonFiniteAmount, REPORTING_CURRENCY, finite, invert_quote, to_reporting};
pub use types::{BlockchainNetwork, CryptoCurrency, Currency, ExpenseCurrency};
