//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod backup;
pub mod error;
pub mod expense;
pub mod invoice;
pub mod order;
pub mod summary;
pub mod withdrawal;

pub use backup::BackupRepository;
pub use error::{ImportError, RepositoryError};
pub use expense::ExpenseRepository;
pub use invoice::InvoiceRepository;
pub use order::OrderRepository;
pub use summary::SummaryRepository;
pub use withdrawal::WithdrawalRepository;
