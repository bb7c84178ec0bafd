//! Business expenses.

mod types;

pub use types::{Expense, ExpenseCategory, ExpenseDraft};
