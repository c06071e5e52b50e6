//! Data models for fintrack entities.
//!
//! This module contains the data structures exchanged with the Finance
//! Tracker API:
//!
//! - `User`: authenticated user profile
//! - `Account`, `NewAccount`: bank/cash accounts and their balances
//! - `Transaction`, `NewTransaction`: income and expense records
//! - `Category`, `NewCategory`: transaction categorization
//! - `Budget`, `NewBudget`: monthly per-category spending limits

pub mod account;
pub mod budget;
pub mod category;
pub mod transaction;
pub mod user;

pub use account::{Account, NewAccount};
pub use budget::{Budget, NewBudget};
pub use category::{Category, NewCategory};
pub use transaction::{NewTransaction, Transaction};
pub use user::User;
