//! Core data models for the ledger
//!
//! This module contains the data structures that represent the ledger
//! domain: accounts, transactions, amounts, and their identifiers.

pub mod account;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use ids::{AccountId, TransactionId};
pub use money::Money;
pub use transaction::{Transaction, TransactionKind};
