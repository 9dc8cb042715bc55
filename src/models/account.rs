//! Account model
//!
//! Represents a named holder of a non-negative balance. Balances are only
//! mutated by the ledger engine; callers never write them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// The fixed set of account categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Savings account
    Savings,
    /// Checking account
    Checking,
    /// Business account
    Business,
}

impl AccountKind {
    /// Parse an account kind from text; `None` for anything outside the
    /// fixed set
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "savings" => Some(Self::Savings),
            "checking" => Some(Self::Checking),
            "business" => Some(Self::Business),
            _ => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Savings => write!(f, "Savings"),
            Self::Checking => write!(f, "Checking"),
            Self::Business => write!(f, "Business"),
        }
    }
}

/// A ledger account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier, immutable after creation
    pub id: AccountId,

    /// Name of the account owner
    pub owner_name: String,

    /// Account category
    pub kind: AccountKind,

    /// Current balance; never negative after a committed operation
    pub balance: Money,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the balance last changed
    pub updated_at: DateTime<Utc>,
}

/// Placeholder id for accounts that have not been stored yet
pub(crate) const UNASSIGNED_ACCOUNT_ID: AccountId = AccountId::new(0);

impl Account {
    /// Create a new account with a zero balance. The id is assigned when
    /// the account is handed to the store.
    pub fn new(owner_name: impl Into<String>, kind: AccountKind) -> Self {
        let now = Utc::now();
        Self {
            id: UNASSIGNED_ACCOUNT_ID,
            owner_name: owner_name.into(),
            kind,
            balance: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the account fields
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.owner_name.trim().is_empty() {
            return Err(AccountValidationError::EmptyOwnerName);
        }
        if self.balance.is_negative() {
            return Err(AccountValidationError::NegativeBalance);
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.owner_name, self.kind, self.id)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyOwnerName,
    NegativeBalance,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyOwnerName => write!(f, "Owner name cannot be empty"),
            Self::NegativeBalance => write!(f, "Balance cannot be negative"),
        }
    }
}

impl std::error::Error for AccountValidationError {}
