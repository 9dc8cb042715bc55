//! Transaction model
//!
//! An immutable, timestamped record of a balance-affecting event. The kind
//! discriminator plus an optional destination replaces a class hierarchy:
//! only transfers carry a destination account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// Kind of balance movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Increases the account balance
    Deposit,
    /// Decreases the account balance
    Withdrawal,
    /// Moves the amount from the account to the destination account
    Transfer,
}

impl TransactionKind {
    /// The stable tag used in stored records
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }

    /// Parse a stored kind tag; `None` for unrecognized tags
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(Self::Deposit),
            "withdrawal" => Some(Self::Withdrawal),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded balance movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Log-assigned identifier, immutable after append
    pub id: TransactionId,

    /// The account whose balance this record affects (the source, for
    /// transfers)
    pub account: AccountId,

    /// Kind discriminator
    pub kind: TransactionKind,

    /// Movement amount, always strictly positive
    pub amount: Money,

    /// Destination account; present only when `kind` is `Transfer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<AccountId>,

    /// When the movement was applied
    pub timestamp: DateTime<Utc>,
}

/// Placeholder id for records that have not been appended yet
pub(crate) const UNASSIGNED_TRANSACTION_ID: TransactionId = TransactionId::new(0);

impl Transaction {
    /// Build a deposit record
    pub fn deposit(account: AccountId, amount: Money, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: UNASSIGNED_TRANSACTION_ID,
            account,
            kind: TransactionKind::Deposit,
            amount,
            destination: None,
            timestamp,
        }
    }

    /// Build a withdrawal record
    pub fn withdrawal(account: AccountId, amount: Money, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: UNASSIGNED_TRANSACTION_ID,
            account,
            kind: TransactionKind::Withdrawal,
            amount,
            destination: None,
            timestamp,
        }
    }

    /// Build a transfer record from `account` to `destination`
    pub fn transfer(
        account: AccountId,
        destination: AccountId,
        amount: Money,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UNASSIGNED_TRANSACTION_ID,
            account,
            kind: TransactionKind::Transfer,
            amount,
            destination: Some(destination),
            timestamp,
        }
    }

    /// Render the record fields for failure reporting
    pub fn describe(&self) -> String {
        format!(
            "id={}, account={}, amount={}, ts={}",
            self.id, self.account, self.amount, self.timestamp
        )
    }
}
