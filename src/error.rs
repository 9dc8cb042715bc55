//! Error types for the ledger engine
//!
//! This module defines the error taxonomy for all ledger operations using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::models::{AccountId, Money};

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Caller supplied an invalid argument (non-positive amount, empty
    /// owner name, transfer to the same account)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Source balance is insufficient for the requested movement
    #[error("Insufficient funds in account {account}: requested {requested}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        requested: Money,
        available: Money,
    },

    /// Store unreachable, a targeted row vanished mid-operation, or an
    /// atomic commit could not complete. No partial mutation is durably
    /// visible when this is returned.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A stored transaction record carries an unrecognized kind tag, or a
    /// transfer record is missing its destination
    #[error("Unknown transaction kind: {0}")]
    UnknownTransactionKind(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Persistence failures leave no partial state behind and may be
    /// retried; every other variant needs caller correction first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Validation("amount must be positive".into());
        assert_eq!(err.to_string(), "Validation error: amount must be positive");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::account_not_found("acc-7");
        assert_eq!(err.to_string(), "Account not found: acc-7");
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_insufficient_funds_error() {
        let err = LedgerError::InsufficientFunds {
            account: AccountId::new(3),
            requested: Money::from_major(100),
            available: Money::from_major(50),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds in account acc-3: requested 100, available 50"
        );
    }

    #[test]
    fn test_persistence_is_retryable() {
        let err = LedgerError::Persistence("store unreachable".into());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
