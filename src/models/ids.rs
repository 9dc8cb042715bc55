//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. Identifiers are assigned by the stores on
//! creation and are immutable afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw store-assigned identifier
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw identifier value
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(AccountId, "acc-");
define_id!(TransactionId, "txn-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = AccountId::new(42);
        assert_eq!(format!("{}", id), "acc-42");
        assert_eq!(format!("{}", TransactionId::new(7)), "txn-7");
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("acc-42".parse::<AccountId>().unwrap(), AccountId::new(42));
        assert_eq!("42".parse::<AccountId>().unwrap(), AccountId::new(42));
        assert!("acc-x".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_id_ordering() {
        assert!(AccountId::new(1) < AccountId::new(2));
    }

    #[test]
    fn test_id_serialization() {
        let id = AccountId::new(9);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "9");
        let deserialized: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
