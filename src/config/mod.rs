//! Configuration for the ledger
//!
//! This module provides configuration management:
//! - XDG-compliant path resolution
//! - Persisted engine settings

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
