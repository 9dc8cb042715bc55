//! bank-ledger: a durable account ledger engine
//!
//! Accounts live in JSON-file stores under a configurable data directory;
//! every balance mutation commits atomically with its transaction record,
//! so the log is a complete audit trail and balances can never drift from
//! it. A batch component replays recorded transactions with per-item
//! failure isolation.
//!
//! Typical embedding:
//!
//! ```no_run
//! use bank_ledger::config::LedgerPaths;
//! use bank_ledger::models::{AccountKind, Money};
//! use bank_ledger::services::LedgerService;
//! use bank_ledger::storage::{initialize_storage, Storage};
//!
//! # fn main() -> Result<(), bank_ledger::LedgerError> {
//! let paths = LedgerPaths::new()?;
//! initialize_storage(&paths)?;
//!
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let ledger = LedgerService::new(&storage);
//! let account = ledger.create_account("Alice", AccountKind::Checking)?;
//! ledger.deposit(account.id, Money::from_major(100))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
