//! Storage layer
//!
//! JSON-file backed stores plus the coordination pieces on top of them:
//! the per-account lock table and the atomic mutation scope.

pub mod accounts;
pub mod failures;
pub mod file_io;
pub mod init;
pub(crate) mod journal;
pub mod locks;
pub mod scope;
pub mod transactions;

pub use accounts::AccountStore;
pub use failures::{FailureEntry, FailureLog};
pub use init::{initialize_storage, needs_initialization};
pub use locks::{AccountLocks, LockSet};
pub use scope::AtomicScope;
pub use transactions::TransactionLog;

use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerError;

/// All stores for one data directory
pub struct Storage {
    paths: LedgerPaths,
    settings: Settings,
    pub accounts: AccountStore,
    pub transactions: TransactionLog,
    pub failures: FailureLog,
    locks: AccountLocks,
}

impl Storage {
    /// Create stores over the files under `paths`, reading the persisted
    /// settings. No store data is read yet; call
    /// [`load_all`](Self::load_all) before use.
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        let settings = Settings::load_or_create(&paths)?;
        Ok(Self {
            accounts: AccountStore::new(paths.accounts_file()),
            transactions: TransactionLog::new(paths.transactions_file()),
            failures: FailureLog::new(paths.failures_file()),
            locks: AccountLocks::new(),
            settings,
            paths,
        })
    }

    /// Load every store from disk, rolling back any commit that was
    /// interrupted mid-write first
    pub fn load_all(&self) -> Result<(), LedgerError> {
        journal::recover(
            &self.paths.journal_file(),
            self.accounts.path(),
            self.transactions.path(),
        )?;

        self.accounts.load()?;
        self.transactions.load()?;
        self.failures.load()?;
        Ok(())
    }

    /// Start an all-or-nothing mutation over accounts and the log
    pub fn begin(&self) -> AtomicScope<'_> {
        AtomicScope::new(&self.accounts, &self.transactions, self.paths.journal_file())
    }

    /// The per-account lock table
    pub fn locks(&self) -> &AccountLocks {
        &self.locks
    }

    /// The settings this storage was opened with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The paths this storage is rooted at
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }
}
