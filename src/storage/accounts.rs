//! Account store
//!
//! Keyed storage of account records backed by accounts.json. The store
//! assigns identifiers on creation and exposes the CRUD contract the ledger
//! engine builds on; multi-account mutations go through
//! [`AtomicScope`](super::scope::AtomicScope) instead of `update`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::LedgerError;
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable account store contents
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct AccountData {
    next_id: i64,
    accounts: Vec<Account>,
}

/// Durable keyed storage for accounts
pub struct AccountStore {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
    next_id: AtomicI64,
}

impl AccountStore {
    /// Create a new account store over the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self.write_guard()?;
        data.clear();

        let mut highest = 0;
        for account in file_data.accounts {
            highest = highest.max(account.id.value());
            data.insert(account.id, account);
        }
        self.next_id
            .store(file_data.next_id.max(highest + 1).max(1), Ordering::SeqCst);

        Ok(())
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        let data = self.read_guard()?;
        Ok(data.get(&id).cloned())
    }

    /// Get all accounts, ordered by ID
    pub fn get_all(&self) -> Result<Vec<Account>, LedgerError> {
        let data = self.read_guard()?;
        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    /// Store a new account, assigning its identifier. Returns the stored
    /// account with the id filled in.
    pub fn create(&self, mut account: Account) -> Result<Account, LedgerError> {
        account.id = AccountId::new(self.next_id.fetch_add(1, Ordering::SeqCst));

        let mut data = self.write_guard()?;
        data.insert(account.id, account.clone());

        if let Err(e) = self.persist_locked(&data) {
            data.remove(&account.id);
            return Err(e);
        }

        Ok(account)
    }

    /// Replace an existing account record. Returns `false` if the targeted
    /// record no longer exists; the caller decides whether that is an error.
    pub fn update(&self, account: Account) -> Result<bool, LedgerError> {
        let mut data = self.write_guard()?;

        let Some(previous) = data.get(&account.id).cloned() else {
            return Ok(false);
        };
        data.insert(account.id, account.clone());

        if let Err(e) = self.persist_locked(&data) {
            data.insert(account.id, previous);
            return Err(e);
        }

        Ok(true)
    }

    /// Delete an account. Returns `false` if it did not exist.
    pub fn delete(&self, id: AccountId) -> Result<bool, LedgerError> {
        let mut data = self.write_guard()?;

        let Some(previous) = data.remove(&id) else {
            return Ok(false);
        };

        if let Err(e) = self.persist_locked(&data) {
            data.insert(id, previous);
            return Err(e);
        }

        Ok(true)
    }

    /// Count accounts
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_guard()?.len())
    }

    /// Write lock over the live map, for atomic-scope commits
    pub(crate) fn guard_mut(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<AccountId, Account>>, LedgerError> {
        self.write_guard()
    }

    /// Persist the given map snapshot; the caller holds the write guard
    pub(crate) fn persist_locked(
        &self,
        data: &HashMap<AccountId, Account>,
    ) -> Result<(), LedgerError> {
        write_json_atomic(&self.path, &self.encode_locked(data)?)
    }

    /// Encode the given map snapshot as the on-disk document
    pub(crate) fn encode_locked(
        &self,
        data: &HashMap<AccountId, Account>,
    ) -> Result<serde_json::Value, LedgerError> {
        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by_key(|a| a.id);

        let file_data = AccountData {
            next_id: self.next_id.load(Ordering::SeqCst),
            accounts,
        };
        serde_json::to_value(file_data)
            .map_err(|e| LedgerError::Persistence(format!("Failed to encode accounts: {}", e)))
    }

    /// The backing file path
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read_guard(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<AccountId, Account>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Persistence(format!("Account store lock poisoned: {}", e)))
    }

    fn write_guard(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<AccountId, Account>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Persistence(format!("Account store lock poisoned: {}", e)))
    }
}
