//! Per-account mutation locks
//!
//! Every read-modify-write cycle on an account must hold that account's
//! lock. A whole id set is taken all-or-nothing under one mutex, so two
//! transfers over the same pair in opposite directions can never deadlock.
//! Waiting is bounded; on timeout the caller gets a retryable persistence
//! error instead of hanging.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::LedgerError;
use crate::models::AccountId;

/// Lock table serializing conflicting account mutations
#[derive(Default)]
pub struct AccountLocks {
    held: Mutex<HashSet<AccountId>>,
    released: Condvar,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire exclusive access to every account in `ids`, waiting at most
    /// `wait`. Ids are deduplicated and the set is taken atomically.
    pub fn acquire(&self, ids: &[AccountId], wait: Duration) -> Result<LockSet<'_>, LedgerError> {
        let mut ids: Vec<AccountId> = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let deadline = Instant::now() + wait;
        let mut held = self
            .held
            .lock()
            .map_err(|e| LedgerError::Persistence(format!("Account lock table poisoned: {}", e)))?;

        loop {
            if ids.iter().all(|id| !held.contains(id)) {
                held.extend(ids.iter().copied());
                return Ok(LockSet { locks: self, ids });
            }

            let remaining = deadline
                .checked_duration_since(Instant::now())
                .filter(|d| !d.is_zero())
                .ok_or_else(|| {
                    LedgerError::Persistence("Timed out waiting for account locks".into())
                })?;

            held = self
                .released
                .wait_timeout(held, remaining)
                .map_err(|e| {
                    LedgerError::Persistence(format!("Account lock table poisoned: {}", e))
                })?
                .0;
        }
    }
}

/// Exclusive access to a set of accounts; released on drop
pub struct LockSet<'a> {
    locks: &'a AccountLocks,
    ids: Vec<AccountId>,
}

impl Drop for LockSet<'_> {
    fn drop(&mut self) {
        if let Ok(mut held) = self.locks.held.lock() {
            for id in &self.ids {
                held.remove(id);
            }
        }
        self.locks.released.notify_all();
    }
}
