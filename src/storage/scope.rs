//! Atomic mutation scope
//!
//! Groups account updates and one transaction-log append into a single
//! commit/rollback unit. The commit applies everything while holding write
//! guards on both stores simultaneously, so no reader can observe one
//! balance changed without the other, or a balance change without its
//! record. On disk, the pre-commit contents of both files go to a commit
//! journal before either file is rewritten; a persistence failure (or a
//! crash mid-commit, via journal recovery on the next load) rolls state
//! back before anything inconsistent becomes durable.

use std::fs;
use std::path::PathBuf;

use crate::error::LedgerError;
use crate::models::{Account, Transaction};

use super::accounts::AccountStore;
use super::journal::CommitJournal;
use super::transactions::TransactionLog;

/// A pending all-or-nothing mutation
pub struct AtomicScope<'a> {
    accounts: &'a AccountStore,
    log: &'a TransactionLog,
    journal_path: PathBuf,
    updates: Vec<Account>,
    append: Option<Transaction>,
}

impl<'a> AtomicScope<'a> {
    pub(crate) fn new(
        accounts: &'a AccountStore,
        log: &'a TransactionLog,
        journal_path: PathBuf,
    ) -> Self {
        Self {
            accounts,
            log,
            journal_path,
            updates: Vec::new(),
            append: None,
        }
    }

    /// Stage a replacement for an existing account record
    pub fn update_account(&mut self, account: Account) {
        self.updates.push(account);
    }

    /// Stage the single transaction record this scope will append
    pub fn append_transaction(&mut self, txn: Transaction) {
        debug_assert!(self.append.is_none(), "a scope appends exactly one record");
        self.append = Some(txn);
    }

    /// Commit all staged mutations, or leave no trace.
    ///
    /// Returns the appended record with its assigned id.
    pub fn commit(self) -> Result<Option<Transaction>, LedgerError> {
        let mut accounts = self.accounts.guard_mut()?;
        let mut log = self.log.guard_mut()?;

        // A staged row that vanished is an update() returning false; the
        // scope treats that as a persistence failure, never a silent skip.
        let mut previous = Vec::with_capacity(self.updates.len());
        for account in &self.updates {
            match accounts.get(&account.id) {
                Some(existing) => previous.push(existing.clone()),
                None => {
                    return Err(LedgerError::Persistence(format!(
                        "Account {} no longer exists; update rejected",
                        account.id
                    )))
                }
            }
        }

        // Undo record: both files' current contents, made durable before
        // either file is rewritten
        let journal = CommitJournal {
            accounts: self.accounts.encode_locked(&accounts)?,
            transactions: self.log.encode_locked(&log)?,
        };

        for account in &self.updates {
            accounts.insert(account.id, account.clone());
        }

        let appended = self.append.map(|mut txn| {
            txn.id = self.log.assign_id();
            log.push(txn.clone());
            txn
        });

        if let Err(e) = journal.write(&self.journal_path) {
            roll_back(&mut accounts, &mut log, previous, appended.is_some());
            return Err(e);
        }

        let persisted = self
            .accounts
            .persist_locked(&accounts)
            .and_then(|_| self.log.persist_locked(&log));

        if let Err(e) = persisted {
            roll_back(&mut accounts, &mut log, previous, appended.is_some());
            // Put the files back to their journalled contents; if that
            // fails too, the journal stays and the next load restores them
            if journal
                .restore(self.accounts.path(), self.log.path())
                .is_ok()
            {
                let _ = fs::remove_file(&self.journal_path);
            }
            return Err(e);
        }

        if let Err(e) = fs::remove_file(&self.journal_path) {
            // A journal that cannot be cleared would undo this commit on
            // the next load, so fail the commit and revert now
            roll_back(&mut accounts, &mut log, previous, appended.is_some());
            let _ = journal.restore(self.accounts.path(), self.log.path());
            return Err(LedgerError::Persistence(format!(
                "Failed to remove commit journal: {}",
                e
            )));
        }

        Ok(appended)
    }
}

fn roll_back(
    accounts: &mut std::collections::HashMap<crate::models::AccountId, Account>,
    log: &mut Vec<Transaction>,
    previous: Vec<Account>,
    appended: bool,
) {
    for account in previous {
        accounts.insert(account.id, account);
    }
    if appended {
        log.pop();
    }
}
