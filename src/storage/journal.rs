//! Commit journal
//!
//! The atomic scope rewrites two files per commit, and two renames cannot
//! share a durability point. Before touching either file the scope writes
//! their current contents to a journal; the journal is the undo record. If
//! the process dies between the rewrites, the next load finds the journal
//! and puts both files back to their pre-commit state, so a balance change
//! can never survive on disk without its transaction record.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

use super::file_io::{read_json, write_json_atomic};

/// Pre-commit contents of the account and transaction files
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct CommitJournal {
    pub accounts: serde_json::Value,
    pub transactions: serde_json::Value,
}

impl CommitJournal {
    /// Durably record this journal at `path`
    pub fn write(&self, path: &Path) -> Result<(), LedgerError> {
        write_json_atomic(path, self)
    }

    /// Rewrite both store files from the journalled contents
    pub fn restore(
        &self,
        accounts_path: &Path,
        transactions_path: &Path,
    ) -> Result<(), LedgerError> {
        write_json_atomic(accounts_path, &self.accounts)?;
        write_json_atomic(transactions_path, &self.transactions)?;
        Ok(())
    }
}

/// Roll back an interrupted commit, if one left a journal behind
pub(crate) fn recover(
    journal_path: &Path,
    accounts_path: &Path,
    transactions_path: &Path,
) -> Result<(), LedgerError> {
    if !journal_path.exists() {
        return Ok(());
    }

    let journal: CommitJournal = read_json(journal_path)?;
    journal.restore(accounts_path, transactions_path)?;
    fs::remove_file(journal_path).map_err(|e| {
        LedgerError::Persistence(format!("Failed to remove commit journal: {}", e))
    })?;

    Ok(())
}
