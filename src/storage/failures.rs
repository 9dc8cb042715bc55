//! Batch failure log
//!
//! Durable side log of batch replay errors backed by failures.json. Each
//! entry captures the failed item and the reason, so a batch can be audited
//! after the fact without stopping on individual failures.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

use super::file_io::{read_json, write_json_atomic};

/// A single recorded batch failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Entry identifier
    pub id: Uuid,

    /// Kind tag of the failed transaction
    pub kind: String,

    /// Rendered fields of the failed transaction
    pub details: String,

    /// The failure message from the engine
    pub message: String,

    /// When the failure was captured
    pub recorded_at: DateTime<Utc>,
}

impl FailureEntry {
    /// Capture a failure at the current time
    pub fn new(
        kind: impl Into<String>,
        details: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            details: details.into(),
            message: message.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Serializable failure log contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct FailureData {
    entries: Vec<FailureEntry>,
}

/// Durable append-only log of batch replay failures
pub struct FailureLog {
    path: PathBuf,
    data: RwLock<Vec<FailureEntry>>,
}

impl FailureLog {
    /// Create a new failure log over the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load entries from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: FailureData = read_json(&self.path)?;
        let mut data = self.write_guard()?;
        *data = file_data.entries;
        Ok(())
    }

    /// Append a failure entry
    pub fn append(&self, entry: FailureEntry) -> Result<(), LedgerError> {
        let mut data = self.write_guard()?;
        data.push(entry);

        if let Err(e) = self.persist_locked(&data) {
            data.pop();
            return Err(e);
        }

        Ok(())
    }

    /// All entries in capture order
    pub fn get_all(&self) -> Result<Vec<FailureEntry>, LedgerError> {
        Ok(self.read_guard()?.clone())
    }

    /// Count entries
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_guard()?.len())
    }

    fn persist_locked(&self, data: &[FailureEntry]) -> Result<(), LedgerError> {
        let file_data = FailureData {
            entries: data.to_vec(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Vec<FailureEntry>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Persistence(format!("Failure log lock poisoned: {}", e)))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Vec<FailureEntry>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Persistence(format!("Failure log lock poisoned: {}", e)))
    }
}
