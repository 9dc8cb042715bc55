//! Transaction log
//!
//! Append-only storage of transaction records backed by transactions.json.
//! Records are immutable once appended; queries return newest-first. The
//! on-disk schema stores the kind as a string tag, and decoding an
//! unrecognized tag fails rather than guessing.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{AccountId, Money, Transaction, TransactionId, TransactionKind};

use super::file_io::{read_json, write_json_atomic};

/// On-disk transaction record with a string kind tag
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogRecord {
    id: TransactionId,
    account: AccountId,
    kind: String,
    amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination: Option<AccountId>,
    timestamp: DateTime<Utc>,
}

impl From<&Transaction> for LogRecord {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: txn.id,
            account: txn.account,
            kind: txn.kind.as_str().to_string(),
            // The destination only means something for transfers
            destination: match txn.kind {
                TransactionKind::Transfer => txn.destination,
                _ => None,
            },
            amount: txn.amount,
            timestamp: txn.timestamp,
        }
    }
}

impl LogRecord {
    fn decode(self) -> Result<Transaction, LedgerError> {
        let kind = TransactionKind::parse(&self.kind)
            .ok_or_else(|| LedgerError::UnknownTransactionKind(self.kind.clone()))?;

        Ok(Transaction {
            id: self.id,
            account: self.account,
            kind,
            amount: self.amount,
            destination: self.destination,
            timestamp: self.timestamp,
        })
    }
}

/// Serializable log contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct TransactionData {
    next_id: i64,
    records: Vec<LogRecord>,
}

/// Durable append-only transaction log
pub struct TransactionLog {
    path: PathBuf,
    data: RwLock<Vec<Transaction>>,
    next_id: AtomicI64,
}

impl TransactionLog {
    /// Create a new transaction log over the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Load records from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut highest = 0;
        let mut records = Vec::with_capacity(file_data.records.len());
        for record in file_data.records {
            highest = highest.max(record.id.value());
            records.push(record.decode()?);
        }

        let mut data = self.write_guard()?;
        *data = records;
        self.next_id
            .store(file_data.next_id.max(highest + 1).max(1), Ordering::SeqCst);

        Ok(())
    }

    /// Append a record, assigning its identifier. Returns the stored record
    /// with the id filled in.
    pub fn append(&self, mut txn: Transaction) -> Result<Transaction, LedgerError> {
        txn.id = self.assign_id();

        let mut data = self.write_guard()?;
        data.push(txn.clone());

        if let Err(e) = self.persist_locked(&data) {
            data.pop();
            return Err(e);
        }

        Ok(txn)
    }

    /// All records for an account (as the source side), newest first
    pub fn query_by_account(&self, account: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.read_guard()?;
        let mut records: Vec<_> = data
            .iter()
            .filter(|t| t.account == account)
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// All records, newest first
    pub fn query_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = self.read_guard()?;
        let mut records = data.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Count records
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_guard()?.len())
    }

    /// Take the next record identifier
    pub(crate) fn assign_id(&self) -> TransactionId {
        TransactionId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Write lock over the live records, for atomic-scope commits
    pub(crate) fn guard_mut(&self) -> Result<RwLockWriteGuard<'_, Vec<Transaction>>, LedgerError> {
        self.write_guard()
    }

    /// Persist the given records; the caller holds the write guard
    pub(crate) fn persist_locked(&self, data: &[Transaction]) -> Result<(), LedgerError> {
        write_json_atomic(&self.path, &self.encode_locked(data)?)
    }

    /// Encode the given records as the on-disk document
    pub(crate) fn encode_locked(&self, data: &[Transaction]) -> Result<serde_json::Value, LedgerError> {
        let file_data = TransactionData {
            next_id: self.next_id.load(Ordering::SeqCst),
            records: data.iter().map(LogRecord::from).collect(),
        };
        serde_json::to_value(file_data)
            .map_err(|e| LedgerError::Persistence(format!("Failed to encode transactions: {}", e)))
    }

    /// The backing file path
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Vec<Transaction>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Persistence(format!("Transaction log lock poisoned: {}", e)))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Vec<Transaction>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Persistence(format!("Transaction log lock poisoned: {}", e)))
    }
}

fn sort_newest_first(records: &mut [Transaction]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_log() -> (TempDir, TransactionLog) {
        let temp_dir = TempDir::new().unwrap();
        let log = TransactionLog::new(temp_dir.path().join("transactions.json"));
        log.load().unwrap();
        (temp_dir, log)
    }

    #[test]
    fn test_append_assigns_ids() {
        let (_temp_dir, log) = create_test_log();
        let now = Utc::now();

        let first = log
            .append(Transaction::deposit(
                AccountId::new(1),
                Money::from_major(10),
                now,
            ))
            .unwrap();
        let second = log
            .append(Transaction::withdrawal(
                AccountId::new(1),
                Money::from_major(5),
                now,
            ))
            .unwrap();

        assert_eq!(first.id, TransactionId::new(1));
        assert_eq!(second.id, TransactionId::new(2));
    }

    #[test]
    fn test_queries_are_newest_first() {
        let (_temp_dir, log) = create_test_log();
        let base = Utc::now();

        for i in 0..3 {
            log.append(Transaction::deposit(
                AccountId::new(1),
                Money::from_major(10 + i),
                base + Duration::seconds(i),
            ))
            .unwrap();
        }
        log.append(Transaction::deposit(
            AccountId::new(2),
            Money::from_major(99),
            base + Duration::seconds(10),
        ))
        .unwrap();

        let all = log.query_all().unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let by_account = log.query_by_account(AccountId::new(1)).unwrap();
        assert_eq!(by_account.len(), 3);
        assert_eq!(by_account[0].amount, Money::from_major(12));
    }

    #[test]
    fn test_append_ignores_destination_for_non_transfers() {
        let (_temp_dir, log) = create_test_log();

        let mut deposit =
            Transaction::deposit(AccountId::new(1), Money::from_major(10), Utc::now());
        deposit.destination = Some(AccountId::new(2));
        log.append(deposit).unwrap();

        // A reload goes through the on-disk schema, which drops the field
        log.load().unwrap();
        let all = log.query_all().unwrap();
        assert!(all[0].destination.is_none());
    }

    #[test]
    fn test_transfer_round_trips_destination() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");

        let log = TransactionLog::new(path.clone());
        log.load().unwrap();
        log.append(Transaction::transfer(
            AccountId::new(1),
            AccountId::new(2),
            Money::from_major(10),
            Utc::now(),
        ))
        .unwrap();

        let reloaded = TransactionLog::new(path);
        reloaded.load().unwrap();
        let all = reloaded.query_all().unwrap();
        assert_eq!(all[0].destination, Some(AccountId::new(2)));
    }

    #[test]
    fn test_unknown_kind_tag_fails_decode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");

        std::fs::write(
            &path,
            r#"{
                "next_id": 2,
                "records": [{
                    "id": 1,
                    "account": 1,
                    "kind": "chargeback",
                    "amount": "10",
                    "timestamp": "2026-01-15T12:00:00Z"
                }]
            }"#,
        )
        .unwrap();

        let log = TransactionLog::new(path);
        let result = log.load();
        assert!(matches!(
            result,
            Err(LedgerError::UnknownTransactionKind(tag)) if tag == "chargeback"
        ));
    }

    #[test]
    fn test_append_rolls_back_on_persist_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        std::fs::create_dir(&path).unwrap();

        let log = TransactionLog::new(path);
        let result = log.append(Transaction::deposit(
            AccountId::new(1),
            Money::from_major(10),
            Utc::now(),
        ));

        assert!(matches!(result, Err(LedgerError::Persistence(_))));
        assert_eq!(log.count().unwrap(), 0);
    }
}
