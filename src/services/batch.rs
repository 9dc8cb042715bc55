//! Batch replay
//!
//! Replays a sequence of transaction records through the engine. Items are
//! independent: a failing item is captured in the failure log and the batch
//! moves on, so one bad record never blocks the rest.

use tracing::{error, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Transaction, TransactionKind};
use crate::storage::{FailureEntry, Storage};

use super::ledger::LedgerService;

/// Outcome counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub applied: usize,
    pub failed: usize,
}

/// Sequential replay of transaction batches
pub struct BatchProcessor<'a> {
    storage: &'a Storage,
    service: LedgerService<'a>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            service: LedgerService::new(storage),
        }
    }

    /// Replay every item, recording failures instead of propagating them
    pub fn process_all(&self, items: &[Transaction]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for item in items {
            match self.replay(item) {
                Ok(()) => summary.applied += 1,
                Err(e) => {
                    summary.failed += 1;
                    warn!(kind = item.kind.as_str(), error = %e, "Batch item failed");

                    let entry =
                        FailureEntry::new(item.kind.as_str(), item.describe(), e.to_string());
                    if let Err(log_err) = self.storage.failures.append(entry) {
                        error!(error = %log_err, "Could not record batch failure");
                    }
                }
            }
        }

        info!(
            applied = summary.applied,
            failed = summary.failed,
            "Batch complete"
        );
        summary
    }

    fn replay(&self, item: &Transaction) -> LedgerResult<()> {
        match item.kind {
            TransactionKind::Deposit => self.service.deposit(item.account, item.amount),
            TransactionKind::Withdrawal => self.service.withdraw(item.account, item.amount),
            TransactionKind::Transfer => {
                // A transfer with no destination cannot be replayed
                let destination = item.destination.ok_or_else(|| {
                    LedgerError::UnknownTransactionKind("transfer without destination".into())
                })?;
                self.service.transfer(item.account, destination, item.amount)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{AccountId, AccountKind, Money};
    use crate::storage::initialize_storage;
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let (_temp_dir, storage) = create_storage();
        let service = LedgerService::new(&storage);
        let a = service.create_account("Alice", AccountKind::Checking).unwrap();
        let missing = AccountId::new(9);

        let items = [
            Transaction::deposit(a.id, Money::from_major(50), Utc::now()),
            Transaction::transfer(a.id, missing, Money::from_major(10), Utc::now()),
        ];

        let summary = BatchProcessor::new(&storage).process_all(&items);
        assert_eq!(summary, BatchSummary { applied: 1, failed: 1 });

        // The deposit landed despite the transfer failing after it
        assert_eq!(
            storage.accounts.get(a.id).unwrap().unwrap().balance,
            Money::from_major(50)
        );

        let failures = storage.failures.get_all().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, "transfer");
        assert!(failures[0].message.contains("not found"));
    }

    #[test]
    fn test_malformed_transfer_is_recorded() {
        let (_temp_dir, storage) = create_storage();
        let service = LedgerService::new(&storage);
        let a = service.create_account("Alice", AccountKind::Checking).unwrap();
        service.deposit(a.id, Money::from_major(100)).unwrap();

        let mut item = Transaction::transfer(a.id, AccountId::new(2), Money::from_major(10), Utc::now());
        item.destination = None;

        let summary = BatchProcessor::new(&storage).process_all(&[item]);
        assert_eq!(summary, BatchSummary { applied: 0, failed: 1 });

        let failures = storage.failures.get_all().unwrap();
        assert!(failures[0].message.contains("destination"));

        // The source balance never moved
        assert_eq!(
            storage.accounts.get(a.id).unwrap().unwrap().balance,
            Money::from_major(100)
        );
    }

    #[test]
    fn test_clean_batch_applies_everything() {
        let (_temp_dir, storage) = create_storage();
        let service = LedgerService::new(&storage);
        let a = service.create_account("Alice", AccountKind::Checking).unwrap();
        let b = service.create_account("Bob", AccountKind::Savings).unwrap();

        let items = [
            Transaction::deposit(a.id, Money::from_major(100), Utc::now()),
            Transaction::transfer(a.id, b.id, Money::from_major(40), Utc::now()),
            Transaction::withdrawal(b.id, Money::from_major(15), Utc::now()),
        ];

        let summary = BatchProcessor::new(&storage).process_all(&items);
        assert_eq!(summary, BatchSummary { applied: 3, failed: 0 });
        assert_eq!(storage.failures.count().unwrap(), 0);
        assert_eq!(storage.transactions.count().unwrap(), 3);
    }

    #[test]
    fn test_empty_batch() {
        let (_temp_dir, storage) = create_storage();
        let summary = BatchProcessor::new(&storage).process_all(&[]);
        assert_eq!(summary, BatchSummary::default());
    }
}
