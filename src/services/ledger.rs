//! Ledger engine
//!
//! Account lifecycle and the three balance operations. Every mutation runs
//! the same phases: validate the arguments, take the per-account locks,
//! load current state, check invariants, then commit the balance updates
//! together with their transaction record in one atomic scope. An operation
//! that fails at any phase leaves balances and the log exactly as they were.

use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, AccountKind, Money, Transaction};
use crate::storage::Storage;

/// Validated entry point for all ledger mutations
pub struct LedgerService<'a> {
    storage: &'a Storage,
    lock_wait: Duration,
}

impl<'a> LedgerService<'a> {
    /// Create a service using the lock-wait timeout the storage was
    /// opened with
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_lock_wait(storage, storage.settings().lock_wait())
    }

    /// Create a service with an explicit lock-wait timeout
    pub fn with_lock_wait(storage: &'a Storage, lock_wait: Duration) -> Self {
        Self { storage, lock_wait }
    }

    /// Open an account with a zero balance. No transaction is recorded.
    pub fn create_account(
        &self,
        owner_name: &str,
        kind: AccountKind,
    ) -> LedgerResult<Account> {
        let owner_name = owner_name.trim();
        if owner_name.is_empty() {
            return Err(LedgerError::Validation(
                "Owner name cannot be empty".into(),
            ));
        }

        let account = self.storage.accounts.create(Account::new(owner_name, kind))?;
        info!(account = %account.id, owner = %account.owner_name, "Account created");
        Ok(account)
    }

    /// Add funds to an account
    pub fn deposit(&self, id: AccountId, amount: Money) -> LedgerResult<()> {
        ensure_positive(amount)?;
        let _locks = self.storage.locks().acquire(&[id], self.lock_wait)?;

        let mut account = self.load(id)?;
        let now = Utc::now();
        account.balance += amount;
        account.updated_at = now;

        let mut scope = self.storage.begin();
        scope.update_account(account);
        scope.append_transaction(Transaction::deposit(id, amount, now));
        scope.commit()?;

        info!(account = %id, %amount, "Deposit committed");
        Ok(())
    }

    /// Remove funds from an account; the balance can never go negative
    pub fn withdraw(&self, id: AccountId, amount: Money) -> LedgerResult<()> {
        ensure_positive(amount)?;
        let _locks = self.storage.locks().acquire(&[id], self.lock_wait)?;

        let mut account = self.load(id)?;
        if account.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: id,
                requested: amount,
                available: account.balance,
            });
        }

        let now = Utc::now();
        account.balance -= amount;
        account.updated_at = now;

        let mut scope = self.storage.begin();
        scope.update_account(account);
        scope.append_transaction(Transaction::withdrawal(id, amount, now));
        scope.commit()?;

        info!(account = %id, %amount, "Withdrawal committed");
        Ok(())
    }

    /// Move funds between two accounts as one unit. Both balance changes
    /// and the single transfer record commit together or not at all.
    pub fn transfer(&self, from: AccountId, to: AccountId, amount: Money) -> LedgerResult<()> {
        ensure_positive(amount)?;
        if from == to {
            return Err(LedgerError::Validation(
                "Cannot transfer an account to itself".into(),
            ));
        }

        let _locks = self.storage.locks().acquire(&[from, to], self.lock_wait)?;

        let mut source = self.load(from)?;
        let mut destination = self.load(to)?;
        if source.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from,
                requested: amount,
                available: source.balance,
            });
        }

        let now = Utc::now();
        source.balance -= amount;
        source.updated_at = now;
        destination.balance += amount;
        destination.updated_at = now;

        let mut scope = self.storage.begin();
        scope.update_account(source);
        scope.update_account(destination);
        scope.append_transaction(Transaction::transfer(from, to, amount, now));
        scope.commit()?;

        info!(%from, %to, %amount, "Transfer committed");
        Ok(())
    }

    /// Snapshot of all accounts
    pub fn accounts(&self) -> LedgerResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    fn load(&self, id: AccountId) -> LedgerResult<Account> {
        self.storage
            .accounts
            .get(id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))
    }
}

fn ensure_positive(amount: Money) -> LedgerResult<()> {
    if !amount.is_positive() {
        return Err(LedgerError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}
