use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::models::{AuthorizationError, BalanceError, Category, DepositError, MccPolicy, QueryError, Transaction};
use crate::storage::{BalanceStore, CommitOutcome, FieldWrite, StoreError};
use crate::types::{Amount, format_amount, parse_amount, record_key};

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Authorizes debits against per-category balances held in a [`BalanceStore`].
///
/// The authorizer keeps no balance state of its own: every call goes to the
/// store, so one instance can serve any number of concurrent requests.
pub struct Authorizer<S> {
    pub(crate) storage: Arc<S>,
    pub(crate) mcc_policy: MccPolicy,
    store_timeout: Duration,
    conflict_retries: u32
}

impl<S: BalanceStore> Authorizer<S> {
    /// Creates an authorizer with single-shot conflict handling and the fallback MCC policy.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            mcc_policy: MccPolicy::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            conflict_retries: 0
        }
    }

    pub fn with_mcc_policy(mut self, mcc_policy: MccPolicy) -> Self {
        self.mcc_policy = mcc_policy;
        self
    }

    /// Deadline applied to each individual store round-trip.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Number of times a lost optimistic race is retried before
    /// [`AuthorizationError::ConcurrentModification`] is surfaced. Zero by default.
    pub fn with_conflict_retries(mut self, conflict_retries: u32) -> Self {
        self.conflict_retries = conflict_retries;
        self
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Debits `transaction.total_amount` from the balance of the category its MCC maps to.
    ///
    /// The read and the write happen under a watch on the account record, so
    /// the debit only lands if nobody touched the record in between.
    ///
    /// # Errors
    /// - `InvalidAmount` for a negative amount, and `InvalidCategory` under the
    ///   strict MCC policy, both before the store is touched.
    /// - `AccountOrCategoryNotFound` / `CorruptBalanceData` when the balance is
    ///   absent or unreadable.
    /// - `InsufficientBalance` when the balance does not cover the amount.
    /// - `ConcurrentModification` when the record changed under the watch.
    /// - `StoreUnavailable` on transport failure or deadline expiry.
    ///
    /// No write happens on any error path.
    pub async fn authorize(&self, transaction: &Transaction) -> Result<(), AuthorizationError> {
        let mut attempt = 0;

        loop {
            match self.authorize_once(transaction).await {
                Err(AuthorizationError::ConcurrentModification { .. }) if attempt < self.conflict_retries => {
                    attempt += 1;
                    debug!("Retrying authorization for account [{}] after a lost race ({attempt}/{})", transaction.account, self.conflict_retries);
                }
                result => return result
            }
        }
    }

    async fn authorize_once(&self, transaction: &Transaction) -> Result<(), AuthorizationError> {
        if transaction.total_amount < Decimal::ZERO {
            return Err(AuthorizationError::invalid_amount(transaction));
        }

        let category = self.mcc_policy.resolve(&transaction.mcc)?;
        let key = record_key(&transaction.account);

        let token = self.bounded(self.storage.watch(&key)).await?;
        let balance = self.read_balance(&transaction.account, &key, category).await?;

        if balance < transaction.total_amount {
            let error = AuthorizationError::insufficient_balance(transaction, category, balance);
            warn!("{error}");
            return Err(error);
        }

        let new_balance = balance.checked_sub(transaction.total_amount)
            .ok_or_else(|| AuthorizationError::overflow(transaction, category))?;
        let write = FieldWrite::new(key, category.as_str(), format_amount(new_balance));

        match self.bounded(self.storage.commit_watched(token, vec![write])).await? {
            CommitOutcome::Committed => {
                debug!("Authorized [{}] on account [{}]:[{category}], balance now {new_balance}", transaction.total_amount, transaction.account);
                Ok(())
            }
            CommitOutcome::Aborted => {
                let error = AuthorizationError::concurrent_modification(transaction);
                warn!("{error}");
                Err(error)
            }
        }
    }

    /// Credits `amount` to an existing balance and returns the new balance.
    ///
    /// Negative amounts are not rejected. The read and the write are not
    /// guarded by a watch, so a debit landing between them is overwritten.
    pub async fn deposit(&self, account_id: &str, category: Category, amount: Amount) -> Result<Amount, DepositError> {
        let key = record_key(account_id);
        let balance = self.read_balance(account_id, &key, category).await?;

        let new_balance = balance.checked_add(amount)
            .ok_or_else(|| BalanceError::overflow(account_id, category))?;

        self.bounded(self.storage.write_field(&key, category.as_str(), &format_amount(new_balance))).await?;

        debug!("Deposited [{amount}] on account [{account_id}]:[{category}], balance now {new_balance}");

        Ok(new_balance)
    }

    pub async fn get_balance(&self, account_id: &str, category: Category) -> Result<Amount, QueryError> {
        self.read_balance(account_id, &record_key(account_id), category).await
    }

    async fn read_balance(&self, account_id: &str, key: &str, category: Category) -> Result<Amount, BalanceError> {
        let value = self.bounded(self.storage.read_field(key, category.as_str())).await?
            .ok_or_else(|| BalanceError::not_found(account_id, category))?;

        parse_amount(&value).map_err(|_| BalanceError::corrupt(account_id, category, value))
    }

    /// Runs one store call under the configured deadline.
    pub(crate) async fn bounded<T>(&self, operation: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        let result = timeout(self.store_timeout, operation).await
            .unwrap_or(Err(StoreError::Timeout(self.store_timeout)));

        if let Err(error) = &result {
            error!("{error}");
        }

        result
    }
}
