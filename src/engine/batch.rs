use tracing::{debug, warn};

use crate::engine::Authorizer;
use crate::models::{BatchError, Category, Transaction};
use crate::storage::{BalanceStore, FieldRef, FieldWrite, StoreError};
use crate::types::{format_amount, parse_amount, record_key};

impl<S: BalanceStore> Authorizer<S> {
    /// Debits every transaction of `batch` using one bulk read and one bulk write.
    ///
    /// Position `i` of the read is applied to position `i` of the write. The
    /// two round-trips are independent: no watch is held between them, the
    /// sufficiency check of [`Authorizer::authorize`] is not applied, and the
    /// balances read may already be stale when the write lands. Balances can
    /// therefore go negative, and two items on the same account and category
    /// are both computed from the same read, the later one winning. Callers
    /// needing per-item guarantees must serialize writers externally or use
    /// [`Authorizer::authorize`].
    ///
    /// Any failure aborts the whole batch before the bulk write is issued.
    pub async fn authorize_batch(&self, batch: &[Transaction]) -> Result<(), BatchError> {
        let categories = batch.iter()
            .enumerate()
            .map(|(index, transaction)| {
                self.mcc_policy.resolve(&transaction.mcc)
                    .map_err(|_| BatchError::InvalidCategory { index, mcc: transaction.mcc.clone() })
            })
            .collect::<Result<Vec<Category>, BatchError>>()?;

        let fields: Vec<FieldRef> = batch.iter()
            .zip(&categories)
            .map(|(transaction, category)| FieldRef::new(record_key(&transaction.account), category.as_str()))
            .collect();

        let balances = self.bounded(self.storage.bulk_read(&fields)).await
            .map_err(BatchError::BatchReadFailed)?;

        if balances.len() != fields.len() {
            return Err(BatchError::BatchReadFailed(StoreError::Unavailable(format!(
                "Bulk read returned {} results for {} fields", balances.len(), fields.len()
            ))));
        }

        let mut writes = Vec::with_capacity(batch.len());

        for (index, (((transaction, category), field), stored)) in batch.iter().zip(&categories).zip(fields).zip(balances).enumerate() {
            let balance = match stored.as_deref().map(parse_amount) {
                Some(Ok(balance)) => balance,
                _ => {
                    let error = BatchError::parse_failed(index, transaction, *category, stored);
                    warn!("{error}");
                    return Err(error);
                }
            };

            // Unchecked against the amount, see the limitation documented above.
            let new_balance = balance.checked_sub(transaction.total_amount)
                .ok_or_else(|| BatchError::overflow(index, transaction, *category))?;

            writes.push(FieldWrite::new(field.key, field.field, format_amount(new_balance)));
        }

        self.bounded(self.storage.bulk_write(&writes)).await
            .map_err(BatchError::BatchWriteFailed)?;

        debug!("Authorized batch of {} transactions", batch.len());

        Ok(())
    }
}
