use std::collections::HashMap;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use crate::models::Category;
use crate::storage::{BalanceStore, CommitOutcome, FieldRef, FieldWrite, StoreError, WatchToken};
use crate::types::{Amount, format_amount, record_key};

#[derive(Debug, Clone, Default)]
struct Record {
    /// Bumped on every mutation. An absent record is at version 0.
    version: u64,
    fields: HashMap<String, String>
}

impl Record {
    fn set(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
        self.version += 1;
    }
}

/// In-process [`BalanceStore`] with per-record versioning for watches.
pub struct MemoryStore {
    records: DashMap<String, Record>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new()
        }
    }

    /// Provisions a balance directly, outside of any engine operation.
    pub fn set_balance(&self, account_id: &str, category: Category, balance: Amount) {
        self.records.entry(record_key(account_id))
            .or_default()
            .set(category.as_str(), &format_amount(balance));
    }

    /// Raw stored value of one field.
    pub fn field(&self, key: &str, field: &str) -> Option<String> {
        self.records.get(key).and_then(|record| record.fields.get(field).cloned())
    }

    pub fn version(&self, key: &str) -> u64 {
        self.records.get(key).map(|record| record.version).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceStore for MemoryStore {
    async fn read_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        Ok(self.field(key, field))
    }

    async fn write_field(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        self.records.entry(key.to_string()).or_default().set(field, value);
        Ok(())
    }

    async fn watch(&self, key: &str) -> Result<WatchToken, StoreError> {
        Ok(WatchToken { key: key.to_string(), version: self.version(key) })
    }

    async fn commit_watched(&self, token: WatchToken, writes: Vec<FieldWrite>) -> Result<CommitOutcome, StoreError> {
        if let Some(stray) = writes.iter().find(|write| write.key != token.key) {
            return Err(StoreError::Rejected(format!(
                "Write to [{}] is outside the watched record [{}]", stray.key, token.key
            )));
        }

        let outcome = match self.records.entry(token.key) {
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();

                if record.version != token.version {
                    CommitOutcome::Aborted
                } else {
                    writes.iter().for_each(|write| record.set(&write.field, &write.value));
                    CommitOutcome::Committed
                }
            }
            Entry::Vacant(vacant) => {
                if token.version != 0 {
                    CommitOutcome::Aborted
                } else {
                    let mut record = Record::default();
                    writes.iter().for_each(|write| record.set(&write.field, &write.value));
                    vacant.insert(record);
                    CommitOutcome::Committed
                }
            }
        };

        trace!("Watched commit finished with {outcome:?}");

        Ok(outcome)
    }

    async fn bulk_read(&self, fields: &[FieldRef]) -> Result<Vec<Option<String>>, StoreError> {
        Ok(fields.iter().map(|field_ref| self.field(&field_ref.key, &field_ref.field)).collect())
    }

    async fn bulk_write(&self, writes: &[FieldWrite]) -> Result<(), StoreError> {
        for write in writes {
            self.records.entry(write.key.clone()).or_default().set(&write.field, &write.value);
        }

        Ok(())
    }
}
