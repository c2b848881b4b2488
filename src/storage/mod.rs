mod errors;
mod memory_store;
#[cfg(test)]
mod tests;

use std::future::Future;

pub use errors::StoreError;
pub use memory_store::MemoryStore;

/// Address of one category field inside a hash record.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FieldRef {
    pub key: String,
    pub field: String
}

impl FieldRef {
    pub fn new(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self { key: key.into(), field: field.into() }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FieldWrite {
    pub key: String,
    pub field: String,
    pub value: String
}

impl FieldWrite {
    pub fn new(key: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), field: field.into(), value: value.into() }
    }
}

/// Proof of a watch registered on a record, handed back on commit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WatchToken {
    pub key: String,
    pub version: u64
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CommitOutcome {
    Committed,
    /// The watched record changed after the watch was registered; nothing was written.
    Aborted
}

/// Key-value service holding one hash record per account, category name to balance.
///
/// Every mutation of a record, transactional or not, invalidates the watches
/// registered on it before the mutation.
pub trait BalanceStore: Send + Sync + 'static {
    fn read_field(&self, key: &str, field: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Unconditional single-field write.
    fn write_field(&self, key: &str, field: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn watch(&self, key: &str) -> impl Future<Output = Result<WatchToken, StoreError>> + Send;

    /// Applies `writes` as one unit only if the watched record is unchanged.
    fn commit_watched(&self, token: WatchToken, writes: Vec<FieldWrite>) -> impl Future<Output = Result<CommitOutcome, StoreError>> + Send;

    /// Reads many fields in one round-trip. Results are positional.
    fn bulk_read(&self, fields: &[FieldRef]) -> impl Future<Output = Result<Vec<Option<String>>, StoreError>> + Send;

    /// Writes many fields in one round-trip, without cross-item atomicity.
    fn bulk_write(&self, writes: &[FieldWrite]) -> impl Future<Output = Result<(), StoreError>> + Send;
}
