use std::fs::File;
use std::io::{BufReader, Read};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{error, info};

use crate::models::Category;
use crate::storage::MemoryStore;
use crate::types::{AccountId, Amount};

/// One `account,category,balance` row of a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRow {
    pub account: AccountId,
    pub category: Category,
    pub balance: Amount
}

/// Provisions the balances of a seed CSV into `store` and returns how many rows were loaded.
pub fn load_seed_file(path: &str, store: &MemoryStore) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("Error opening seed CSV at path: {path}"))?;

    Ok(load_seed(BufReader::new(file), store))
}

/// Malformed rows are logged and skipped.
pub fn load_seed<R: Read>(reader: R, store: &MemoryStore) -> usize {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut loaded = 0;

    for result in reader.deserialize::<SeedRow>() {
        match result {
            Ok(row) => {
                store.set_balance(&row.account, row.category, row.balance);
                loaded += 1;
            }
            Err(error) => {
                error!("Seed CSV deserialization error: {error}");
            }
        }
    }

    info!("Loaded {loaded} seed balances");

    loaded
}
