//! Point-of-sale authorization against per-account, per-category balances.
//!
//! Balances live in an external key-value service behind [`BalanceStore`];
//! [`Authorizer`] debits them under an optimistic watch, authorizes batches
//! in two round-trips, and serves deposits and balance queries.

pub mod config;
pub mod engine;
pub mod models;
pub mod seed;
pub mod server;
pub mod storage;
pub mod types;

pub use engine::Authorizer;
pub use models::{AuthorizationError, BalanceError, BatchError, Category, MccPolicy, Transaction};
pub use storage::{BalanceStore, MemoryStore, StoreError};
