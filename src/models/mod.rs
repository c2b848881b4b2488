mod category;
pub mod errors;
mod transaction;

pub use category::{Category, MccPolicy, UnknownCategory};
pub use errors::{AuthorizationError, BalanceError, BatchError, DepositError, QueryError};
pub use transaction::Transaction;
