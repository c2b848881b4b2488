use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Balance store unavailable: {0}")]
    Unavailable(String),
    #[error("Balance store did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Balance store rejected the request: {0}")]
    Rejected(String)
}
