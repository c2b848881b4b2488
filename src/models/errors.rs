use crate::models::{Category, Transaction};
use crate::storage::StoreError;
use crate::types::{AccountId, Amount};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("Invalid MCC [{mcc}]")]
    InvalidCategory {
        mcc: String
    },
    #[error("Invalid amount [{amount}] for account [{account}]")]
    InvalidAmount {
        account: AccountId,
        amount: Amount
    },
    #[error("Account or category does not exist for account [{account}], category [{category}]")]
    AccountOrCategoryNotFound {
        account: AccountId,
        category: Category
    },
    #[error("Failed to parse balance [{value}] for account [{account}], category [{category}]")]
    CorruptBalanceData {
        account: AccountId,
        category: Category,
        value: String
    },
    #[error("Insufficient balance for account [{account}], category [{category}]: available {available}, required {required}")]
    InsufficientBalance {
        account: AccountId,
        category: Category,
        available: Amount,
        required: Amount
    },
    #[error("Balance record for account [{account}] was modified concurrently")]
    ConcurrentModification {
        account: AccountId
    },
    #[error("Numeric overflow occurred for account [{account}], category [{category}]")]
    Overflow {
        account: AccountId,
        category: Category
    },
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError)
}

impl AuthorizationError {
    pub fn invalid_amount(tx: &Transaction) -> Self {
        Self::InvalidAmount {
            account: tx.account.clone(),
            amount: tx.total_amount
        }
    }

    pub fn insufficient_balance(tx: &Transaction, category: Category, available: Amount) -> Self {
        Self::InsufficientBalance {
            account: tx.account.clone(),
            category,
            available,
            required: tx.total_amount
        }
    }

    pub fn concurrent_modification(tx: &Transaction) -> Self {
        Self::ConcurrentModification { account: tx.account.clone() }
    }

    pub fn overflow(tx: &Transaction, category: Category) -> Self {
        Self::Overflow { account: tx.account.clone(), category }
    }

    /// Stable identifier of the failure kind, suitable for clients to branch on.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCategory { .. } => "INVALID_CATEGORY",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::AccountOrCategoryNotFound { .. } => "ACCOUNT_OR_CATEGORY_NOT_FOUND",
            Self::CorruptBalanceData { .. } => "CORRUPT_BALANCE_DATA",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            Self::Overflow { .. } => "OVERFLOW",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE"
        }
    }

    /// Whether the caller may resubmit the same transaction unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. } | Self::StoreUnavailable(_))
    }
}

impl From<BalanceError> for AuthorizationError {
    fn from(error: BalanceError) -> Self {
        match error {
            BalanceError::AccountOrCategoryNotFound { account, category } => {
                Self::AccountOrCategoryNotFound { account, category }
            }
            BalanceError::CorruptBalanceData { account, category, value } => {
                Self::CorruptBalanceData { account, category, value }
            }
            BalanceError::Overflow { account, category } => Self::Overflow { account, category },
            BalanceError::StoreUnavailable(error) => Self::StoreUnavailable(error)
        }
    }
}

/// Failures of batch authorization. Any of them aborts the whole batch and
/// nothing is reported about individual items.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid MCC [{mcc}] for batch item [{index}]")]
    InvalidCategory {
        index: usize,
        mcc: String
    },
    #[error("Batch balance read failed: {0}")]
    BatchReadFailed(#[source] StoreError),
    #[error("Batch item [{index}] has an unparsable balance {value:?} for account [{account}], category [{category}]")]
    BatchParseFailed {
        index: usize,
        account: AccountId,
        category: Category,
        value: Option<String>
    },
    #[error("Numeric overflow occurred for batch item [{index}], account [{account}], category [{category}]")]
    Overflow {
        index: usize,
        account: AccountId,
        category: Category
    },
    #[error("Batch balance write failed: {0}")]
    BatchWriteFailed(#[source] StoreError)
}

impl BatchError {
    pub fn parse_failed(index: usize, tx: &Transaction, category: Category, value: Option<String>) -> Self {
        Self::BatchParseFailed {
            index,
            account: tx.account.clone(),
            category,
            value
        }
    }

    pub fn overflow(index: usize, tx: &Transaction, category: Category) -> Self {
        Self::Overflow {
            index,
            account: tx.account.clone(),
            category
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCategory { .. } => "INVALID_CATEGORY",
            Self::BatchReadFailed(_) => "BATCH_READ_FAILED",
            Self::BatchParseFailed { .. } => "BATCH_PARSE_FAILED",
            Self::Overflow { .. } => "OVERFLOW",
            Self::BatchWriteFailed(_) => "BATCH_WRITE_FAILED"
        }
    }
}

/// Failures of the plain balance operations, deposit and query.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("Account or category does not exist for account [{account}], category [{category}]")]
    AccountOrCategoryNotFound {
        account: AccountId,
        category: Category
    },
    #[error("Failed to parse balance [{value}] for account [{account}], category [{category}]")]
    CorruptBalanceData {
        account: AccountId,
        category: Category,
        value: String
    },
    #[error("Numeric overflow occurred for account [{account}], category [{category}]")]
    Overflow {
        account: AccountId,
        category: Category
    },
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError)
}

pub type DepositError = BalanceError;
pub type QueryError = BalanceError;

impl BalanceError {
    pub fn not_found(account: &str, category: Category) -> Self {
        Self::AccountOrCategoryNotFound { account: account.to_string(), category }
    }

    pub fn corrupt(account: &str, category: Category, value: String) -> Self {
        Self::CorruptBalanceData { account: account.to_string(), category, value }
    }

    pub fn overflow(account: &str, category: Category) -> Self {
        Self::Overflow { account: account.to_string(), category }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::AccountOrCategoryNotFound { .. } => "ACCOUNT_OR_CATEGORY_NOT_FOUND",
            Self::CorruptBalanceData { .. } => "CORRUPT_BALANCE_DATA",
            Self::Overflow { .. } => "OVERFLOW",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE"
        }
    }
}
