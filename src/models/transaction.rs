use serde::{Deserialize, Serialize};

use crate::types::{AccountId, Amount};

/// A point-of-sale debit as received from the acquirer.
///
/// `merchant` is informational only and never consulted during authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The account whose balance is debited.
    pub account: AccountId,
    /// The amount to debit, expected to be non-negative.
    #[serde(rename = "totalAmount")]
    pub total_amount: Amount,
    /// Merchant category code, mapped to a spending category.
    pub mcc: String,
    #[serde(default)]
    pub merchant: String
}
