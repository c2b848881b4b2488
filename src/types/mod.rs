
use std::str::FromStr;

use rust_decimal::Decimal;

pub type AccountId = String;
pub type Amount = Decimal;

const RECORD_KEY_PREFIX: &str = "account:";

/// Key of the hash record holding every category balance for an account.
pub fn record_key(account_id: &str) -> String {
    format!("{RECORD_KEY_PREFIX}{account_id}")
}

/// Parses a balance as stored by the key-value service.
///
/// Other writers may store plain decimals (`"100.0"`, `"50"`) or scientific
/// notation (`"1.5e2"`), both are accepted. Surrounding whitespace is ignored.
pub fn parse_amount(value: &str) -> Result<Amount, rust_decimal::Error> {
    let value = value.trim();

    Decimal::from_str(value).or_else(|_| Decimal::from_scientific(value))
}

/// Formats a balance for storage, without trailing zeros beyond the value's scale.
pub fn format_amount(amount: Amount) -> String {
    amount.normalize().to_string()
}
