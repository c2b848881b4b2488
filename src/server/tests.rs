use super::{ApiKeys, AppError};

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rust_decimal::Decimal;

use crate::models::{AuthorizationError, BalanceError, BatchError, Category, Transaction};
use crate::storage::StoreError;

fn create_transaction() -> Result<Transaction> {
    Ok(Transaction {
        account: "123".to_string(),
        total_amount: Decimal::from_str("60")?,
        mcc: "5411".to_string(),
        merchant: String::new()
    })
}

#[test]
fn test_every_failure_kind_maps_to_a_stable_status() -> Result<()> {
    let transaction = create_transaction()?;

    let cases: Vec<(AppError, StatusCode, &str)> = vec![
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        (AuthorizationError::InvalidCategory { mcc: "1".into() }.into(), StatusCode::BAD_REQUEST, "INVALID_CATEGORY"),
        (AuthorizationError::invalid_amount(&transaction).into(), StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
        (BalanceError::not_found("123", Category::Food).into(), StatusCode::NOT_FOUND, "ACCOUNT_OR_CATEGORY_NOT_FOUND"),
        (BalanceError::corrupt("123", Category::Food, "x".into()).into(), StatusCode::INTERNAL_SERVER_ERROR, "CORRUPT_BALANCE_DATA"),
        (AuthorizationError::insufficient_balance(&transaction, Category::Food, Decimal::TEN).into(), StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_BALANCE"),
        (AuthorizationError::concurrent_modification(&transaction).into(), StatusCode::CONFLICT, "CONCURRENT_MODIFICATION"),
        (AuthorizationError::StoreUnavailable(StoreError::Timeout(Duration::from_secs(1))).into(), StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
        (BatchError::BatchReadFailed(StoreError::Unavailable("down".into())).into(), StatusCode::SERVICE_UNAVAILABLE, "BATCH_READ_FAILED"),
        (BatchError::parse_failed(0, &transaction, Category::Food, None).into(), StatusCode::INTERNAL_SERVER_ERROR, "BATCH_PARSE_FAILED"),
        (BatchError::BatchWriteFailed(StoreError::Unavailable("down".into())).into(), StatusCode::SERVICE_UNAVAILABLE, "BATCH_WRITE_FAILED")
    ];

    for (error, status, code) in cases {
        assert_eq!(error.code(), code);
        assert_eq!(error.into_response().status(), status, "code {code}");
    }

    Ok(())
}

#[test]
fn test_conflict_and_rejection_are_distinguishable() -> Result<()> {
    let transaction = create_transaction()?;

    let conflict = AppError::from(AuthorizationError::concurrent_modification(&transaction));
    let rejection = AppError::from(AuthorizationError::insufficient_balance(&transaction, Category::Food, Decimal::ONE));

    assert_ne!(conflict.status(), rejection.status());
    assert_ne!(conflict.code(), rejection.code());

    Ok(())
}

#[test]
fn test_unknown_category_name_is_a_bad_request() {
    let error = AppError::from(Category::from_str("GROCERY").unwrap_err());

    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error.code(), "INVALID_CATEGORY");
}

#[test]
fn test_api_keys_admit_only_configured_credentials() {
    let api_keys = ApiKeys::new(["alpha", "beta"]);

    assert_eq!(api_keys.len(), 2);
    assert!(api_keys.contains("alpha"));
    assert!(!api_keys.contains("gamma"));
    assert!(!api_keys.contains(""));
    assert!(ApiKeys::default().is_empty());
}
