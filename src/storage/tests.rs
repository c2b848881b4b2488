use super::{BalanceStore, CommitOutcome, FieldRef, FieldWrite, MemoryStore, StoreError};
use crate::models::Category;
use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

#[tokio::test]
async fn test_storage_basic_read_and_write_operations() -> Result<()> {
    let store = MemoryStore::new();

    assert_eq!(store.read_field("account:99", "FOOD").await?, None);

    store.write_field("account:1", "FOOD", "100.0").await?;

    assert_eq!(store.read_field("account:1", "FOOD").await?.as_deref(), Some("100.0"));
    assert_eq!(store.read_field("account:1", "MEAL").await?, None);

    Ok(())
}

#[tokio::test]
async fn test_set_balance_provisions_the_account_record() -> Result<()> {
    let store = MemoryStore::new();
    store.set_balance("123", Category::Food, Decimal::from_str("100.00")?);

    assert_eq!(store.field("account:123", "FOOD").as_deref(), Some("100"));
    assert_eq!(store.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_watched_commit_succeeds_when_record_is_untouched() -> Result<()> {
    let store = MemoryStore::new();
    store.write_field("account:1", "FOOD", "10").await?;

    let token = store.watch("account:1").await?;
    let outcome = store.commit_watched(token, vec![FieldWrite::new("account:1", "FOOD", "5")]).await?;

    assert_eq!(outcome, CommitOutcome::Committed);
    assert_eq!(store.field("account:1", "FOOD").as_deref(), Some("5"));

    Ok(())
}

#[tokio::test]
async fn test_watched_commit_aborts_after_a_concurrent_write() -> Result<()> {
    let store = MemoryStore::new();
    store.write_field("account:1", "FOOD", "10").await?;

    let token = store.watch("account:1").await?;
    store.write_field("account:1", "MEAL", "3").await?;

    let outcome = store.commit_watched(token, vec![FieldWrite::new("account:1", "FOOD", "5")]).await?;

    assert_eq!(outcome, CommitOutcome::Aborted);
    assert_eq!(store.field("account:1", "FOOD").as_deref(), Some("10"));

    Ok(())
}

#[tokio::test]
async fn test_watch_on_absent_record_aborts_if_record_appears() -> Result<()> {
    let store = MemoryStore::new();

    let token = store.watch("account:7").await?;
    store.write_field("account:7", "CASH", "1").await?;

    let outcome = store.commit_watched(token, vec![FieldWrite::new("account:7", "CASH", "0")]).await?;

    assert_eq!(outcome, CommitOutcome::Aborted);
    assert_eq!(store.field("account:7", "CASH").as_deref(), Some("1"));

    Ok(())
}

#[tokio::test]
async fn test_watched_commit_rejects_writes_outside_the_watched_record() -> Result<()> {
    let store = MemoryStore::new();

    let token = store.watch("account:1").await?;
    let result = store.commit_watched(token, vec![FieldWrite::new("account:2", "FOOD", "5")]).await;

    assert!(matches!(result, Err(StoreError::Rejected(_))));
    assert!(store.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_bulk_read_preserves_request_order() -> Result<()> {
    let store = MemoryStore::new();
    store.write_field("account:1", "FOOD", "1").await?;
    store.write_field("account:2", "MEAL", "2").await?;

    let results = store.bulk_read(&[
        FieldRef::new("account:2", "MEAL"),
        FieldRef::new("account:3", "FOOD"),
        FieldRef::new("account:1", "FOOD")
    ]).await?;

    assert_eq!(results, vec![Some("2".to_string()), None, Some("1".to_string())]);

    Ok(())
}

#[tokio::test]
async fn test_bulk_write_applies_in_order_and_bumps_versions() -> Result<()> {
    let store = MemoryStore::new();
    store.write_field("account:1", "FOOD", "10").await?;
    let version_before = store.version("account:1");

    store.bulk_write(&[
        FieldWrite::new("account:1", "FOOD", "8"),
        FieldWrite::new("account:1", "FOOD", "6"),
        FieldWrite::new("account:2", "CASH", "4")
    ]).await?;

    assert_eq!(store.field("account:1", "FOOD").as_deref(), Some("6"));
    assert_eq!(store.field("account:2", "CASH").as_deref(), Some("4"));
    assert!(store.version("account:1") > version_before);

    Ok(())
}
