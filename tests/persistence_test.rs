mod common;

use anyhow::Result;
use common::{reopen_service, test_service};
use tallybot::application::AppError;
use tallybot::domain::LedgerState;
use tallybot::storage::{JsonStore, StoreError};
use tempfile::TempDir;

#[tokio::test]
async fn test_state_survives_restart() -> Result<()> {
    let (service, temp) = test_service()?;

    service.create_account("usd").await?;
    service.create_account("eur").await?;
    service.record_transaction("usd", "100", "salary").await?;
    service.record_transaction("usd", "-20%", "fee").await?;
    drop(service);

    let reopened = reopen_service(&temp)?;
    assert_eq!(reopened.balance("usd").await?, 9980);
    assert_eq!(reopened.balance("eur").await?, 0);
    assert_eq!(reopened.history_len().await, 2);

    // Creation order survives the round trip too.
    let names: Vec<String> = reopened.balances().await.into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["usd", "eur"]);

    Ok(())
}

#[tokio::test]
async fn test_cascade_delete_is_durable() -> Result<()> {
    let (service, temp) = test_service()?;

    service.create_account("usd").await?;
    service.record_transaction("usd", "100", "").await?;
    service.delete_account("usd").await?;
    drop(service);

    let reopened = reopen_service(&temp)?;
    assert!(matches!(
        reopened.balance("usd").await,
        Err(AppError::AccountNotFound(_))
    ));
    assert_eq!(reopened.history_len().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_save_load_save_is_byte_idempotent() -> Result<()> {
    let (service, temp) = test_service()?;
    service.create_account("usd").await?;
    service.record_transaction("usd", "42.42", "answer").await?;
    drop(service);

    let path = temp.path().join("ledger.json");
    let first = std::fs::read(&path)?;

    let store = JsonStore::new(&path);
    store.save(&store.load()?)?;
    let second = std::fs::read(&path)?;
    assert_eq!(first, second);

    store.save(&store.load()?)?;
    let third = std::fs::read(&path)?;
    assert_eq!(second, third);

    Ok(())
}

#[tokio::test]
async fn test_future_state_version_refuses_to_load() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("ledger.json");
    std::fs::write(
        &path,
        r#"{"version": 2, "accounts": {"usd": 100}, "history": []}"#,
    )?;

    let result = tallybot::LedgerService::open(JsonStore::new(&path));
    assert!(matches!(
        result,
        Err(AppError::Persistence(StoreError::UnsupportedVersion { found: 2 }))
    ));

    Ok(())
}

#[tokio::test]
async fn test_corrupt_state_file_refuses_to_load() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("ledger.json");
    std::fs::write(&path, r#"{"version": 1, "accounts"#)?;

    let result = tallybot::LedgerService::open(JsonStore::new(&path));
    assert!(matches!(
        result,
        Err(AppError::Persistence(StoreError::Serde(_)))
    ));

    Ok(())
}

#[tokio::test]
async fn test_stray_temp_file_never_shadows_canonical_state() -> Result<()> {
    let (service, temp) = test_service()?;
    service.create_account("usd").await?;
    service.record_transaction("usd", "100", "").await?;
    drop(service);

    // Simulate a writer that died mid-save: a partial temp file next to
    // the canonical one.
    std::fs::write(temp.path().join(".tmp1a2b3c"), b"{\"version\":1,\"acc")?;

    let reopened = reopen_service(&temp)?;
    assert_eq!(reopened.balance("usd").await?, 10000);
    assert_eq!(reopened.history_len().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_every_mutation_is_persisted_immediately() -> Result<()> {
    let (service, temp) = test_service()?;
    let store = JsonStore::new(temp.path().join("ledger.json"));

    service.create_account("usd").await?;
    assert!(store.load()?.accounts.contains_key("usd"));

    service.record_transaction("usd", "1", "").await?;
    assert_eq!(store.load()?.history.len(), 1);

    service.delete_account("usd").await?;
    let after_delete: LedgerState = store.load()?;
    assert!(after_delete.accounts.is_empty());
    assert!(after_delete.history.is_empty());

    Ok(())
}
