// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tallybot::application::LedgerService;
use tallybot::storage::JsonStore;
use tempfile::TempDir;

/// Helper to create a test service backed by a temporary state file
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = JsonStore::new(temp_dir.path().join("ledger.json"));
    let service = LedgerService::open(store)?;
    Ok((service, temp_dir))
}

/// Reopen a service against the same temp directory, simulating a
/// process restart
pub fn reopen_service(temp_dir: &TempDir) -> Result<LedgerService> {
    let store = JsonStore::new(temp_dir.path().join("ledger.json"));
    Ok(LedgerService::open(store)?)
}
