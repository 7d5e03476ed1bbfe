use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::LedgerState;

/// Version written into every state file. Bump on schema changes so old
/// data is never silently misread.
pub const STATE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unsupported state file version {found} (expected {STATE_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// On-disk layout: the ledger state wrapped with a schema version.
#[derive(Serialize, Deserialize)]
struct StateFile {
    version: u32,
    #[serde(flatten)]
    state: LedgerState,
}

/// File-backed store for the full ledger state.
///
/// Every save serializes the whole state, writes it to a temp file in
/// the same directory, and atomically renames it over the canonical
/// path. A crash mid-write leaves the previous state file intact.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state, or an empty one if nothing was saved yet.
    pub fn load(&self) -> Result<LedgerState, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LedgerState::new());
            }
            Err(err) => return Err(err.into()),
        };
        let file: StateFile = serde_json::from_slice(&bytes)?;
        if file.version != STATE_VERSION {
            return Err(StoreError::UnsupportedVersion { found: file.version });
        }
        Ok(file.state)
    }

    /// Durably save the state. Returns only after the data has been
    /// flushed and the canonical file atomically replaced.
    pub fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        let file = StateFile {
            version: STATE_VERSION,
            state: state.clone(),
        };
        let json = serde_json::to_vec_pretty(&file)?;

        // The temp file must live in the target directory: rename is
        // only atomic within a filesystem.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}
