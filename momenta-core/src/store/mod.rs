//! Ledger snapshot persistence.
//!
//! Snapshots are whole-ledger JSON documents: cash, positions, trade history,
//! valuation history, timestamps as RFC 3339 strings. Writes are atomic
//! (write to `.tmp`, rename into place) so a crash mid-save never leaves a
//! truncated snapshot behind. A missing snapshot is not an error — it means
//! "start fresh".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::domain::Ledger;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Trait for ledger snapshot stores.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, ledger: &Ledger) -> Result<(), SnapshotError>;

    /// `Ok(None)` means no snapshot exists yet.
    fn load(&self) -> Result<Option<Ledger>, SnapshotError>;
}

/// JSON-file snapshot store.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn save(&self, ledger: &Ledger) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(ledger)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            e
        })?;

        info!("ledger snapshot saved to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<Ledger>, SnapshotError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let ledger = serde_json::from_str(&json)?;
        info!("ledger snapshot loaded from {}", self.path.display());
        Ok(Some(ledger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(tmp.path().join("portfolio_state.json"));

        let mut ledger = Ledger::new(100_000.0);
        let now = Utc::now();
        ledger.execute_trade("AAPL", 100, 150.0, now);
        ledger.execute_trade("TSLA", -20, 200.0, now);
        ledger.record_valuation(now, ledger.cash() + 100.0 * 150.0 - 20.0 * 200.0);

        store.save(&ledger).unwrap();
        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn missing_snapshot_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(tmp.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("portfolio_state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonSnapshotStore::new(&path);
        assert!(matches!(store.load(), Err(SnapshotError::Serde(_))));
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(tmp.path().join("nested/dir/state.json"));
        store.save(&Ledger::new(1_000.0)).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state.json");
        let store = JsonSnapshotStore::new(&path);
        store.save(&Ledger::new(1_000.0)).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }
}
