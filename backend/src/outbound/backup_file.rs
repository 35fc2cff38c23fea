//! Backup price store read from a JSON file.
//!
//! The file is a JSON array of `{ "date", "price" }` points. It is read once
//! at startup; a missing or malformed file leaves the store empty and logs a
//! warning, since the backup only matters once the live feed fails.

use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::PriceSnapshot;
use crate::domain::ports::BackupPriceStore;
use crate::outbound::price_point::PricePointDto;

/// Default location of the backup file, relative to the working directory.
pub const DEFAULT_BACKUP_PATH: &str = "gold_data_backup.json";

/// Reasons the backup file could not be used.
#[derive(Debug, Error)]
pub enum BackupFileError {
    /// The file could not be read.
    #[error("failed to read backup file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a JSON array of price points.
    #[error("backup file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A point had an unusable date or price.
    #[error("backup file has an invalid entry: {0}")]
    Entry(String),
}

/// In-memory snapshot of the backup file, sorted by date.
#[derive(Debug, Clone, Default)]
pub struct JsonFileBackupStore {
    snapshots: Vec<PriceSnapshot>,
}

impl JsonFileBackupStore {
    /// Build a store from already-parsed snapshots.
    pub fn from_snapshots(mut snapshots: Vec<PriceSnapshot>) -> Self {
        snapshots.sort_by_key(PriceSnapshot::date);
        Self { snapshots }
    }

    /// Parse a backup document.
    ///
    /// # Errors
    ///
    /// Returns [`BackupFileError`] when the document is not an array of valid
    /// price points.
    pub fn parse(bytes: &[u8]) -> Result<Self, BackupFileError> {
        let points: Vec<PricePointDto> = serde_json::from_slice(bytes)?;
        let snapshots = points
            .into_iter()
            .map(PricePointDto::into_snapshot)
            .collect::<Result<Vec<_>, _>>()
            .map_err(BackupFileError::Entry)?;
        Ok(Self::from_snapshots(snapshots))
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BackupFileError`] when the file cannot be read or parsed.
    pub fn try_load(path: &Path) -> Result<Self, BackupFileError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Read the file at `path`, falling back to an empty store on any error.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(store) => {
                info!(
                    path = %path.display(),
                    points = store.snapshots.len(),
                    "loaded backup gold prices"
                );
                store
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "backup gold prices unavailable");
                Self::default()
            }
        }
    }
}

impl BackupPriceStore for JsonFileBackupStore {
    fn all(&self) -> Vec<PriceSnapshot> {
        self.snapshots.clone()
    }

    fn latest(&self) -> Option<PriceSnapshot> {
        self.snapshots.last().copied()
    }
}
