//! Driven port for the static backup price snapshot.
//!
//! The snapshot is loaded once at startup, so reads are synchronous and
//! infallible: a missing or corrupt file simply looks empty.

use crate::domain::PriceSnapshot;

/// Read-only historical prices used when the live feed is unavailable.
#[cfg_attr(test, mockall::automock)]
pub trait BackupPriceStore: Send + Sync {
    /// Every snapshot, ascending by date.
    fn all(&self) -> Vec<PriceSnapshot>;

    /// Most recent snapshot.
    fn latest(&self) -> Option<PriceSnapshot> {
        self.all().last().copied()
    }

    /// The last `count` snapshots (all of them when fewer are stored).
    fn recent(&self, count: usize) -> Vec<PriceSnapshot> {
        let all = self.all();
        let skip = all.len().saturating_sub(count);
        all.into_iter().skip(skip).collect()
    }
}

/// Backup store with no data, for deployments without a snapshot file.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyBackupPriceStore;

impl BackupPriceStore for EmptyBackupPriceStore {
    fn all(&self) -> Vec<PriceSnapshot> {
        Vec::new()
    }
}
