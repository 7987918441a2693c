//! Persistence of the attempt snapshot in a single key-value slot.

mod file;
mod memory;

use anyhow::Result;
use log::warn;

use crate::models::Snapshot;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

/// Fixed key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "quiz-runner-state";

pub trait SnapshotStore: Send + Sync {
    /// Overwrites any previously stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Returns `None` when nothing is stored or the stored payload is
    /// unreadable. Corruption is logged, never returned as an error.
    fn load(&self) -> Option<Snapshot>;

    fn clear(&self) -> Result<()>;
}

/// Shared decode step for stores that keep the snapshot as JSON text.
fn decode_snapshot(raw: &str, source: &str) -> Option<Snapshot> {
    match serde_json::from_str(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!("Discarding unreadable snapshot from {source}: {err}");
            None
        }
    }
}
