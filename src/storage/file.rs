use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

use anyhow::{Context, Result};
use log::warn;

use crate::models::Snapshot;

use super::{decode_snapshot, SnapshotStore, SNAPSHOT_KEY};

/// Keeps the snapshot as pretty-printed JSON at `<dir>/<SNAPSHOT_KEY>.json`.
pub struct FileSnapshotStore {
    path: PathBuf,
    // Serializes writers within this process.
    write_lock: RwLock<()>,
}

impl FileSnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        Ok(Self {
            path: dir.join(format!("{SNAPSHOT_KEY}.json")),
            write_lock: RwLock::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let serialized = serde_json::to_string_pretty(snapshot)?;
        let _guard = match self.write_lock.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write snapshot to {}", self.path.display()))
    }

    fn load(&self) -> Option<Snapshot> {
        let _guard = match self.write_lock.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match fs::read_to_string(&self.path) {
            Ok(contents) => decode_snapshot(&contents, &self.path.display().to_string()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!("Failed to read snapshot from {}: {err}", self.path.display());
                None
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let _guard = match self.write_lock.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove snapshot {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::QuestionId;

    fn snapshot() -> Snapshot {
        Snapshot {
            quiz_title: "Rust basics".into(),
            current_index: 2,
            answers: HashMap::from([(QuestionId::new("ownership"), 1), (QuestionId::from(4_i64), 0)]),
            remaining_sec: Some(33),
            is_finished: false,
        }
    }

    #[test]
    fn load_without_saved_snapshot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_returns_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();

        store.save(&snapshot()).unwrap();
        assert_eq!(store.load(), Some(snapshot()));
        assert!(store.path().ends_with("quiz-runner-state.json"));
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();

        store.save(&snapshot()).unwrap();
        let mut later = snapshot();
        later.current_index = 0;
        later.is_finished = true;
        store.save(&later).unwrap();

        assert_eq!(store.load(), Some(later));
    }

    #[test]
    fn corrupt_payload_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn clear_removes_snapshot_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();

        store.save(&snapshot()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(!store.path().exists());

        store.clear().unwrap();
    }

    #[test]
    fn clear_failure_is_returned_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();
        // A directory at the snapshot path cannot be removed with remove_file.
        fs::create_dir(store.path()).unwrap();

        let err = store.clear().unwrap_err();
        assert!(format!("{err:#}").contains("quiz-runner-state.json"));
    }

    #[test]
    fn new_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileSnapshotStore::new(&nested).unwrap();

        store.save(&snapshot()).unwrap();
        assert!(nested.join("quiz-runner-state.json").exists());
    }
}
