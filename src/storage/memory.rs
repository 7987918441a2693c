use std::sync::RwLock;

use anyhow::Result;

use crate::models::Snapshot;

use super::{decode_snapshot, SnapshotStore};

/// In-process slot holding the serialized snapshot.
///
/// Stores the JSON text rather than the value so it behaves like the file
/// store, including for payloads that fail to decode.
#[derive(Default)]
pub struct MemorySnapshotStore {
    slot: RwLock<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with an arbitrary payload.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        match self.slot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let serialized = serde_json::to_string(snapshot)?;
        let mut guard = match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(serialized);
        Ok(())
    }

    fn load(&self) -> Option<Snapshot> {
        self.raw()
            .and_then(|raw| decode_snapshot(&raw, "memory store"))
    }

    fn clear(&self) -> Result<()> {
        let mut guard = match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn save_load_clear_cycle() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().is_none());

        let snapshot = Snapshot {
            quiz_title: "T".into(),
            current_index: 1,
            answers: HashMap::new(),
            remaining_sec: Some(9),
            is_finished: false,
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load(), Some(snapshot));

        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(store.raw().is_none());
    }

    #[test]
    fn unparseable_payload_is_treated_as_absent() {
        let store = MemorySnapshotStore::with_raw("[1, 2");
        assert!(store.load().is_none());
        // The raw payload is left in place until overwritten or cleared.
        assert!(store.raw().is_some());
    }
}
