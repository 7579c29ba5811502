//! Nullable store: thread-safe in-memory snapshot storage for testing.

use agora_store::{SnapshotStore, StoreError};
use agora_types::Snapshot;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// An in-memory snapshot store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
///
/// Reads and writes can be made to fail to exercise the best-effort paths.
pub struct NullSnapshotStore {
    slots: Mutex<HashMap<String, Snapshot>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl NullSnapshotStore {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// Start with `snapshot` stored under `key`.
    pub fn with_snapshot(key: &str, snapshot: Snapshot) -> Self {
        let store = Self::new();
        store
            .slots
            .lock()
            .unwrap()
            .insert(key.to_string(), snapshot);
        store
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The snapshot currently stored under `key`, bypassing failure toggles.
    pub fn peek(&self, key: &str) -> Option<Snapshot> {
        self.slots.lock().unwrap().get(key).cloned()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for NullSnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for NullSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Serialization("unreadable snapshot".into()));
        }
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage full".into()));
        }
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage read-only".into()));
        }
        self.slots.lock().unwrap().remove(key);
        Ok(())
    }
}
