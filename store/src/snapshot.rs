//! Snapshot storage trait and the best-effort wrapper used by the cache.

use std::sync::Arc;

use agora_types::Snapshot;

use crate::StoreError;

/// Key the proposal snapshot is stored under unless configured otherwise.
pub const DEFAULT_SNAPSHOT_KEY: &str = "agora_proposals_data";

/// Trait for durable key-value storage of proposal snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Store `snapshot` under `key`, replacing any previous value.
    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Remove the snapshot stored under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Best-effort view of one snapshot slot.
///
/// Persistence is a cache tier, never a source of failure: errors are logged
/// and reported as "nothing stored" / "not saved".
#[derive(Clone)]
pub struct PersistedSnapshots {
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl PersistedSnapshots {
    pub fn new(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored snapshot, or `None` when absent or unreadable.
    pub fn get(&self) -> Option<Snapshot> {
        match self.store.load(&self.key) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to load persisted snapshot");
                None
            }
        }
    }

    /// Persist `snapshot`; returns whether it was written.
    pub fn set(&self, snapshot: &Snapshot) -> bool {
        match self.store.save(&self.key, snapshot) {
            Ok(()) => {
                tracing::debug!(
                    key = %self.key,
                    proposals = snapshot.all_proposals.len(),
                    "snapshot persisted"
                );
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to persist snapshot");
                false
            }
        }
    }

    /// Drop the stored snapshot; returns whether the removal succeeded.
    pub fn clear(&self) -> bool {
        match self.store.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to clear persisted snapshot");
                false
            }
        }
    }
}
