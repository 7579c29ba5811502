//! LMDB implementation of SnapshotStore.

use std::path::Path;
use std::sync::Arc;

use agora_store::{SnapshotStore, StoreError};
use agora_types::Snapshot;

use crate::environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use crate::LmdbError;

/// Durable snapshot storage backed by an LMDB environment.
#[derive(Clone)]
pub struct LmdbSnapshotStore {
    env: Arc<LmdbEnvironment>,
}

impl LmdbSnapshotStore {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }

    /// Open (or create) a store in `dir` with the default map size.
    pub fn open(dir: &Path) -> Result<Self, LmdbError> {
        Ok(Self::new(Arc::new(LmdbEnvironment::open(dir, DEFAULT_MAP_SIZE)?)))
    }
}

impl SnapshotStore for LmdbSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let Some(bytes) = self
            .env
            .snapshots_db
            .get(&rtxn, key)
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let snapshot = serde_json::from_slice(bytes).map_err(LmdbError::from)?;
        Ok(Some(snapshot))
    }

    fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(snapshot).map_err(LmdbError::from)?;
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        self.env
            .snapshots_db
            .put(&mut wtxn, key, bytes.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        self.env
            .snapshots_db
            .delete(&mut wtxn, key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
