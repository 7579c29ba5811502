//! LMDB environment setup.

use std::path::{Path, PathBuf};

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

const SNAPSHOTS_DB: &str = "snapshots";

/// Default map size: snapshots are small, 64 MiB leaves ample headroom.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Wraps the LMDB environment and the snapshot database handle.
pub struct LmdbEnvironment {
    env: Env,
    path: PathBuf,
    pub(crate) snapshots_db: Database<Str, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this process
        // and never memory-mapped elsewhere while it is alive.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let snapshots_db: Database<Str, Bytes> =
            env.create_database(&mut wtxn, Some(SNAPSHOTS_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB snapshot environment");
        Ok(Self {
            env,
            path: path.to_path_buf(),
            snapshots_db,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
