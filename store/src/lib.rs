//! Abstract snapshot storage.
//!
//! Every persistence backend (LMDB, in-memory for testing) implements
//! [`SnapshotStore`]. Callers that treat persistence as best-effort go through
//! [`PersistedSnapshots`], which turns every failure into a logged `None`/`false`.

pub mod error;
pub mod snapshot;

pub use error::StoreError;
pub use snapshot::{PersistedSnapshots, SnapshotStore, DEFAULT_SNAPSHOT_KEY};
