//! LMDB storage backend for proposal snapshots.
//!
//! Implements [`agora_store::SnapshotStore`] using the `heed` LMDB bindings.
//! Snapshots are stored JSON-encoded in a single named database, keyed by slot name.

pub mod environment;
pub mod error;
pub mod snapshot;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use snapshot::LmdbSnapshotStore;
