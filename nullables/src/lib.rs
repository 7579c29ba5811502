//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! All external dependencies (clock, proposal backend, snapshot storage, ledger,
//! signing wallet) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod source;
pub mod store;

pub use clock::NullClock;
pub use ledger::{NullLedger, NullSession};
pub use source::NullProposalSource;
pub use store::NullSnapshotStore;
