//! Fundamental types for the Agora governance client.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! proposals and their tallies, ledger lifecycle states, vote choices, transaction
//! handles, cache snapshots, and timestamps.

pub mod address;
pub mod error;
pub mod hash;
pub mod proposal;
pub mod snapshot;
pub mod state;
pub mod time;
pub mod vote;

pub use address::VoterAddress;
pub use error::TypesError;
pub use hash::TxHandle;
pub use proposal::{Proposal, Proposer, VoteCount, VoteRecord, VoteTally};
pub use snapshot::Snapshot;
pub use state::ProposalState;
pub use time::{Clock, SystemClock, Timestamp};
pub use vote::VoteSupport;
