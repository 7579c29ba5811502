//! Proposal data synchronization.
//!
//! [`SyncCache`] decides where the proposal list shown to the user comes from.
//! Sources are tried in a fixed order, first hit wins:
//!
//! 1. a persisted snapshot captured within the recent window (a background
//!    refresh is started after adopting it)
//! 2. the live backend
//! 3. any persisted snapshot, whatever its age
//! 4. the data already in memory, when it came from the live backend
//! 5. the built-in placeholder set
//!
//! Failures never escape the cache; they show up as `CacheState::error`.

pub mod cache;
pub mod fallback;
mod guard;
pub mod listeners;
pub mod policy;
pub mod state;
pub mod tiers;

pub use cache::SyncCache;
pub use listeners::Subscription;
pub use policy::SyncPolicy;
pub use state::CacheState;
pub use tiers::{resolve_first, Resolution, ResolveContext, Tier, TierResolver};
