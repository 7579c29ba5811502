use std::time::Duration;

use agora_store::DEFAULT_SNAPSHOT_KEY;

/// Tunables for the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPolicy {
    /// In-memory data younger than this is served without re-resolving.
    pub freshness_window: Duration,
    /// A persisted snapshot younger than this is adopted before trying the backend.
    pub recent_window: Duration,
    /// Proposal preferred as "active" when present in a live listing.
    pub anchor_proposal_id: String,
    /// Slot the snapshot is persisted under.
    pub storage_key: String,
}

impl SyncPolicy {
    pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_RECENT: Duration = Duration::from_secs(2 * 60);
    pub const DEFAULT_ANCHOR: &'static str = "10";
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            freshness_window: Self::DEFAULT_FRESHNESS,
            recent_window: Self::DEFAULT_RECENT,
            anchor_proposal_id: Self::DEFAULT_ANCHOR.to_string(),
            storage_key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}
