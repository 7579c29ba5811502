//! Data sources for the cache, one resolver per tier.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use agora_gateway::ProposalSource;
use agora_store::PersistedSnapshots;
use agora_types::{Snapshot, Timestamp};
use async_trait::async_trait;

use crate::fallback::builtin_snapshot;
use crate::CacheState;

/// Error recorded when a refresh fails but live data is kept.
pub const RETAINED_ERROR: &str = "Failed to refresh data, but keeping existing data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    RecentPersisted,
    Live,
    StalePersisted,
    Retained,
    BuiltIn,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RecentPersisted => "recent-persisted",
            Self::Live => "live",
            Self::Retained => "retained",
            Self::StalePersisted => "stale-persisted",
            Self::BuiltIn => "built-in",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs every resolver sees.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    pub now: Timestamp,
    /// Cache contents before this resolution.
    pub current: CacheState,
}

/// A tier's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tier: Tier,
    pub snapshot: Snapshot,
    /// Value for `CacheState::last_fetched` once adopted.
    pub fetched_at: Option<Timestamp>,
    pub error: Option<String>,
    /// Try the live backend in the background after adopting this.
    pub refresh_in_background: bool,
}

impl Resolution {
    fn adopted(tier: Tier, snapshot: Snapshot) -> Self {
        Self {
            tier,
            fetched_at: Some(snapshot.timestamp),
            snapshot,
            error: None,
            refresh_in_background: false,
        }
    }
}

#[async_trait]
pub trait TierResolver: Send + Sync {
    fn tier(&self) -> Tier;

    /// `None` passes to the next tier.
    async fn resolve(&self, ctx: &ResolveContext) -> Option<Resolution>;
}

/// Evaluate `resolvers` in order and return the first answer.
pub async fn resolve_first(
    resolvers: &[Arc<dyn TierResolver>],
    ctx: &ResolveContext,
) -> Option<Resolution> {
    for resolver in resolvers {
        match resolver.resolve(ctx).await {
            Some(resolution) => {
                tracing::debug!(
                    tier = %resolver.tier(),
                    proposals = resolution.snapshot.all_proposals.len(),
                    "tier resolved"
                );
                return Some(resolution);
            }
            None => tracing::debug!(tier = %resolver.tier(), "tier passed"),
        }
    }
    None
}

/// The standard tier order.
pub fn standard_tiers(
    live: Arc<LiveTier>,
    persisted: PersistedSnapshots,
    recent_window: Duration,
) -> Vec<Arc<dyn TierResolver>> {
    vec![
        Arc::new(RecentPersistedTier {
            persisted: persisted.clone(),
            window: recent_window,
        }),
        live,
        Arc::new(StalePersistedTier { persisted }),
        Arc::new(RetainedTier),
        Arc::new(BuiltInTier),
    ]
}

/// Persisted snapshot inside the recent window.
pub struct RecentPersistedTier {
    persisted: PersistedSnapshots,
    window: Duration,
}

#[async_trait]
impl TierResolver for RecentPersistedTier {
    fn tier(&self) -> Tier {
        Tier::RecentPersisted
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Option<Resolution> {
        let snapshot = self.persisted.get().filter(|s| !s.is_empty())?;
        if !snapshot.is_within(self.window, ctx.now) {
            return None;
        }
        Some(Resolution {
            refresh_in_background: true,
            ..Resolution::adopted(Tier::RecentPersisted, snapshot)
        })
    }
}

/// Health check, then a full listing from the backend. A non-empty listing
/// is persisted before it is returned.
pub struct LiveTier {
    source: Arc<dyn ProposalSource>,
    persisted: PersistedSnapshots,
    anchor_id: String,
}

impl LiveTier {
    pub fn new(
        source: Arc<dyn ProposalSource>,
        persisted: PersistedSnapshots,
        anchor_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            persisted,
            anchor_id: anchor_id.into(),
        }
    }
}

#[async_trait]
impl TierResolver for LiveTier {
    fn tier(&self) -> Tier {
        Tier::Live
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Option<Resolution> {
        if !self.source.is_reachable().await {
            tracing::debug!("backend unreachable");
            return None;
        }
        let proposals = match self.source.fetch_proposals().await {
            Ok(proposals) if proposals.is_empty() => {
                tracing::debug!("backend returned no proposals");
                return None;
            }
            Ok(proposals) => proposals,
            Err(e) => {
                tracing::warn!(error = %e, "live proposal fetch failed");
                return None;
            }
        };
        let snapshot = Snapshot::capture(proposals, &self.anchor_id, ctx.now);
        self.persisted.set(&snapshot);
        tracing::info!(proposals = snapshot.all_proposals.len(), "adopted live proposals");
        Some(Resolution::adopted(Tier::Live, snapshot))
    }
}

/// Keep in-memory data that itself came from the backend, flagging the
/// failed refresh. Reached only when no persisted snapshot can be read.
pub struct RetainedTier;

#[async_trait]
impl TierResolver for RetainedTier {
    fn tier(&self) -> Tier {
        Tier::Retained
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Option<Resolution> {
        let current = &ctx.current;
        let live_origin = matches!(current.origin, Some(Tier::Live | Tier::Retained));
        if !live_origin || current.all_proposals.is_empty() {
            return None;
        }
        tracing::warn!("refresh failed, keeping existing live data");
        Some(Resolution {
            tier: Tier::Retained,
            snapshot: Snapshot {
                all_proposals: current.all_proposals.clone(),
                active_proposal: current.active_proposal.clone(),
                timestamp: current.last_fetched.unwrap_or(ctx.now),
            },
            fetched_at: current.last_fetched,
            error: Some(RETAINED_ERROR.to_string()),
            refresh_in_background: false,
        })
    }
}

/// Any persisted snapshot, whatever its age.
pub struct StalePersistedTier {
    persisted: PersistedSnapshots,
}

#[async_trait]
impl TierResolver for StalePersistedTier {
    fn tier(&self) -> Tier {
        Tier::StalePersisted
    }

    async fn resolve(&self, _ctx: &ResolveContext) -> Option<Resolution> {
        let snapshot = self.persisted.get().filter(|s| !s.is_empty())?;
        Some(Resolution::adopted(Tier::StalePersisted, snapshot))
    }
}

/// Placeholder proposals. Always answers.
pub struct BuiltInTier;

#[async_trait]
impl TierResolver for BuiltInTier {
    fn tier(&self) -> Tier {
        Tier::BuiltIn
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Option<Resolution> {
        Some(Resolution::adopted(Tier::BuiltIn, builtin_snapshot(ctx.now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::builtin_proposals;
    use agora_gateway::GatewayError;
    use agora_nullables::{NullProposalSource, NullSnapshotStore};
    use agora_store::DEFAULT_SNAPSHOT_KEY;

    const NOW: u64 = 1_000_000;

    fn ctx() -> ResolveContext {
        ResolveContext {
            now: Timestamp::new(NOW),
            current: CacheState::default(),
        }
    }

    fn persisted_at(age: u64) -> (Arc<NullSnapshotStore>, PersistedSnapshots) {
        let snapshot = Snapshot::capture(builtin_proposals(), "10", Timestamp::new(NOW - age));
        let store = Arc::new(NullSnapshotStore::with_snapshot(DEFAULT_SNAPSHOT_KEY, snapshot));
        let slot = PersistedSnapshots::new(store.clone(), DEFAULT_SNAPSHOT_KEY);
        (store, slot)
    }

    fn empty_slot() -> (Arc<NullSnapshotStore>, PersistedSnapshots) {
        let store = Arc::new(NullSnapshotStore::new());
        let slot = PersistedSnapshots::new(store.clone(), DEFAULT_SNAPSHOT_KEY);
        (store, slot)
    }

    #[tokio::test]
    async fn recent_tier_respects_window() {
        let (_store, slot) = persisted_at(90);
        let tier = RecentPersistedTier {
            persisted: slot,
            window: Duration::from_secs(120),
        };
        let resolution = tier.resolve(&ctx()).await.expect("recent");
        assert!(resolution.refresh_in_background);
        assert_eq!(resolution.fetched_at, Some(Timestamp::new(NOW - 90)));

        let (_store, slot) = persisted_at(120);
        let tier = RecentPersistedTier {
            persisted: slot,
            window: Duration::from_secs(120),
        };
        assert!(tier.resolve(&ctx()).await.is_none());
    }

    #[tokio::test]
    async fn live_tier_persists_and_picks_anchor() {
        let (store, slot) = empty_slot();
        let mut proposals = builtin_proposals();
        proposals.reverse();
        let source = Arc::new(NullProposalSource::serving(proposals));
        let tier = LiveTier::new(source, slot, "10");

        let resolution = tier.resolve(&ctx()).await.expect("live");

        assert_eq!(resolution.tier, Tier::Live);
        assert_eq!(resolution.snapshot.active_proposal.map(|p| p.id), Some("10".into()));
        assert_eq!(store.save_count(), 1);
        assert_eq!(
            store.peek(DEFAULT_SNAPSHOT_KEY).map(|s| s.timestamp),
            Some(Timestamp::new(NOW))
        );
    }

    #[tokio::test]
    async fn live_tier_passes_on_unreachable_empty_or_error() {
        let (_store, slot) = empty_slot();

        let unreachable = Arc::new(NullProposalSource::unreachable());
        let tier = LiveTier::new(unreachable.clone(), slot.clone(), "10");
        assert!(tier.resolve(&ctx()).await.is_none());
        assert_eq!(unreachable.fetch_count(), 0);

        let empty = Arc::new(NullProposalSource::serving(Vec::new()));
        assert!(LiveTier::new(empty, slot.clone(), "10").resolve(&ctx()).await.is_none());

        let failing = Arc::new(NullProposalSource::serving(builtin_proposals()));
        failing.fail_fetches(Some(GatewayError::Status(502)));
        assert!(LiveTier::new(failing, slot, "10").resolve(&ctx()).await.is_none());
    }

    #[tokio::test]
    async fn live_tier_survives_persistence_failure() {
        let (store, slot) = empty_slot();
        store.fail_writes(true);
        let source = Arc::new(NullProposalSource::serving(builtin_proposals()));
        let resolution = LiveTier::new(source, slot, "10").resolve(&ctx()).await;
        assert!(resolution.is_some());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn retained_tier_only_keeps_live_data() {
        let mut context = ctx();
        assert!(RetainedTier.resolve(&context).await.is_none());

        context.current = CacheState {
            all_proposals: builtin_proposals(),
            last_fetched: Some(Timestamp::new(NOW - 30)),
            is_initialized: true,
            origin: Some(Tier::StalePersisted),
            ..CacheState::default()
        };
        assert!(RetainedTier.resolve(&context).await.is_none());

        context.current.origin = Some(Tier::Live);
        let resolution = RetainedTier.resolve(&context).await.expect("retained");
        assert_eq!(resolution.error.as_deref(), Some(RETAINED_ERROR));
        assert_eq!(resolution.fetched_at, Some(Timestamp::new(NOW - 30)));
        assert_eq!(resolution.snapshot.all_proposals.len(), 3);
    }

    #[tokio::test]
    async fn stale_tier_ignores_age_but_not_emptiness() {
        let (_store, slot) = persisted_at(86_400);
        let tier = StalePersistedTier { persisted: slot };
        assert!(tier.resolve(&ctx()).await.is_some());

        let empty = Snapshot::capture(Vec::new(), "10", Timestamp::new(NOW));
        let store = Arc::new(NullSnapshotStore::with_snapshot(DEFAULT_SNAPSHOT_KEY, empty));
        let tier = StalePersistedTier {
            persisted: PersistedSnapshots::new(store, DEFAULT_SNAPSHOT_KEY),
        };
        assert!(tier.resolve(&ctx()).await.is_none());
    }

    #[tokio::test]
    async fn unreadable_store_passes() {
        let (store, slot) = persisted_at(10);
        store.fail_reads(true);
        let tier = StalePersistedTier { persisted: slot };
        assert!(tier.resolve(&ctx()).await.is_none());
    }

    #[tokio::test]
    async fn persisted_snapshot_is_preferred_over_retained_data() {
        let (_store, slot) = persisted_at(600);
        let live = Arc::new(LiveTier::new(
            Arc::new(NullProposalSource::unreachable()),
            slot.clone(),
            "10",
        ));
        let tiers = standard_tiers(live, slot, Duration::from_secs(120));
        let mut context = ctx();
        context.current = CacheState {
            all_proposals: builtin_proposals(),
            last_fetched: Some(Timestamp::new(NOW - 600)),
            is_initialized: true,
            origin: Some(Tier::Live),
            ..CacheState::default()
        };

        let resolution = resolve_first(&tiers, &context).await.expect("stale");

        assert_eq!(resolution.tier, Tier::StalePersisted);
        assert_eq!(resolution.error, None);
    }

    #[tokio::test]
    async fn first_answer_wins() {
        let (_store, slot) = empty_slot();
        let live = Arc::new(LiveTier::new(
            Arc::new(NullProposalSource::unreachable()),
            slot.clone(),
            "10",
        ));
        let tiers = standard_tiers(live, slot, Duration::from_secs(120));

        let resolution = resolve_first(&tiers, &ctx()).await.expect("built-in");

        assert_eq!(resolution.tier, Tier::BuiltIn);
        assert!(!resolution.snapshot.all_proposals.is_empty());
    }
}
