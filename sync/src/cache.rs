//! The proposal cache context object.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use agora_gateway::ProposalSource;
use agora_store::{PersistedSnapshots, SnapshotStore};
use agora_types::Clock;
use tokio::task::JoinHandle;

use crate::guard::LoadingGuard;
use crate::listeners::Listeners;
use crate::tiers::{standard_tiers, LiveTier};
use crate::{resolve_first, CacheState, ResolveContext, Resolution, Subscription, SyncPolicy, TierResolver};

/// Tiered proposal cache.
///
/// Cheap to clone; clones share state. Lifecycle: `new` → `initialize` →
/// `subscribe` / `refresh` → `dispose`.
#[derive(Clone)]
pub struct SyncCache {
    inner: Arc<Inner>,
}

struct Inner {
    clock: Arc<dyn Clock>,
    policy: SyncPolicy,
    tiers: Vec<Arc<dyn TierResolver>>,
    live: Arc<LiveTier>,
    state: Mutex<CacheState>,
    loading: Arc<AtomicBool>,
    listeners: Arc<Listeners>,
    background: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl SyncCache {
    pub fn new(
        source: Arc<dyn ProposalSource>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        policy: SyncPolicy,
    ) -> Self {
        let persisted = PersistedSnapshots::new(store, policy.storage_key.clone());
        let live = Arc::new(LiveTier::new(
            source,
            persisted.clone(),
            policy.anchor_proposal_id.clone(),
        ));
        let tiers = standard_tiers(live.clone(), persisted, policy.recent_window);
        Self {
            inner: Arc::new(Inner {
                clock,
                policy,
                tiers,
                live,
                state: Mutex::new(CacheState::default()),
                loading: Arc::new(AtomicBool::new(false)),
                listeners: Arc::new(Listeners::default()),
                background: Mutex::new(None),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.inner.policy
    }

    /// Populate the cache from the best available tier.
    ///
    /// No-op when the data is already initialized and fresh, or when a load
    /// is already in flight.
    pub async fn initialize(&self) {
        self.load(false).await;
    }

    /// Re-resolve regardless of freshness.
    pub async fn refresh(&self) {
        self.load(true).await;
    }

    /// Copy of the current state.
    pub fn state(&self) -> CacheState {
        self.inner.lock_state().clone()
    }

    /// Register `listener` to be called after every state change.
    pub fn subscribe(&self, listener: impl Fn(&CacheState) + Send + Sync + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    /// Wait for a pending background refresh, if any.
    pub async fn settle(&self) {
        let handle = self
            .inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "background refresh task failed");
                }
            }
        }
    }

    /// Stop background work and drop every listener. Later loads are no-ops.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        if let Some(handle) = self
            .inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        self.inner.listeners.clear();
        tracing::debug!("proposal cache disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    async fn load(&self, force: bool) {
        let inner = &self.inner;
        if self.is_disposed() {
            return;
        }
        let now = inner.clock.now();
        if !force {
            let state = inner.lock_state();
            if state.is_initialized && state.is_fresh(inner.policy.freshness_window, now) {
                tracing::debug!("proposal data fresh, skipping load");
                return;
            }
        }
        let Some(guard) = LoadingGuard::acquire(&inner.loading) else {
            tracing::debug!("proposal load already in flight");
            return;
        };

        let current = inner.update(|s| s.is_loading = true);
        let ctx = ResolveContext { now, current };
        let resolution = resolve_first(&inner.tiers, &ctx).await;

        match resolution {
            Some(resolution) => {
                let background = resolution.refresh_in_background;
                inner.adopt(resolution);
                if background {
                    self.spawn_background_refresh(guard);
                }
            }
            None => {
                inner.update(|s| s.is_loading = false);
            }
        }
    }

    /// Fetch from the backend without blocking the caller. The loading guard
    /// moves into the task, so foreground loads are no-ops until it finishes.
    fn spawn_background_refresh(&self, guard: LoadingGuard) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let ctx = ResolveContext {
                now: inner.clock.now(),
                current: inner.lock_state().clone(),
            };
            match inner.live.resolve(&ctx).await {
                Some(resolution) if !inner.disposed.load(Ordering::SeqCst) => {
                    tracing::debug!("background refresh replaced persisted data");
                    inner.adopt(resolution);
                }
                Some(_) => {}
                None => tracing::debug!("background refresh found nothing newer"),
            }
        });
        *self
            .inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f`, then notify listeners outside the lock. Returns the new state.
    fn update(&self, f: impl FnOnce(&mut CacheState)) -> CacheState {
        let snapshot = {
            let mut state = self.lock_state();
            f(&mut state);
            state.clone()
        };
        self.listeners.emit(&snapshot);
        snapshot
    }

    fn adopt(&self, resolution: Resolution) {
        let Resolution {
            tier,
            snapshot,
            fetched_at,
            error,
            ..
        } = resolution;
        self.update(|s| {
            s.all_proposals = snapshot.all_proposals;
            s.active_proposal = snapshot.active_proposal;
            s.last_fetched = fetched_at;
            s.error = error;
            s.origin = Some(tier);
            s.is_initialized = true;
            s.is_loading = false;
        });
    }
}
