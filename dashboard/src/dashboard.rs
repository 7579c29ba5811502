//! The dashboard context object.

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, PoisonError};

use agora_gateway::{HttpProposalSource, ProposalSource};
use agora_governance::{
    IdentifierMapper, LedgerGateway, ProposalScanner, ProposalValidation, ScanReport, VoteError,
    VoteOrchestrator, VoteResult, VoteSession, VoteStage,
};
use agora_ledger_evm::{EvmLedger, EvmSession};
use agora_store::SnapshotStore;
use agora_store_lmdb::LmdbSnapshotStore;
use agora_sync::{CacheState, Subscription, SyncCache, SyncPolicy};
use agora_types::{Clock, Proposal, SystemClock, TxHandle, VoterAddress, VoteSupport};

use crate::{DashboardConfig, DashboardError};

/// Everything a front end needs: proposal data, voting, and local vote
/// bookkeeping.
pub struct Dashboard {
    cache: SyncCache,
    source: Arc<dyn ProposalSource>,
    orchestrator: VoteOrchestrator,
    scanner: ProposalScanner,
    evm: Option<EvmLedger>,
    /// Ledger ids voted on from this process.
    voted: Mutex<HashSet<String>>,
}

impl Dashboard {
    /// Assemble a dashboard from explicit collaborators.
    pub fn new(
        source: Arc<dyn ProposalSource>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn LedgerGateway>,
        mapper: Arc<IdentifierMapper>,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            cache: SyncCache::new(source.clone(), store, clock, policy),
            source,
            orchestrator: VoteOrchestrator::new(mapper, ledger.clone()),
            scanner: ProposalScanner::new(ledger),
            evm: None,
            voted: Mutex::new(HashSet::new()),
        }
    }

    /// Production wiring: HTTP backend, LMDB snapshot store, JSON-RPC ledger.
    pub fn open(config: &DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let source = HttpProposalSource::new(config.api_url.clone(), config.request_timeout())?;
        let store = LmdbSnapshotStore::open(&config.data_dir)?;
        let evm = EvmLedger::connect(&config.rpc_url, &config.governor_address)?;
        tracing::info!(
            api = %config.api_url,
            rpc = %config.rpc_url,
            data_dir = %config.data_dir.display(),
            "dashboard opened"
        );

        let mut dashboard = Self::new(
            Arc::new(source),
            Arc::new(store),
            Arc::new(SystemClock),
            Arc::new(evm.clone()),
            Arc::new(config.mapper()),
            config.sync_policy(),
        );
        dashboard.evm = Some(evm);
        Ok(dashboard)
    }

    // ── Proposal data ──────────────────────────────────────────────────

    pub fn cache(&self) -> &SyncCache {
        &self.cache
    }

    pub async fn initialize(&self) {
        self.cache.initialize().await;
    }

    pub async fn refresh(&self) {
        self.cache.refresh().await;
    }

    /// Wait for a background refresh started by the last load.
    pub async fn settle(&self) {
        self.cache.settle().await;
    }

    pub fn state(&self) -> CacheState {
        self.cache.state()
    }

    pub fn subscribe(&self, listener: impl Fn(&CacheState) + Send + Sync + 'static) -> Subscription {
        self.cache.subscribe(listener)
    }

    /// A single proposal: from the cache when present, otherwise from the backend.
    pub async fn proposal(&self, id: &str) -> Result<Proposal, DashboardError> {
        if let Some(proposal) = self.cache.state().find(id) {
            return Ok(proposal.clone());
        }
        Ok(self.source.fetch_proposal(id).await?)
    }

    // ── Identifiers ────────────────────────────────────────────────────

    pub fn mapper(&self) -> &IdentifierMapper {
        self.orchestrator.mapper()
    }

    pub async fn validate(&self, id: &str) -> ProposalValidation {
        self.orchestrator.validate_proposal(id).await
    }

    pub async fn scan(&self, ids: RangeInclusive<u64>, batch_size: usize) -> ScanReport {
        self.scanner.scan(ids, batch_size).await
    }

    // ── Voting ─────────────────────────────────────────────────────────

    pub fn connect(&self, session: Arc<dyn VoteSession>) {
        self.orchestrator.connect(session);
    }

    /// Load a local signing key against the configured ledger.
    pub async fn connect_wallet(&self, private_key: &str) -> Result<VoterAddress, DashboardError> {
        let evm = self.evm.as_ref().ok_or(DashboardError::NoSigner)?;
        let session = EvmSession::connect(evm, private_key).await?;
        let address = session.address().clone();
        self.connect(Arc::new(session));
        Ok(address)
    }

    pub fn disconnect(&self) {
        self.orchestrator.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.orchestrator.is_connected()
    }

    /// Cast a vote, refusing locally when this process already sent one for
    /// the same ledger proposal.
    pub async fn cast_vote(
        &self,
        proposal_id: &str,
        support: VoteSupport,
        reason: Option<&str>,
    ) -> VoteResult {
        let mapped_id = self.mapper().map(proposal_id);
        if self.is_connected() && self.lock_voted().contains(&mapped_id) {
            tracing::debug!(proposal = %mapped_id, "vote already sent from this session");
            return VoteResult::from_stage(&VoteStage::failed(VoteError::AlreadyVoted, None));
        }

        let result = self.orchestrator.cast_vote(proposal_id, support, reason).await;
        if result.success {
            self.lock_voted().insert(mapped_id);
        }
        result
    }

    pub async fn wait_for_transaction(&self, handle: TxHandle) -> VoteResult {
        self.orchestrator.wait_for_transaction(handle).await
    }

    pub fn has_voted_locally(&self, proposal_id: &str) -> bool {
        let mapped_id = self.mapper().map(proposal_id);
        self.lock_voted().contains(&mapped_id)
    }

    /// Drop the local record so the next attempt asks the ledger again.
    pub fn forget_vote(&self, proposal_id: &str) -> bool {
        let mapped_id = self.mapper().map(proposal_id);
        self.lock_voted().remove(&mapped_id)
    }

    /// Stop background work, drop listeners and the signing session.
    pub fn dispose(&self) {
        self.cache.dispose();
        self.orchestrator.disconnect();
    }

    fn lock_voted(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.voted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
