//! Nullable proposal backend: scripted responses, no network.

use agora_gateway::{GatewayError, ProposalSource};
use agora_types::Proposal;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A proposal backend that serves a scripted listing.
///
/// Every call yields to the runtime once before answering, so concurrent
/// callers genuinely interleave.
pub struct NullProposalSource {
    reachable: AtomicBool,
    proposals: Mutex<Vec<Proposal>>,
    fetch_error: Mutex<Option<GatewayError>>,
    health_checks: AtomicUsize,
    fetches: AtomicUsize,
}

impl NullProposalSource {
    /// A reachable backend serving `proposals`.
    pub fn serving(proposals: Vec<Proposal>) -> Self {
        Self {
            reachable: AtomicBool::new(true),
            proposals: Mutex::new(proposals),
            fetch_error: Mutex::new(None),
            health_checks: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A backend whose health check fails.
    pub fn unreachable() -> Self {
        let source = Self::serving(Vec::new());
        source.set_reachable(false);
        source
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn set_proposals(&self, proposals: Vec<Proposal>) {
        *self.proposals.lock().unwrap() = proposals;
    }

    /// Make listing fetches fail with `error` (or succeed again with `None`).
    pub fn fail_fetches(&self, error: Option<GatewayError>) {
        *self.fetch_error.lock().unwrap() = error;
    }

    pub fn health_check_count(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for NullProposalSource {
    fn default() -> Self {
        Self::serving(Vec::new())
    }
}

#[async_trait]
impl ProposalSource for NullProposalSource {
    async fn is_reachable(&self) -> bool {
        tokio::task::yield_now().await;
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        self.reachable.load(Ordering::SeqCst)
    }

    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, GatewayError> {
        tokio::task::yield_now().await;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(GatewayError::Request("connection refused".into()));
        }
        if let Some(error) = self.fetch_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.proposals.lock().unwrap().clone())
    }

    async fn fetch_proposal(&self, id: &str) -> Result<Proposal, GatewayError> {
        tokio::task::yield_now().await;
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(GatewayError::Request("connection refused".into()));
        }
        self.proposals
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }
}
