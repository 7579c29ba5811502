//! Nullable ledger and signing session: scripted chain state, no RPC.

use agora_governance::{LedgerError, LedgerGateway, Receipt, VoteCall, VoteSession};
use agora_types::{ProposalState, TxHandle, VoterAddress};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An in-memory governance contract.
///
/// Unknown proposal ids answer [`LedgerError::UnknownProposal`]. Receipts
/// default to success unless scripted otherwise.
pub struct NullLedger {
    states: Mutex<HashMap<String, ProposalState>>,
    votes: Mutex<HashSet<(String, VoterAddress)>>,
    receipts: Mutex<HashMap<TxHandle, Result<Receipt, LedgerError>>>,
    transport_error: Mutex<Option<String>>,
    state_queries: AtomicUsize,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            votes: Mutex::new(HashSet::new()),
            receipts: Mutex::new(HashMap::new()),
            transport_error: Mutex::new(None),
            state_queries: AtomicUsize::new(0),
        }
    }

    pub fn with_proposal(self, id: &str, state: ProposalState) -> Self {
        self.set_state(id, state);
        self
    }

    pub fn set_state(&self, id: &str, state: ProposalState) {
        self.states.lock().unwrap().insert(id.to_string(), state);
    }

    pub fn record_vote(&self, id: &str, voter: &VoterAddress) {
        self.votes
            .lock()
            .unwrap()
            .insert((id.to_string(), voter.clone()));
    }

    /// Script the outcome of waiting on `handle`.
    pub fn set_receipt(&self, handle: TxHandle, outcome: Result<Receipt, LedgerError>) {
        self.receipts.lock().unwrap().insert(handle, outcome);
    }

    /// Make every query fail with a transport error (or recover with `None`).
    pub fn fail_transport(&self, message: Option<&str>) {
        *self.transport_error.lock().unwrap() = message.map(str::to_string);
    }

    pub fn state_queries(&self) -> usize {
        self.state_queries.load(Ordering::SeqCst)
    }

    fn check_transport(&self) -> Result<(), LedgerError> {
        match self.transport_error.lock().unwrap().as_ref() {
            Some(message) => Err(LedgerError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerGateway for NullLedger {
    async fn state(&self, proposal_id: &str) -> Result<ProposalState, LedgerError> {
        tokio::task::yield_now().await;
        self.state_queries.fetch_add(1, Ordering::SeqCst);
        self.check_transport()?;
        self.states
            .lock()
            .unwrap()
            .get(proposal_id)
            .copied()
            .ok_or(LedgerError::UnknownProposal)
    }

    async fn has_voted(&self, proposal_id: &str, voter: &VoterAddress) -> Result<bool, LedgerError> {
        tokio::task::yield_now().await;
        self.check_transport()?;
        if !self.states.lock().unwrap().contains_key(proposal_id) {
            return Err(LedgerError::UnknownProposal);
        }
        Ok(self
            .votes
            .lock()
            .unwrap()
            .contains(&(proposal_id.to_string(), voter.clone())))
    }

    async fn wait_for_receipt(&self, handle: &TxHandle) -> Result<Receipt, LedgerError> {
        tokio::task::yield_now().await;
        self.check_transport()?;
        match self.receipts.lock().unwrap().get(handle) {
            Some(outcome) => outcome.clone(),
            None => Ok(Receipt {
                handle: *handle,
                succeeded: true,
                block_number: Some(1),
            }),
        }
    }
}

/// A signing wallet that records what it was asked to send.
///
/// When linked to a [`NullLedger`], successful submissions are recorded as
/// votes on it.
pub struct NullSession {
    address: VoterAddress,
    estimate: Mutex<Result<u64, LedgerError>>,
    submit_error: Mutex<Option<LedgerError>>,
    submitted: Mutex<Vec<(VoteCall, u64)>>,
    estimates: AtomicUsize,
    ledger: Option<Arc<NullLedger>>,
}

impl NullSession {
    pub const DEFAULT_ESTIMATE: u64 = 100_000;

    pub fn new(address: VoterAddress) -> Self {
        Self {
            address,
            estimate: Mutex::new(Ok(Self::DEFAULT_ESTIMATE)),
            submit_error: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            estimates: AtomicUsize::new(0),
            ledger: None,
        }
    }

    pub fn linked(address: VoterAddress, ledger: Arc<NullLedger>) -> Self {
        Self {
            ledger: Some(ledger),
            ..Self::new(address)
        }
    }

    pub fn set_estimate(&self, outcome: Result<u64, LedgerError>) {
        *self.estimate.lock().unwrap() = outcome;
    }

    pub fn fail_submissions(&self, error: Option<LedgerError>) {
        *self.submit_error.lock().unwrap() = error;
    }

    /// Every call that was broadcast, with the cost limit it carried.
    pub fn submitted(&self) -> Vec<(VoteCall, u64)> {
        self.submitted.lock().unwrap().clone()
    }

    /// Number of cost estimates requested.
    pub fn estimate_count(&self) -> usize {
        self.estimates.load(Ordering::SeqCst)
    }

    /// Deterministic handle for the `n`th submission (1-based).
    pub fn handle_for(n: u64) -> TxHandle {
        let mut bytes = [0xabu8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        TxHandle::new(bytes)
    }
}

#[async_trait]
impl VoteSession for NullSession {
    fn address(&self) -> &VoterAddress {
        &self.address
    }

    async fn estimate_cost(&self, _call: &VoteCall) -> Result<u64, LedgerError> {
        self.estimates.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.estimate.lock().unwrap().clone()
    }

    async fn submit(&self, call: &VoteCall, cost_limit: u64) -> Result<TxHandle, LedgerError> {
        tokio::task::yield_now().await;
        if let Some(error) = self.submit_error.lock().unwrap().clone() {
            return Err(error);
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((call.clone(), cost_limit));
        if let Some(ledger) = &self.ledger {
            ledger.record_vote(&call.proposal_id, &self.address);
        }
        Ok(Self::handle_for(submitted.len() as u64))
    }
}
