//! Seams to the governance ledger: read-only queries and the signing session.

use agora_types::{ProposalState, TxHandle, VoterAddress, VoteSupport};
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a ledger adapter, already classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger has no proposal under the requested id, or its answer
    /// could not be decoded as one.
    #[error("proposal does not exist on the ledger")]
    UnknownProposal,

    #[error("transaction was rejected by the signer")]
    UserRejected,

    #[error("insufficient funds for fees")]
    InsufficientFunds,

    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("ledger transport error: {0}")]
    Transport(String),
}

/// Which contract entry point a vote uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallVariant {
    /// `castVote(proposalId, support)`
    Plain,
    /// `castVoteWithReason(proposalId, support, reason)`
    WithReason,
}

/// A fully resolved vote call, addressed by ledger identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCall {
    pub proposal_id: String,
    pub support: VoteSupport,
    pub reason: Option<String>,
}

impl VoteCall {
    /// Build a call; a blank reason selects the plain variant.
    pub fn new(proposal_id: impl Into<String>, support: VoteSupport, reason: Option<&str>) -> Self {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        Self {
            proposal_id: proposal_id.into(),
            support,
            reason,
        }
    }

    pub fn variant(&self) -> CallVariant {
        if self.reason.is_some() {
            CallVariant::WithReason
        } else {
            CallVariant::Plain
        }
    }
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub handle: TxHandle,
    pub succeeded: bool,
    pub block_number: Option<u64>,
}

/// Read-only access to the governance contract.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Lifecycle state of `proposal_id`.
    ///
    /// Returns [`LedgerError::UnknownProposal`] when the proposal does not exist.
    async fn state(&self, proposal_id: &str) -> Result<ProposalState, LedgerError>;

    /// Whether `voter` has already voted on `proposal_id`.
    async fn has_voted(&self, proposal_id: &str, voter: &VoterAddress) -> Result<bool, LedgerError>;

    /// Block until `handle` is mined and return its receipt.
    async fn wait_for_receipt(&self, handle: &TxHandle) -> Result<Receipt, LedgerError>;
}

/// A connected signing wallet.
#[async_trait]
pub trait VoteSession: Send + Sync {
    fn address(&self) -> &VoterAddress;

    /// Execution cost the ledger expects `call` to consume.
    async fn estimate_cost(&self, call: &VoteCall) -> Result<u64, LedgerError>;

    /// Sign and broadcast `call` with an explicit cost ceiling.
    async fn submit(&self, call: &VoteCall, cost_limit: u64) -> Result<TxHandle, LedgerError>;
}
