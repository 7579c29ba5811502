//! Vote orchestrator: drives a vote from intent to confirmation.

use std::sync::{Arc, PoisonError, RwLock};

use agora_types::{ProposalState, TxHandle, VoterAddress, VoteSupport};

use crate::{
    InactiveReason, IdentifierMapper, LedgerError, LedgerGateway, RevertPhase, TxStatus, VoteCall,
    VoteError, VoteIntent, VoteResult, VoteSession, VoteStage, VoteTransaction,
};

/// Headroom added on top of the ledger's cost estimate, in percent.
pub const COST_MARGIN_PERCENT: u64 = 20;

const CONFIRM_FAILED_MESSAGE: &str = "Failed to confirm transaction";

/// Result of a read-only existence/state check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalValidation {
    pub exists: bool,
    pub state: Option<ProposalState>,
    pub mapped_id: String,
    pub error: Option<String>,
}

impl ProposalValidation {
    pub fn accepts_votes(&self) -> bool {
        self.state.is_some_and(|s| s.accepts_votes())
    }
}

/// Runs the vote pipeline against a ledger, using whichever signing session
/// is currently connected.
pub struct VoteOrchestrator {
    mapper: Arc<IdentifierMapper>,
    ledger: Arc<dyn LedgerGateway>,
    session: RwLock<Option<Arc<dyn VoteSession>>>,
}

impl VoteOrchestrator {
    pub fn new(mapper: Arc<IdentifierMapper>, ledger: Arc<dyn LedgerGateway>) -> Self {
        Self {
            mapper,
            ledger,
            session: RwLock::new(None),
        }
    }

    pub fn mapper(&self) -> &Arc<IdentifierMapper> {
        &self.mapper
    }

    /// Attach a signing session, replacing any previous one.
    pub fn connect(&self, session: Arc<dyn VoteSession>) {
        tracing::info!(voter = %session.address().short(), "wallet connected");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn disconnect(&self) {
        if self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            tracing::info!("wallet disconnected");
        }
    }

    pub fn session(&self) -> Option<Arc<dyn VoteSession>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_connected(&self) -> bool {
        self.session().is_some()
    }

    /// Validate, estimate and submit a vote. Returns once the transaction is
    /// broadcast; use [`wait_for_transaction`](Self::wait_for_transaction) to
    /// follow it to inclusion.
    pub async fn cast_vote(
        &self,
        proposal_id: &str,
        support: VoteSupport,
        reason: Option<&str>,
    ) -> VoteResult {
        let mut stage = VoteStage::Idle(VoteIntent::new(proposal_id, support, reason));
        loop {
            stage = self.advance(stage).await;
            if matches!(stage, VoteStage::Submitted(_)) || stage.is_terminal() {
                break;
            }
        }
        VoteResult::from_stage(&stage)
    }

    /// Wait for a submitted vote, known only by its handle, to be mined.
    pub async fn wait_for_transaction(&self, handle: TxHandle) -> VoteResult {
        match self.await_inclusion(handle).await {
            Ok(()) => VoteResult::succeeded(Some(handle), VoteResult::CONFIRMED_MESSAGE),
            Err((error, message)) => VoteResult::failure(error, Some(handle), message),
        }
    }

    /// Perform one transition. Terminal stages are returned unchanged.
    pub async fn advance(&self, stage: VoteStage) -> VoteStage {
        let from = stage.name();
        let next = match stage {
            VoteStage::Idle(intent) => self.begin(intent),
            VoteStage::Validating { voter, tx } => self.validate(voter, tx).await,
            VoteStage::EstimatingCost(tx) => self.estimate(tx).await,
            VoteStage::Submitting { tx, cost_limit } => self.submit(tx, cost_limit).await,
            VoteStage::Submitted(tx) => match tx.handle {
                Some(_) => VoteStage::Confirming(tx),
                None => VoteStage::failed(
                    VoteError::Unexpected("submitted vote has no transaction handle".into()),
                    Some(tx),
                ),
            },
            VoteStage::Confirming(tx) => self.confirm(tx).await,
            terminal => terminal,
        };
        tracing::debug!(from, to = next.name(), "vote stage transition");
        next
    }

    /// Check whether a dashboard proposal exists on the ledger and in what state.
    pub async fn validate_proposal(&self, proposal_id: &str) -> ProposalValidation {
        let mapped_id = self.mapper.map(proposal_id);
        match self.ledger.state(&mapped_id).await {
            Ok(state) => ProposalValidation {
                exists: true,
                state: Some(state),
                mapped_id,
                error: None,
            },
            Err(LedgerError::UnknownProposal) => ProposalValidation {
                exists: false,
                state: None,
                mapped_id,
                error: Some(InactiveReason::DoesNotExist.to_string()),
            },
            Err(e) => ProposalValidation {
                exists: false,
                state: None,
                mapped_id,
                error: Some(e.to_string()),
            },
        }
    }

    fn begin(&self, intent: VoteIntent) -> VoteStage {
        let Some(session) = self.session() else {
            return VoteStage::failed(VoteError::WalletNotConnected, None);
        };
        let mapped_id = self.mapper.map(&intent.proposal_id);
        let call = VoteCall::new(mapped_id, intent.support, intent.reason.as_deref());
        VoteStage::Validating {
            voter: session.address().clone(),
            tx: VoteTransaction {
                proposal_id: intent.proposal_id,
                mapped_id: call.proposal_id,
                support: call.support,
                reason: call.reason,
                handle: None,
                status: TxStatus::Preparing,
            },
        }
    }

    async fn validate(&self, voter: VoterAddress, tx: VoteTransaction) -> VoteStage {
        let state = self.ledger.state(&tx.mapped_id).await;
        let state = match state {
            Ok(state) => state,
            Err(LedgerError::UnknownProposal) => {
                return VoteStage::failed(
                    VoteError::ProposalInactive(InactiveReason::DoesNotExist),
                    Some(tx),
                )
            }
            Err(e) => return VoteStage::failed(VoteError::Unexpected(e.to_string()), Some(tx)),
        };
        if !state.accepts_votes() {
            return VoteStage::failed(
                VoteError::ProposalInactive(InactiveReason::State(state)),
                Some(tx),
            );
        }

        let voted = self.ledger.has_voted(&tx.mapped_id, &voter).await;
        let voted = match voted {
            Ok(voted) => voted,
            Err(LedgerError::UnknownProposal) => false,
            Err(e) => return VoteStage::failed(VoteError::Unexpected(e.to_string()), Some(tx)),
        };
        if voted {
            return VoteStage::failed(VoteError::AlreadyVoted, Some(tx));
        }
        VoteStage::EstimatingCost(tx)
    }

    async fn estimate(&self, tx: VoteTransaction) -> VoteStage {
        let Some(session) = self.session() else {
            return VoteStage::failed(VoteError::WalletNotConnected, Some(tx));
        };
        let estimate = session.estimate_cost(&call_for(&tx)).await;
        match estimate {
            Ok(cost) => VoteStage::Submitting {
                cost_limit: with_margin(cost),
                tx,
            },
            Err(e) => {
                tracing::debug!(proposal = %tx.mapped_id, error = %e, "cost estimation failed");
                VoteStage::failed(VoteError::EstimationFailed(e.to_string()), Some(tx))
            }
        }
    }

    async fn submit(&self, mut tx: VoteTransaction, cost_limit: u64) -> VoteStage {
        let Some(session) = self.session() else {
            return VoteStage::failed(VoteError::WalletNotConnected, Some(tx));
        };
        let submission = session.submit(&call_for(&tx), cost_limit).await;
        match submission {
            Ok(handle) => {
                tracing::info!(
                    proposal = %tx.mapped_id,
                    support = %tx.support,
                    tx = %handle,
                    "vote submitted"
                );
                tx.handle = Some(handle);
                tx.status = TxStatus::Submitted;
                VoteStage::Submitted(tx)
            }
            Err(e) => {
                let error = match e {
                    LedgerError::UserRejected => VoteError::UserRejected,
                    LedgerError::InsufficientFunds => VoteError::InsufficientFunds,
                    LedgerError::Reverted(_) => VoteError::ExecutionReverted(RevertPhase::Submission),
                    other => {
                        tracing::warn!(proposal = %tx.mapped_id, error = %other, "vote submission failed");
                        VoteError::Unexpected(other.to_string())
                    }
                };
                VoteStage::failed(error, Some(tx))
            }
        }
    }

    async fn confirm(&self, mut tx: VoteTransaction) -> VoteStage {
        let Some(handle) = tx.handle else {
            return VoteStage::failed(
                VoteError::Unexpected("submitted vote has no transaction handle".into()),
                Some(tx),
            );
        };
        match self.await_inclusion(handle).await {
            Ok(()) => {
                tx.status = TxStatus::Confirmed;
                VoteStage::Confirmed(tx)
            }
            Err((error, message)) => VoteStage::failed_with(error, Some(tx), message),
        }
    }

    /// Wait for the receipt. On failure, the error and the message to show.
    async fn await_inclusion(&self, handle: TxHandle) -> Result<(), (VoteError, String)> {
        match self.ledger.wait_for_receipt(&handle).await {
            Ok(receipt) if receipt.succeeded => {
                tracing::info!(tx = %handle, block = ?receipt.block_number, "vote confirmed");
                Ok(())
            }
            Ok(_) | Err(LedgerError::Reverted(_)) => {
                let error = VoteError::ExecutionReverted(RevertPhase::Inclusion);
                let message = error.to_string();
                Err((error, message))
            }
            Err(e) => {
                tracing::warn!(tx = %handle, error = %e, "waiting for vote receipt failed");
                Err((
                    VoteError::Unexpected(e.to_string()),
                    CONFIRM_FAILED_MESSAGE.to_string(),
                ))
            }
        }
    }
}

fn call_for(tx: &VoteTransaction) -> VoteCall {
    VoteCall {
        proposal_id: tx.mapped_id.clone(),
        support: tx.support,
        reason: tx.reason.clone(),
    }
}

/// `cost` inflated by [`COST_MARGIN_PERCENT`], saturating at `u64::MAX`.
pub(crate) fn with_margin(cost: u64) -> u64 {
    let inflated = u128::from(cost) * u128::from(100 + COST_MARGIN_PERCENT) / 100;
    u64::try_from(inflated).unwrap_or(u64::MAX)
}
