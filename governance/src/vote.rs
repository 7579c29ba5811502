//! Vote lifecycle types.

use agora_types::{TxHandle, VoterAddress, VoteSupport};

use crate::VoteError;

/// A vote as requested by the voter, addressed by dashboard id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteIntent {
    pub proposal_id: String,
    pub support: VoteSupport,
    pub reason: Option<String>,
}

impl VoteIntent {
    pub fn new(proposal_id: impl Into<String>, support: VoteSupport, reason: Option<&str>) -> Self {
        Self {
            proposal_id: proposal_id.into(),
            support,
            reason: reason.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Preparing,
    Submitted,
    Confirmed,
    Failed,
}

/// The vote transaction as it moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTransaction {
    /// Dashboard id the voter picked.
    pub proposal_id: String,
    /// Ledger id the vote is cast on.
    pub mapped_id: String,
    pub support: VoteSupport,
    pub reason: Option<String>,
    pub handle: Option<TxHandle>,
    pub status: TxStatus,
}

/// One step of the vote pipeline.
///
/// `Submitted`, `Confirmed` and `Failed` are terminal for
/// [`cast_vote`](crate::VoteOrchestrator::cast_vote); advancing `Submitted`
/// moves on to confirmation. The transaction's `status` follows the stage:
/// `Preparing` until submission, then `Submitted`, then `Confirmed` or
/// `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteStage {
    Idle(VoteIntent),
    Validating {
        voter: VoterAddress,
        tx: VoteTransaction,
    },
    EstimatingCost(VoteTransaction),
    Submitting {
        tx: VoteTransaction,
        cost_limit: u64,
    },
    Submitted(VoteTransaction),
    Confirming(VoteTransaction),
    Confirmed(VoteTransaction),
    Failed {
        error: VoteError,
        /// Absent when the vote failed before a transaction was prepared.
        tx: Option<VoteTransaction>,
        message: String,
    },
}

impl VoteStage {
    /// Failure with the error's own message.
    pub fn failed(error: VoteError, tx: Option<VoteTransaction>) -> Self {
        let message = error.to_string();
        Self::failed_with(error, tx, message)
    }

    /// Failure with a caller-chosen message. Marks the transaction failed.
    pub fn failed_with(error: VoteError, tx: Option<VoteTransaction>, message: String) -> Self {
        let tx = tx.map(|mut tx| {
            tx.status = TxStatus::Failed;
            tx
        });
        Self::Failed { error, tx, message }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle(_) => "idle",
            Self::Validating { .. } => "validating",
            Self::EstimatingCost(_) => "estimating-cost",
            Self::Submitting { .. } => "submitting",
            Self::Submitted(_) => "submitted",
            Self::Confirming(_) => "confirming",
            Self::Confirmed(_) => "confirmed",
            Self::Failed { .. } => "failed",
        }
    }

    /// No further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Failed { .. })
    }

    /// The transaction being processed, once one exists.
    pub fn transaction(&self) -> Option<&VoteTransaction> {
        match self {
            Self::Idle(_) => None,
            Self::Validating { tx, .. } | Self::Submitting { tx, .. } => Some(tx),
            Self::EstimatingCost(tx)
            | Self::Submitted(tx)
            | Self::Confirming(tx)
            | Self::Confirmed(tx) => Some(tx),
            Self::Failed { tx, .. } => tx.as_ref(),
        }
    }

    pub fn handle(&self) -> Option<TxHandle> {
        self.transaction().and_then(|tx| tx.handle)
    }
}

/// What the caller sees at the end of `cast_vote` or `wait_for_transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteResult {
    pub success: bool,
    pub tx_handle: Option<TxHandle>,
    pub error: Option<VoteError>,
    pub message: String,
}

impl VoteResult {
    pub const SUBMITTED_MESSAGE: &'static str =
        "Vote submitted successfully! Transaction is being processed.";
    pub const CONFIRMED_MESSAGE: &'static str = "Vote confirmed on-chain!";

    /// Summarize a stage. Non-terminal stages other than `Submitted` and
    /// `Confirming` are reported as an unexpected failure.
    pub fn from_stage(stage: &VoteStage) -> Self {
        match stage {
            VoteStage::Submitted(_) | VoteStage::Confirming(_) => {
                Self::succeeded(stage.handle(), Self::SUBMITTED_MESSAGE)
            }
            VoteStage::Confirmed(_) => Self::succeeded(stage.handle(), Self::CONFIRMED_MESSAGE),
            VoteStage::Failed { error, message, .. } => {
                Self::failure(error.clone(), stage.handle(), message.clone())
            }
            other => {
                let error = VoteError::Unexpected(format!("vote stopped at {}", other.name()));
                let message = error.to_string();
                Self::failure(error, None, message)
            }
        }
    }

    pub(crate) fn succeeded(tx_handle: Option<TxHandle>, message: &str) -> Self {
        Self {
            success: true,
            tx_handle,
            error: None,
            message: message.to_string(),
        }
    }

    pub(crate) fn failure(error: VoteError, tx_handle: Option<TxHandle>, message: String) -> Self {
        Self {
            success: false,
            tx_handle,
            error: Some(error),
            message,
        }
    }
}
