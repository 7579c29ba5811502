use agora_types::ProposalState;
use std::fmt;
use thiserror::Error;

/// Every way a vote attempt can fail, as reported to the caller.
///
/// `Display` is the human-readable message shown to the voter; [`VoteError::code`]
/// is the stable machine-readable kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("Please connect your wallet to vote")]
    WalletNotConnected,

    #[error("{0}")]
    ProposalInactive(InactiveReason),

    #[error("You have already voted on this proposal")]
    AlreadyVoted,

    #[error("Unable to estimate gas. The proposal may not be active or you may have already voted.")]
    EstimationFailed(String),

    #[error("Transaction was rejected by user")]
    UserRejected,

    #[error("Insufficient funds for gas fees")]
    InsufficientFunds,

    #[error("{0}")]
    ExecutionReverted(RevertPhase),

    #[error("{0}")]
    Unexpected(String),
}

impl VoteError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::WalletNotConnected => "wallet-not-connected",
            Self::ProposalInactive(_) => "proposal-inactive",
            Self::AlreadyVoted => "already-voted",
            Self::EstimationFailed(_) => "estimation-failed",
            Self::UserRejected => "user-rejected",
            Self::InsufficientFunds => "insufficient-funds",
            Self::ExecutionReverted(_) => "execution-reverted",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// Whether repeating the same attempt later can succeed without the
    /// voter changing anything on the ledger side.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::WalletNotConnected | Self::UserRejected | Self::InsufficientFunds | Self::Unexpected(_)
        )
    }
}

/// Why a proposal cannot take votes right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactiveReason {
    State(ProposalState),
    /// The ledger has no proposal under the mapped id.
    DoesNotExist,
}

impl InactiveReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::State(ProposalState::Pending) => "Proposal is pending",
            Self::State(ProposalState::Canceled) => "Proposal has been canceled",
            Self::State(ProposalState::Defeated) => "Proposal has been defeated",
            Self::State(ProposalState::Succeeded) => "Proposal has already succeeded",
            Self::State(ProposalState::Queued) => "Proposal is queued for execution",
            Self::State(ProposalState::Expired) => "Proposal has expired",
            Self::State(ProposalState::Executed) => "Proposal has been executed",
            Self::State(ProposalState::Active) => {
                "This proposal is not currently active for voting"
            }
            Self::DoesNotExist => "Proposal does not exist on-chain",
        }
    }
}

impl fmt::Display for InactiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Where a revert was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertPhase {
    /// The node refused the transaction when it was sent.
    Submission,
    /// The transaction was mined but its receipt reports failure.
    Inclusion,
}

impl fmt::Display for RevertPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submission => f.write_str(
                "Transaction failed. You may have already voted or the proposal is not active.",
            ),
            Self::Inclusion => f.write_str("Transaction was reverted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_inactive_state_has_a_distinct_message() {
        let mut seen = std::collections::HashSet::new();
        for state in ProposalState::ALL {
            assert!(seen.insert(InactiveReason::State(state).message()));
        }
        assert!(seen.insert(InactiveReason::DoesNotExist.message()));
    }

    #[test]
    fn display_is_the_user_message() {
        assert_eq!(
            VoteError::ProposalInactive(InactiveReason::State(ProposalState::Defeated)).to_string(),
            "Proposal has been defeated"
        );
        assert_eq!(
            VoteError::AlreadyVoted.to_string(),
            "You have already voted on this proposal"
        );
        assert_eq!(
            VoteError::ExecutionReverted(RevertPhase::Inclusion).to_string(),
            "Transaction was reverted"
        );
        assert_eq!(VoteError::Unexpected("nonce too low".into()).to_string(), "nonce too low");
    }

    #[test]
    fn codes_are_kebab_case() {
        assert_eq!(VoteError::WalletNotConnected.code(), "wallet-not-connected");
        assert_eq!(VoteError::EstimationFailed(String::new()).code(), "estimation-failed");
        assert_eq!(VoteError::Unexpected(String::new()).code(), "unexpected");
    }
}
