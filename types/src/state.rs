//! Proposal lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The lifecycle state of a governance proposal.
///
/// The discriminants match the `uint8` the governor contract returns from
/// `state(proposalId)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProposalState {
    Pending = 0,
    Active = 1,
    Canceled = 2,
    Defeated = 3,
    Succeeded = 4,
    Queued = 5,
    Expired = 6,
    Executed = 7,
}

impl ProposalState {
    pub const ALL: [ProposalState; 8] = [
        Self::Pending,
        Self::Active,
        Self::Canceled,
        Self::Defeated,
        Self::Succeeded,
        Self::Queued,
        Self::Expired,
        Self::Executed,
    ];

    /// Decode the ledger's numeric encoding.
    pub fn from_index(index: u8) -> Result<Self, TypesError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(TypesError::StateIndex(index))
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Upper-case label, as used by the proposal backend.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Canceled => "CANCELED",
            Self::Defeated => "DEFEATED",
            Self::Succeeded => "SUCCEEDED",
            Self::Queued => "QUEUED",
            Self::Expired => "EXPIRED",
            Self::Executed => "EXECUTED",
        }
    }

    /// Whether votes can currently be cast.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the proposal can never become votable again.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Defeated | Self::Expired | Self::Executed
        )
    }
}

impl FromStr for ProposalState {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            "CANCELED" | "CANCELLED" => Ok(Self::Canceled),
            "DEFEATED" => Ok(Self::Defeated),
            "SUCCEEDED" => Ok(Self::Succeeded),
            "QUEUED" => Ok(Self::Queued),
            "EXPIRED" => Ok(Self::Expired),
            "EXECUTED" => Ok(Self::Executed),
            _ => Err(TypesError::UnknownState(s.to_string())),
        }
    }
}

impl TryFrom<String> for ProposalState {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProposalState> for String {
    fn from(state: ProposalState) -> Self {
        state.label().to_string()
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_governor_encoding() {
        assert_eq!(ProposalState::from_index(1).unwrap(), ProposalState::Active);
        assert_eq!(ProposalState::from_index(3).unwrap(), ProposalState::Defeated);
        assert_eq!(ProposalState::from_index(7).unwrap(), ProposalState::Executed);
        assert_eq!(
            ProposalState::from_index(8),
            Err(TypesError::StateIndex(8))
        );
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("active".parse::<ProposalState>().unwrap(), ProposalState::Active);
        assert_eq!("Cancelled".parse::<ProposalState>().unwrap(), ProposalState::Canceled);
        assert!("voting".parse::<ProposalState>().is_err());
    }

    #[test]
    fn only_active_accepts_votes() {
        for state in ProposalState::ALL {
            assert_eq!(state.accepts_votes(), state == ProposalState::Active);
        }
    }
}
