//! Cache snapshots: the proposal set, its active proposal, and capture time.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Proposal, Timestamp};

/// A captured proposal set.
///
/// This is the shape persisted between sessions; the in-memory cache state
/// carries the same three pieces plus its own bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(alias = "allProposals")]
    pub all_proposals: Vec<Proposal>,
    #[serde(alias = "activeProposal", default)]
    pub active_proposal: Option<Proposal>,
    pub timestamp: Timestamp,
}

impl Snapshot {
    /// Build a snapshot, choosing the active proposal from `proposals`.
    ///
    /// Preference order: the proposal whose id equals `anchor_id`, then any
    /// proposal in the Active state, then the first one.
    pub fn capture(proposals: Vec<Proposal>, anchor_id: &str, timestamp: Timestamp) -> Self {
        let active_proposal = proposals
            .iter()
            .find(|p| p.id == anchor_id)
            .or_else(|| proposals.iter().find(|p| p.is_active()))
            .or_else(|| proposals.first())
            .cloned();
        Self {
            all_proposals: proposals,
            active_proposal,
            timestamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all_proposals.is_empty()
    }

    /// Seconds since capture.
    pub fn age(&self, now: Timestamp) -> u64 {
        self.timestamp.elapsed_since(now)
    }

    /// Whether the snapshot was captured less than `window` ago.
    pub fn is_within(&self, window: Duration, now: Timestamp) -> bool {
        self.timestamp.is_within(window, now)
    }

    pub fn find(&self, id: &str) -> Option<&Proposal> {
        self.all_proposals.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProposalState, Proposer, VoteTally};

    fn proposal(id: &str, state: ProposalState) -> Proposal {
        Proposal {
            id: id.into(),
            description: format!("# Proposal {id}"),
            state,
            proposer: Proposer::default(),
            creation_time: None,
            quorum_votes: Default::default(),
            votes: Vec::new(),
            tally: VoteTally::default(),
        }
    }

    #[test]
    fn anchor_wins_over_active() {
        let snap = Snapshot::capture(
            vec![
                proposal("7", ProposalState::Active),
                proposal("10", ProposalState::Executed),
            ],
            "10",
            Timestamp::new(5),
        );
        assert_eq!(snap.active_proposal.unwrap().id, "10");
    }

    #[test]
    fn active_state_used_without_anchor() {
        let snap = Snapshot::capture(
            vec![
                proposal("3", ProposalState::Defeated),
                proposal("4", ProposalState::Active),
            ],
            "10",
            Timestamp::new(5),
        );
        assert_eq!(snap.active_proposal.unwrap().id, "4");
    }

    #[test]
    fn first_used_as_last_resort() {
        let snap = Snapshot::capture(
            vec![
                proposal("3", ProposalState::Defeated),
                proposal("4", ProposalState::Executed),
            ],
            "10",
            Timestamp::new(5),
        );
        assert_eq!(snap.active_proposal.unwrap().id, "3");
        assert!(Snapshot::capture(Vec::new(), "10", Timestamp::new(5))
            .active_proposal
            .is_none());
    }

    #[test]
    fn accepts_camel_case_persisted_shape() {
        let json = r#"{"allProposals": [], "activeProposal": null, "timestamp": 42}"#;
        let snap: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.age(Timestamp::new(100)), 58);
    }
}
