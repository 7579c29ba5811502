//! Built-in placeholder proposals, shown only when nothing else is available.

use agora_types::{
    Proposal, ProposalState, Proposer, Snapshot, Timestamp, VoteCount, VoteRecord, VoteTally,
};

fn tally(for_votes: u128, against: u128, abstain: u128, total: u128) -> VoteTally {
    VoteTally {
        for_votes: VoteCount::new(for_votes),
        against_votes: VoteCount::new(against),
        abstain_votes: VoteCount::new(abstain),
        total_votes: VoteCount::new(total),
    }
}

fn proposer(id: &str, delegated: u128, votes: u64, holders: u64) -> Proposer {
    Proposer {
        id: id.to_string(),
        delegated_votes_raw: VoteCount::new(delegated),
        number_votes: Some(votes),
        token_holders_represented_amount: Some(holders),
    }
}

/// The three placeholder proposals; the first one is active.
pub fn builtin_proposals() -> Vec<Proposal> {
    vec![
        Proposal {
            id: "10".into(),
            description: "# Uniswap V4 Protocol Upgrade\n\n\
                This proposal aims to upgrade the Uniswap protocol to version 4, introducing \
                new features and improvements to the decentralized exchange.\n\n\
                The upgrade includes:\n\
                - Enhanced liquidity management\n\
                - Improved gas efficiency\n\
                - New trading features\n\
                - Better user experience"
                .into(),
            state: ProposalState::Active,
            proposer: proposer("0xabc123...", 1_000_000, 5, 50),
            creation_time: Some("1672531200".into()),
            quorum_votes: VoteCount::new(400_000),
            votes: vec![VoteRecord {
                id: "vote_001".into(),
                weight: VoteCount::new(50_000),
                choice: Some("FOR".into()),
                reason: Some("This is a great upgrade for the protocol.".into()),
            }],
            tally: tally(940_000, 50_000, 10_000, 1_000_000),
        },
        Proposal {
            id: "9".into(),
            description: "# Governance Token Distribution\n\n\
                Proposal to distribute additional governance tokens to active community members."
                .into(),
            state: ProposalState::Executed,
            proposer: proposer("0xdef456...", 800_000, 3, 40),
            creation_time: Some("1672444800".into()),
            quorum_votes: VoteCount::new(400_000),
            votes: Vec::new(),
            tally: tally(775_000, 20_000, 5_000, 800_000),
        },
        Proposal {
            id: "8".into(),
            description: "# Fee Structure Update\n\n\
                Update the fee structure for better protocol sustainability."
                .into(),
            state: ProposalState::Defeated,
            proposer: proposer("0xghi789...", 600_000, 2, 30),
            creation_time: Some("1672358400".into()),
            quorum_votes: VoteCount::new(400_000),
            votes: Vec::new(),
            tally: tally(235_000, 350_000, 15_000, 600_000),
        },
    ]
}

/// Placeholder snapshot stamped at `now`.
pub fn builtin_snapshot(now: Timestamp) -> Snapshot {
    let all_proposals = builtin_proposals();
    let active_proposal = all_proposals.first().cloned();
    Snapshot {
        all_proposals,
        active_proposal,
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_set_is_non_empty_with_active_first() {
        let snapshot = builtin_snapshot(Timestamp::new(5));
        assert_eq!(snapshot.all_proposals.len(), 3);
        let active = snapshot.active_proposal.expect("active");
        assert_eq!(active.id, "10");
        assert!(active.is_active());
        assert_eq!(active.title(), "Uniswap V4 Protocol Upgrade");
        assert_eq!(snapshot.timestamp, Timestamp::new(5));
    }
}
