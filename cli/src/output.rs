//! Plain-text rendering for terminal output.

use std::fmt::Write;

use agora_governance::{ProposalValidation, ScanReport, VoteResult};
use agora_sync::CacheState;
use agora_types::{Proposal, Timestamp};
use agora_utils::format_duration;

/// One row per proposal, the active one marked with `*`, followed by a line
/// naming where the data came from and how old it is.
pub fn listing(state: &CacheState, now: Timestamp) -> String {
    let mut out = String::new();
    let active_id = state.active_proposal.as_ref().map(|p| p.id.as_str());
    for proposal in &state.all_proposals {
        let marker = if Some(proposal.id.as_str()) == active_id { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:>4}  {:<10} {:<14} {}",
            proposal.id,
            proposal.state.label(),
            proposal.category(),
            proposal.title()
        );
    }
    if state.all_proposals.is_empty() {
        out.push_str("no proposals\n");
    }
    out.push_str(&origin_line(state, now));
    out.push('\n');
    out
}

pub fn origin_line(state: &CacheState, now: Timestamp) -> String {
    let origin = state.origin.map(|t| t.name()).unwrap_or("none");
    let mut line = match state.last_fetched {
        Some(at) => format!(
            "source: {origin}, fetched {} ago",
            format_duration(at.elapsed_since(now))
        ),
        None => format!("source: {origin}"),
    };
    if let Some(error) = &state.error {
        let _ = write!(line, " ({error})");
    }
    line
}

pub fn details(proposal: &Proposal) -> String {
    let tally = &proposal.tally;
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", proposal.title(), proposal.state.label());
    let _ = writeln!(out, "id:        {}", proposal.id);
    let _ = writeln!(out, "category:  {}", proposal.category());
    let _ = writeln!(out, "proposer:  {}", proposal.proposer.id);
    if let Some(created) = &proposal.creation_time {
        let _ = writeln!(out, "created:   {created}");
    }
    let _ = writeln!(out, "for:       {}", tally.for_votes.whole_tokens());
    let _ = writeln!(out, "against:   {}", tally.against_votes.whole_tokens());
    let _ = writeln!(out, "abstain:   {}", tally.abstain_votes.whole_tokens());
    let _ = writeln!(out, "quorum:    {}", proposal.quorum_votes.whole_tokens());
    if let Some(bps) = tally.approval_bps() {
        let _ = writeln!(out, "approval:  {}.{:02}%", bps / 100, bps % 100);
    }
    let _ = writeln!(out, "voters:    {}", proposal.votes.len());
    out
}

pub fn validation(id: &str, report: &ProposalValidation) -> String {
    let verdict = match (report.exists, report.state) {
        (true, Some(state)) if report.accepts_votes() => format!("{} (accepting votes)", state.label()),
        (true, Some(state)) => state.label().to_string(),
        _ => "not on-chain".to_string(),
    };
    let mut line = format!("{id} -> {}: {verdict}", report.mapped_id);
    if let Some(error) = &report.error {
        let _ = write!(line, " ({error})");
    }
    line
}

pub fn scan_report(report: &ScanReport) -> String {
    let mut out = String::new();
    for (id, state) in &report.found {
        let _ = writeln!(out, "{id:>6}  {}", state.label());
    }
    for (id, error) in &report.errors {
        let _ = writeln!(out, "{id:>6}  error: {error}");
    }
    let _ = writeln!(
        out,
        "{} found, {} active, {} missing, {} errors",
        report.found.len(),
        report.active_ids().len(),
        report.missing.len(),
        report.errors.len()
    );
    out
}

pub fn vote_result(result: &VoteResult) -> String {
    match result.tx_handle {
        Some(handle) => format!("{}\ntransaction: {handle}", result.message),
        None => result.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_governance::VoteError;
    use agora_sync::Tier;
    use agora_types::{ProposalState, Proposer, TxHandle, VoteCount, VoteTally};

    fn proposal(id: &str, state: ProposalState, description: &str) -> Proposal {
        Proposal {
            id: id.into(),
            description: description.into(),
            state,
            proposer: Proposer::default(),
            creation_time: None,
            quorum_votes: VoteCount::ZERO,
            votes: Vec::new(),
            tally: VoteTally::default(),
        }
    }

    #[test]
    fn listing_marks_active_and_reports_age() {
        let active = proposal("10", ProposalState::Active, "# Uniswap fee switch");
        let state = CacheState {
            all_proposals: vec![active.clone(), proposal("9", ProposalState::Executed, "Grants")],
            active_proposal: Some(active),
            last_fetched: Some(Timestamp::new(1_000)),
            is_initialized: true,
            origin: Some(Tier::Live),
            ..CacheState::default()
        };

        let text = listing(&state, Timestamp::new(1_090));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("*   10  ACTIVE"));
        assert!(lines[0].ends_with("Uniswap fee switch"));
        assert!(lines[1].starts_with("     9  EXECUTED"));
        assert_eq!(lines[2], format!("source: {}, fetched 1m 30s ago", Tier::Live.name()));
    }

    #[test]
    fn origin_line_carries_retained_error() {
        let state = CacheState {
            origin: Some(Tier::Retained),
            error: Some("backend down".into()),
            ..CacheState::default()
        };
        let line = origin_line(&state, Timestamp::new(0));
        assert!(line.ends_with("(backend down)"));
    }

    #[test]
    fn empty_listing_says_so() {
        let text = listing(&CacheState::default(), Timestamp::new(0));
        assert!(text.starts_with("no proposals\n"));
    }

    #[test]
    fn validation_names_mapped_id() {
        let report = ProposalValidation {
            exists: true,
            state: Some(ProposalState::Active),
            mapped_id: "88".into(),
            error: None,
        };
        assert_eq!(validation("91", &report), "91 -> 88: ACTIVE (accepting votes)");

        let missing = ProposalValidation {
            exists: false,
            state: None,
            mapped_id: "1".into(),
            error: Some("Proposal does not exist on-chain".into()),
        };
        assert_eq!(
            validation("500", &missing),
            "500 -> 1: not on-chain (Proposal does not exist on-chain)"
        );
    }

    #[test]
    fn scan_summary_counts_each_bucket() {
        let report = ScanReport {
            found: vec![(1, ProposalState::Executed), (2, ProposalState::Active)],
            missing: vec![3],
            errors: vec![(4, "timeout".into())],
        };
        let text = scan_report(&report);
        assert!(text.contains("     4  error: timeout"));
        assert!(text.ends_with("2 found, 1 active, 1 missing, 1 errors\n"));
    }

    #[test]
    fn vote_result_shows_handle_when_present() {
        let ok = VoteResult {
            success: true,
            tx_handle: Some(TxHandle::ZERO),
            error: None,
            message: "Vote confirmed on-chain!".into(),
        };
        assert!(vote_result(&ok).ends_with(&TxHandle::ZERO.to_string()));

        let failed = VoteResult {
            success: false,
            tx_handle: None,
            error: Some(VoteError::AlreadyVoted),
            message: VoteError::AlreadyVoted.to_string(),
        };
        assert_eq!(vote_result(&failed), "You have already voted on this proposal");
    }
}
