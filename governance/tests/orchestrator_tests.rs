//! Integration tests for the vote pipeline:
//! intent → validation → cost estimation → submission → confirmation.
//!
//! The orchestrator runs against the nullable ledger and signing session, so
//! every transition and every failure kind is reachable deterministically.

use std::sync::Arc;

use agora_governance::{
    CallVariant, IdentifierMapper, InactiveReason, LedgerError, ProposalScanner, Receipt,
    RevertPhase, TxStatus, VoteError, VoteIntent, VoteOrchestrator, VoteResult, VoteStage,
};
use agora_nullables::{NullLedger, NullSession};
use agora_types::{ProposalState, TxHandle, VoterAddress, VoteSupport};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn voter() -> VoterAddress {
    "0x408ED6354d4973f66138C91495F2f2FCbd8724C3".parse().expect("valid address")
}

fn active_ledger() -> Arc<NullLedger> {
    Arc::new(
        NullLedger::new()
            .with_proposal("88", ProposalState::Active)
            .with_proposal("10", ProposalState::Defeated),
    )
}

fn orchestrator(ledger: &Arc<NullLedger>) -> VoteOrchestrator {
    VoteOrchestrator::new(Arc::new(IdentifierMapper::default()), ledger.clone())
}

fn connected(ledger: &Arc<NullLedger>) -> (VoteOrchestrator, Arc<NullSession>) {
    let orchestrator = orchestrator(ledger);
    let session = Arc::new(NullSession::linked(voter(), ledger.clone()));
    orchestrator.connect(session.clone());
    (orchestrator, session)
}

fn error_of(result: &VoteResult) -> &VoteError {
    result.error.as_ref().expect("failed result carries an error")
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vote_on_mapped_active_proposal_is_submitted() {
    let ledger = active_ledger();
    let (orchestrator, session) = connected(&ledger);

    let result = orchestrator.cast_vote("91", VoteSupport::For, None).await;

    assert!(result.success, "{result:?}");
    assert_eq!(result.message, VoteResult::SUBMITTED_MESSAGE);
    assert_eq!(result.tx_handle, Some(NullSession::handle_for(1)));

    let submitted = session.submitted();
    assert_eq!(submitted.len(), 1);
    let (call, cost_limit) = &submitted[0];
    assert_eq!(call.proposal_id, "88");
    assert_eq!(call.support, VoteSupport::For);
    assert_eq!(call.variant(), CallVariant::Plain);
    assert_eq!(*cost_limit, NullSession::DEFAULT_ESTIMATE * 120 / 100);
}

#[tokio::test]
async fn reason_selects_the_reasoned_call() {
    let ledger = active_ledger();
    let (orchestrator, session) = connected(&ledger);

    let result = orchestrator
        .cast_vote("88", VoteSupport::Abstain, Some("  need an audit first "))
        .await;

    assert!(result.success);
    let (call, _) = &session.submitted()[0];
    assert_eq!(call.variant(), CallVariant::WithReason);
    assert_eq!(call.reason.as_deref(), Some("need an audit first"));
}

#[tokio::test]
async fn stages_advance_one_at_a_time() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);

    let mut stage = VoteStage::Idle(VoteIntent::new("91", VoteSupport::Against, None));
    let mut names = vec![stage.name()];
    while !stage.is_terminal() {
        stage = orchestrator.advance(stage).await;
        names.push(stage.name());
    }

    assert_eq!(
        names,
        vec![
            "idle",
            "validating",
            "estimating-cost",
            "submitting",
            "submitted",
            "confirming",
            "confirmed"
        ]
    );
}

#[tokio::test]
async fn submitted_transaction_records_both_ids() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);

    let mut stage = VoteStage::Idle(VoteIntent::new("91", VoteSupport::For, None));
    while !matches!(stage, VoteStage::Submitted(_)) {
        stage = orchestrator.advance(stage).await;
        assert!(!stage.is_terminal(), "stopped early at {stage:?}");
    }
    let VoteStage::Submitted(tx) = stage else {
        unreachable!()
    };
    assert_eq!(tx.proposal_id, "91");
    assert_eq!(tx.mapped_id, "88");
    assert_eq!(tx.status, TxStatus::Submitted);
    assert!(tx.handle.is_some());
}

#[tokio::test]
async fn confirmed_stage_marks_transaction_confirmed() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);

    let mut stage = VoteStage::Idle(VoteIntent::new("91", VoteSupport::For, None));
    while !stage.is_terminal() {
        stage = orchestrator.advance(stage).await;
    }

    let VoteStage::Confirmed(tx) = stage else {
        panic!("expected confirmation, got {stage:?}");
    };
    assert_eq!(tx.status, TxStatus::Confirmed);
    assert_eq!(tx.proposal_id, "91");
    assert_eq!(tx.mapped_id, "88");
    assert_eq!(tx.handle, Some(NullSession::handle_for(1)));
}

#[tokio::test]
async fn reverted_inclusion_marks_transaction_failed() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);
    let handle = NullSession::handle_for(1);
    ledger.set_receipt(
        handle,
        Ok(Receipt {
            handle,
            succeeded: false,
            block_number: Some(19_000_000),
        }),
    );

    let mut stage = VoteStage::Idle(VoteIntent::new("88", VoteSupport::For, None));
    while !stage.is_terminal() {
        stage = orchestrator.advance(stage).await;
    }

    let tx = stage.transaction().expect("failed stage keeps the transaction");
    assert_eq!(tx.status, TxStatus::Failed);
    assert_eq!(stage.handle(), Some(handle));
    let result = VoteResult::from_stage(&stage);
    assert_eq!(result.message, "Transaction was reverted");
    assert_eq!(result.tx_handle, Some(handle));
}

#[tokio::test]
async fn validation_failure_marks_unsent_transaction_failed() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);

    let mut stage = VoteStage::Idle(VoteIntent::new("10", VoteSupport::For, None));
    while !stage.is_terminal() {
        stage = orchestrator.advance(stage).await;
    }

    let tx = stage.transaction().expect("transaction was prepared");
    assert_eq!(tx.status, TxStatus::Failed);
    assert_eq!(tx.handle, None);
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_wallet_fails_before_any_ledger_call() {
    let ledger = active_ledger();
    let orchestrator = orchestrator(&ledger);

    let result = orchestrator.cast_vote("88", VoteSupport::For, None).await;

    assert!(!result.success);
    assert_eq!(error_of(&result), &VoteError::WalletNotConnected);
    assert_eq!(result.message, "Please connect your wallet to vote");
    assert_eq!(ledger.state_queries(), 0);
}

#[tokio::test]
async fn disconnect_drops_the_session() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);
    assert!(orchestrator.is_connected());

    orchestrator.disconnect();

    assert!(!orchestrator.is_connected());
    let result = orchestrator.cast_vote("88", VoteSupport::For, None).await;
    assert_eq!(error_of(&result), &VoteError::WalletNotConnected);
}

#[tokio::test]
async fn inactive_proposal_reports_its_state() {
    let ledger = active_ledger();
    let (orchestrator, session) = connected(&ledger);

    let result = orchestrator.cast_vote("10", VoteSupport::For, None).await;

    assert_eq!(
        error_of(&result),
        &VoteError::ProposalInactive(InactiveReason::State(ProposalState::Defeated))
    );
    assert_eq!(result.message, "Proposal has been defeated");
    assert_eq!(session.estimate_count(), 0);
    assert!(session.submitted().is_empty());
}

#[tokio::test]
async fn missing_proposal_does_not_exist() {
    let ledger = Arc::new(NullLedger::new());
    let (orchestrator, _session) = connected(&ledger);

    let result = orchestrator.cast_vote("4", VoteSupport::For, None).await;

    assert_eq!(
        error_of(&result),
        &VoteError::ProposalInactive(InactiveReason::DoesNotExist)
    );
    assert_eq!(error_of(&result).code(), "proposal-inactive");
}

#[tokio::test]
async fn unmapped_id_is_validated_against_fallback() {
    let ledger = Arc::new(NullLedger::new().with_proposal("1", ProposalState::Executed));
    let (orchestrator, _session) = connected(&ledger);

    let result = orchestrator.cast_vote("12345", VoteSupport::For, None).await;

    assert_eq!(result.message, "Proposal has been executed");
}

#[tokio::test]
async fn second_vote_is_already_voted() {
    let ledger = active_ledger();
    let (orchestrator, session) = connected(&ledger);

    assert!(orchestrator.cast_vote("88", VoteSupport::For, None).await.success);
    assert_eq!(session.estimate_count(), 1);
    let result = orchestrator.cast_vote("91", VoteSupport::Against, None).await;

    assert_eq!(error_of(&result), &VoteError::AlreadyVoted);
    assert_eq!(result.message, "You have already voted on this proposal");
    assert_eq!(session.estimate_count(), 1);
    assert_eq!(session.submitted().len(), 1);
}

#[tokio::test]
async fn transport_failure_during_validation_is_unexpected() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);
    ledger.fail_transport(Some("connection reset"));

    let result = orchestrator.cast_vote("88", VoteSupport::For, None).await;

    assert!(matches!(error_of(&result), VoteError::Unexpected(msg) if msg.contains("connection reset")));
}

// ---------------------------------------------------------------------------
// Estimation and submission failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn estimation_failure_never_submits() {
    let ledger = active_ledger();
    let (orchestrator, session) = connected(&ledger);
    session.set_estimate(Err(LedgerError::Reverted("GovernorBravo::castVote: voting is closed".into())));

    let result = orchestrator.cast_vote("88", VoteSupport::For, None).await;

    assert_eq!(error_of(&result).code(), "estimation-failed");
    assert_eq!(session.estimate_count(), 1);
    assert_eq!(
        result.message,
        "Unable to estimate gas. The proposal may not be active or you may have already voted."
    );
    assert!(session.submitted().is_empty());
}

#[tokio::test]
async fn submission_errors_are_classified() {
    let cases = [
        (LedgerError::UserRejected, VoteError::UserRejected),
        (LedgerError::InsufficientFunds, VoteError::InsufficientFunds),
        (
            LedgerError::Reverted("out of gas".into()),
            VoteError::ExecutionReverted(RevertPhase::Submission),
        ),
        (
            LedgerError::Transport("nonce too low".into()),
            VoteError::Unexpected(LedgerError::Transport("nonce too low".into()).to_string()),
        ),
    ];

    for (ledger_error, expected) in cases {
        let ledger = active_ledger();
        let (orchestrator, session) = connected(&ledger);
        session.fail_submissions(Some(ledger_error));

        let result = orchestrator.cast_vote("88", VoteSupport::For, None).await;

        assert!(!result.success);
        assert_eq!(error_of(&result), &expected);
        assert_eq!(result.tx_handle, None);
    }
}

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_receipt_confirms() {
    let ledger = active_ledger();
    let (orchestrator, _session) = connected(&ledger);
    let handle = orchestrator
        .cast_vote("88", VoteSupport::For, None)
        .await
        .tx_handle
        .expect("handle");

    let result = orchestrator.wait_for_transaction(handle).await;

    assert!(result.success);
    assert_eq!(result.message, "Vote confirmed on-chain!");
    assert_eq!(result.tx_handle, Some(handle));
}

#[tokio::test]
async fn failed_receipt_is_reverted() {
    let ledger = active_ledger();
    let orchestrator = orchestrator(&ledger);
    let handle = TxHandle::new([3u8; 32]);
    ledger.set_receipt(
        handle,
        Ok(Receipt {
            handle,
            succeeded: false,
            block_number: Some(19_000_000),
        }),
    );

    let result = orchestrator.wait_for_transaction(handle).await;

    assert!(!result.success);
    assert_eq!(
        error_of(&result),
        &VoteError::ExecutionReverted(RevertPhase::Inclusion)
    );
    assert_eq!(result.message, "Transaction was reverted");
    assert_eq!(result.tx_handle, Some(handle));
}

#[tokio::test]
async fn confirmation_transport_error_is_retryable() {
    let ledger = active_ledger();
    let orchestrator = orchestrator(&ledger);
    let handle = TxHandle::new([4u8; 32]);
    ledger.set_receipt(handle, Err(LedgerError::Transport("timed out".into())));

    let result = orchestrator.wait_for_transaction(handle).await;

    assert!(!result.success);
    assert_eq!(result.message, "Failed to confirm transaction");
    assert!(error_of(&result).is_retryable());
    assert_eq!(result.tx_handle, Some(handle));
}

// ---------------------------------------------------------------------------
// Read-only queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_proposal_reports_mapping_and_state() {
    let ledger = active_ledger();
    let orchestrator = orchestrator(&ledger);

    let found = orchestrator.validate_proposal("91").await;
    assert!(found.exists);
    assert_eq!(found.mapped_id, "88");
    assert_eq!(found.state, Some(ProposalState::Active));
    assert!(found.accepts_votes());
    assert_eq!(found.error, None);

    let missing = orchestrator.validate_proposal("2").await;
    assert!(!missing.exists);
    assert_eq!(missing.state, None);
    assert_eq!(missing.error.as_deref(), Some("Proposal does not exist on-chain"));
}

#[tokio::test]
async fn scanner_partitions_ids() {
    let ledger = Arc::new(
        NullLedger::new()
            .with_proposal("2", ProposalState::Active)
            .with_proposal("3", ProposalState::Executed)
            .with_proposal("6", ProposalState::Active),
    );
    let scanner = ProposalScanner::new(ledger.clone());

    let report = scanner.scan(1..=7, 3).await;

    assert_eq!(
        report.found,
        vec![
            (2, ProposalState::Active),
            (3, ProposalState::Executed),
            (6, ProposalState::Active)
        ]
    );
    assert_eq!(report.missing, vec![1, 4, 5, 7]);
    assert!(report.errors.is_empty());
    assert_eq!(report.active_ids(), vec![2, 6]);
    assert_eq!(ledger.state_queries(), 7);
}

#[tokio::test]
async fn scanner_collects_transport_errors() {
    let ledger = Arc::new(NullLedger::new());
    ledger.fail_transport(Some("rate limited"));
    let scanner = ProposalScanner::new(ledger);

    let report = scanner.scan(1..=2, 0).await;

    assert!(report.found.is_empty());
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].1.contains("rate limited"));
}

#[tokio::test]
async fn scanner_stops_at_the_top_of_the_id_space() {
    let top = u64::MAX.to_string();
    let ledger = Arc::new(NullLedger::new().with_proposal(&top, ProposalState::Pending));
    let scanner = ProposalScanner::new(ledger.clone());

    let report = scanner.scan(u64::MAX - 4..=u64::MAX, 2).await;

    assert_eq!(report.found, vec![(u64::MAX, ProposalState::Pending)]);
    assert_eq!(report.missing.len(), 4);
    assert_eq!(ledger.state_queries(), 5);
}
