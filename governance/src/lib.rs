//! Vote transaction orchestration for on-chain governance.
//!
//! The pipeline for a single vote:
//! Idle → Validating → EstimatingCost → Submitting → Submitted → Confirming → {Confirmed, Failed}
//!
//! Every stage is a variant of [`VoteStage`]; [`VoteOrchestrator::advance`] performs the
//! I/O for one stage and returns the next. Ledger identifiers are resolved through the
//! [`IdentifierMapper`] before any ledger call.
//!
//! Key principle: fail fast and explicitly. Every failure is reported as one of the
//! [`VoteError`] kinds, never as a raw transport error.

pub mod error;
pub mod ledger;
pub mod mapping;
pub mod orchestrator;
pub mod scanner;
pub mod vote;

pub use error::{InactiveReason, RevertPhase, VoteError};
pub use ledger::{CallVariant, LedgerError, LedgerGateway, Receipt, VoteCall, VoteSession};
pub use mapping::IdentifierMapper;
pub use orchestrator::{ProposalValidation, VoteOrchestrator, COST_MARGIN_PERCENT};
pub use scanner::{ProposalScanner, ScanReport};
pub use vote::{TxStatus, VoteIntent, VoteResult, VoteStage, VoteTransaction};
