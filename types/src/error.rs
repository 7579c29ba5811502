//! Parse errors for the primitive types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("unknown proposal state: {0}")]
    UnknownState(String),

    #[error("proposal state index out of range: {0}")]
    StateIndex(u8),

    #[error("unknown vote support: {0} (expected for, against or abstain)")]
    UnknownSupport(String),

    #[error("invalid voter address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction handle: {0}")]
    InvalidHandle(String),

    #[error("invalid vote count: {0}")]
    InvalidCount(String),
}
