use thiserror::Error;

/// Errors raised while setting up a ledger connection or signing session.
#[derive(Debug, Error)]
pub enum EvmError {
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("invalid governor address: {0}")]
    InvalidGovernor(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}
