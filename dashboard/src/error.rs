use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] agora_store_lmdb::LmdbError),

    #[error("backend error: {0}")]
    Gateway(#[from] agora_gateway::GatewayError),

    #[error("ledger error: {0}")]
    Ledger(#[from] agora_ledger_evm::EvmError),

    #[error("no signing backend configured")]
    NoSigner,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
