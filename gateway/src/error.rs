use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("backend returned HTTP {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("proposal {0} not found")]
    NotFound(String),

    #[error("client setup failed: {0}")]
    Setup(String),
}
