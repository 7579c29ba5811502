//! HTTP client for the proposal backend.

use std::time::Duration;

use agora_types::Proposal;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{GatewayError, ProposalSource};

/// Default backend location.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// HTTP client for the proposal backend.
///
/// Wraps `reqwest::Client` with the backend's base URL and provides typed
/// methods for each endpoint the dashboard needs.
#[derive(Clone)]
pub struct HttpProposalSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProposalSource {
    /// Create a client targeting `base_url` (e.g. `http://localhost:5000`).
    ///
    /// `timeout` bounds whole requests; proposal listings can be slow because
    /// the backend may pull from its indexer on a cold cache.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Setup(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The configured backend URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProposalSource for HttpProposalSource {
    async fn is_reachable(&self) -> bool {
        match self.http.get(self.endpoint("/health")).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!(status = %response.status(), "backend health check rejected");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "backend health check failed");
                false
            }
        }
    }

    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, GatewayError> {
        let proposals: Vec<Proposal> = self.get_json("/api/proposals").await?;
        tracing::debug!(count = proposals.len(), "fetched proposals from backend");
        Ok(proposals)
    }

    async fn fetch_proposal(&self, id: &str) -> Result<Proposal, GatewayError> {
        match self.get_json(&format!("/api/proposals/{id}")).await {
            Err(GatewayError::Status(404)) => Err(GatewayError::NotFound(id.to_string())),
            other => other,
        }
    }
}
