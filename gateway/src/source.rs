//! The proposal source trait.

use agora_types::Proposal;
use async_trait::async_trait;

use crate::GatewayError;

/// Remote supplier of proposal records.
#[async_trait]
pub trait ProposalSource: Send + Sync {
    /// Cheap connectivity check. Every failure reads as "unreachable".
    async fn is_reachable(&self) -> bool;

    /// The full proposal set.
    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, GatewayError>;

    /// A single proposal by backend id.
    async fn fetch_proposal(&self, id: &str) -> Result<Proposal, GatewayError>;
}
