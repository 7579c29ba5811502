//! Remote data gateway for the proposal backend.
//!
//! [`ProposalSource`] is the seam the sync cache consumes; [`HttpProposalSource`]
//! is the production implementation talking to the backend over HTTP.

pub mod error;
pub mod http;
pub mod source;

pub use error::GatewayError;
pub use http::HttpProposalSource;
pub use source::ProposalSource;
