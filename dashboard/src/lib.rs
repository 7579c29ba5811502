//! Governance dashboard core.
//!
//! [`Dashboard`] is the context object a front end holds: it owns the proposal
//! cache, the vote orchestrator and the local record of votes already sent.
//! [`DashboardConfig`] is loaded from TOML and builds the production wiring.

pub mod config;
pub mod dashboard;
pub mod error;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::DashboardError;
