//! Governor Bravo adapter: implements the governance ledger seams over an
//! Ethereum JSON-RPC endpoint.
//!
//! - [`EvmLedger`] answers read-only queries and waits for receipts.
//! - [`EvmSession`] signs and broadcasts votes with a local key.

mod classify;
mod contract;
pub mod error;
pub mod ledger;
pub mod session;

pub use contract::DEFAULT_GOVERNOR_ADDRESS;
pub use error::EvmError;
pub use ledger::EvmLedger;
pub use session::EvmSession;
