//! Typed bindings for the governance contract entry points the dashboard uses.

use ethers::contract::abigen;

/// Governor Bravo deployment the dashboard targets by default.
pub const DEFAULT_GOVERNOR_ADDRESS: &str = "0x408ED6354d4973f66138C91495F2f2FCbd8724C3";

abigen!(
    GovernorBravo,
    r#"[
        function castVote(uint256 proposalId, uint8 support) external
        function castVoteWithReason(uint256 proposalId, uint8 support, string reason) external
        function hasVoted(uint256 proposalId, address account) external view returns (bool)
        function state(uint256 proposalId) external view returns (uint8)
    ]"#
);
