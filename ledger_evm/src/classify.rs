//! Mapping of raw JSON-RPC / contract failures onto [`LedgerError`].

use agora_governance::LedgerError;
use ethers::contract::ContractError;
use ethers::providers::Middleware;
use ethers::types::U256;

/// Ledger ids are decimal integers; anything else cannot exist on-chain.
pub(crate) fn parse_proposal_id(id: &str) -> Result<U256, LedgerError> {
    let digits = id.trim();
    if digits.is_empty() {
        return Err(LedgerError::UnknownProposal);
    }
    U256::from_dec_str(digits).map_err(|_| LedgerError::UnknownProposal)
}

/// Failures of view calls. An undecodable answer or a revert means the
/// contract has no such proposal.
pub(crate) fn classify_read<M: Middleware>(err: ContractError<M>) -> LedgerError {
    match err {
        ContractError::DecodingError(_)
        | ContractError::AbiError(_)
        | ContractError::DetokenizationError(_)
        | ContractError::Revert(_) => LedgerError::UnknownProposal,
        other => classify_message(&other.to_string()),
    }
}

/// Failures of state-changing calls (estimation and submission).
pub(crate) fn classify_write<M: Middleware>(err: ContractError<M>) -> LedgerError {
    match err {
        ContractError::Revert(data) => LedgerError::Reverted(format!("0x{}", hex::encode(data))),
        other => classify_message(&other.to_string()),
    }
}

/// Classify by the node's error text; providers only report these as strings.
pub(crate) fn classify_message(message: &str) -> LedgerError {
    let lower = message.to_ascii_lowercase();
    let rejected_code = lower.contains("code") && lower.contains("4001");
    if rejected_code || lower.contains("user rejected") || lower.contains("user denied") {
        LedgerError::UserRejected
    } else if lower.contains("insufficient funds") {
        LedgerError::InsufficientFunds
    } else if lower.contains("reverted") {
        LedgerError::Reverted(message.to_string())
    } else {
        LedgerError::Transport(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_ids_parse() {
        assert_eq!(parse_proposal_id("88").unwrap(), U256::from(88u64));
        assert_eq!(parse_proposal_id(" 10 ").unwrap(), U256::from(10u64));
    }

    #[test]
    fn non_numeric_id_does_not_exist() {
        assert_eq!(parse_proposal_id("abc"), Err(LedgerError::UnknownProposal));
        assert_eq!(parse_proposal_id(""), Err(LedgerError::UnknownProposal));
        assert_eq!(parse_proposal_id("   "), Err(LedgerError::UnknownProposal));
    }

    #[test]
    fn node_messages_are_classified() {
        assert_eq!(
            classify_message("MetaMask Tx Signature: User denied transaction signature."),
            LedgerError::UserRejected
        );
        assert_eq!(
            classify_message("(code: 4001, message: request rejected)"),
            LedgerError::UserRejected
        );
        assert_eq!(
            classify_message("(code: -32000, message: insufficient funds for gas * price + value)"),
            LedgerError::InsufficientFunds
        );
        assert!(matches!(
            classify_message("execution reverted: GovernorBravo::castVoteInternal: voter already voted"),
            LedgerError::Reverted(msg) if msg.contains("already voted")
        ));
        assert!(matches!(
            classify_message("error sending request for url (http://localhost:8545/)"),
            LedgerError::Transport(_)
        ));
    }
}
