//! Read-only access to the governor contract.

use std::sync::Arc;

use agora_governance::{LedgerError, LedgerGateway, Receipt};
use agora_types::{ProposalState, TxHandle, VoterAddress};
use async_trait::async_trait;
use ethers::providers::{Http, PendingTransaction, Provider};
use ethers::types::{Address, H256, U64};

use crate::classify::{classify_message, classify_read, parse_proposal_id};
use crate::contract::GovernorBravo;
use crate::EvmError;

/// JSON-RPC backed [`LedgerGateway`].
#[derive(Clone)]
pub struct EvmLedger {
    provider: Provider<Http>,
    governor: Address,
    contract: GovernorBravo<Provider<Http>>,
}

impl EvmLedger {
    /// Connect to `rpc_url` and bind the governor at `governor`.
    ///
    /// No request is made until the first query.
    pub fn connect(rpc_url: &str, governor: &str) -> Result<Self, EvmError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| EvmError::InvalidRpcUrl(e.to_string()))?;
        let governor = governor
            .trim()
            .parse::<Address>()
            .map_err(|e| EvmError::InvalidGovernor(e.to_string()))?;
        let contract = GovernorBravo::new(governor, Arc::new(provider.clone()));
        tracing::debug!(rpc_url, governor = ?governor, "governor ledger bound");
        Ok(Self {
            provider,
            governor,
            contract,
        })
    }

    pub fn provider(&self) -> &Provider<Http> {
        &self.provider
    }

    pub fn governor(&self) -> Address {
        self.governor
    }
}

#[async_trait]
impl LedgerGateway for EvmLedger {
    async fn state(&self, proposal_id: &str) -> Result<ProposalState, LedgerError> {
        let id = parse_proposal_id(proposal_id)?;
        let raw = self
            .contract
            .state(id)
            .call()
            .await
            .map_err(classify_read)?;
        ProposalState::from_index(raw).map_err(|_| LedgerError::UnknownProposal)
    }

    async fn has_voted(&self, proposal_id: &str, voter: &VoterAddress) -> Result<bool, LedgerError> {
        let id = parse_proposal_id(proposal_id)?;
        let account = voter
            .as_str()
            .parse::<Address>()
            .map_err(|e| LedgerError::Transport(format!("voter address: {e}")))?;
        self.contract
            .has_voted(id, account)
            .call()
            .await
            .map_err(classify_read)
    }

    async fn wait_for_receipt(&self, handle: &TxHandle) -> Result<Receipt, LedgerError> {
        let hash = H256::from(*handle.as_bytes());
        let receipt = PendingTransaction::new(hash, &self.provider)
            .await
            .map_err(|e| classify_message(&e.to_string()))?
            .ok_or_else(|| LedgerError::Transport("transaction dropped from mempool".into()))?;
        Ok(Receipt {
            handle: *handle,
            succeeded: receipt.status == Some(U64::from(1)),
            block_number: receipt.block_number.map(|n| n.as_u64()),
        })
    }
}
