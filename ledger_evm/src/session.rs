//! Signing session backed by a local private key.

use std::sync::Arc;

use agora_governance::{LedgerError, VoteCall, VoteSession};
use agora_types::{TxHandle, VoterAddress};
use async_trait::async_trait;
use ethers::contract::ContractCall;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::U256;
use ethers::utils::to_checksum;

use crate::classify::{classify_write, parse_proposal_id};
use crate::contract::GovernorBravo;
use crate::{EvmError, EvmLedger};

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// A [`VoteSession`] that signs locally and broadcasts through the ledger's
/// RPC endpoint.
pub struct EvmSession {
    address: VoterAddress,
    contract: GovernorBravo<SignerClient>,
}

impl EvmSession {
    /// Load `private_key` (hex, optional `0x`) and bind it to the ledger's chain.
    pub async fn connect(ledger: &EvmLedger, private_key: &str) -> Result<Self, EvmError> {
        let chain_id = ledger
            .provider()
            .get_chainid()
            .await
            .map_err(|e| EvmError::Rpc(format!("failed to get chain ID: {e}")))?
            .as_u64();
        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| EvmError::InvalidKey(e.to_string()))?
            .with_chain_id(chain_id);
        let address: VoterAddress = to_checksum(&wallet.address(), None)
            .parse()
            .map_err(|e| EvmError::InvalidKey(format!("derived address: {e}")))?;

        let client = SignerMiddleware::new(ledger.provider().clone(), wallet);
        let contract = GovernorBravo::new(ledger.governor(), Arc::new(client));
        tracing::info!(voter = %address.short(), chain_id, "signing session ready");
        Ok(Self { address, contract })
    }

    fn contract_call(&self, call: &VoteCall) -> Result<ContractCall<SignerClient, ()>, LedgerError> {
        let id = parse_proposal_id(&call.proposal_id)?;
        let support = call.support.as_u8();
        Ok(match &call.reason {
            Some(reason) => self.contract.cast_vote_with_reason(id, support, reason.clone()),
            None => self.contract.cast_vote(id, support),
        })
    }
}

#[async_trait]
impl VoteSession for EvmSession {
    fn address(&self) -> &VoterAddress {
        &self.address
    }

    async fn estimate_cost(&self, call: &VoteCall) -> Result<u64, LedgerError> {
        let gas = self
            .contract_call(call)?
            .estimate_gas()
            .await
            .map_err(classify_write)?;
        if gas > U256::from(u64::MAX) {
            return Err(LedgerError::Transport(format!("gas estimate out of range: {gas}")));
        }
        Ok(gas.as_u64())
    }

    async fn submit(&self, call: &VoteCall, cost_limit: u64) -> Result<TxHandle, LedgerError> {
        let tx = self.contract_call(call)?.gas(cost_limit);
        let pending = tx.send().await.map_err(classify_write)?;
        Ok(TxHandle::new(pending.tx_hash().0))
    }
}
