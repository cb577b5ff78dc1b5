//! Wallet operations bound to one chain
//!
//! Balance, transfer and history queries, plus [`WalletBackend`] which holds
//! the chain metadata and the two network seams they run against.

mod balance;
mod history;
mod transfer;

use std::sync::Arc;

use anyhow::Result;

use crate::domain::chain::ChainConfig;
use crate::domain::transaction::{TransactionRecord, TransferRequest, TransferResult};
use crate::error::WalletResult;
use crate::infrastructure::ethereum::{AlloyProvider, ChainProvider};
use crate::infrastructure::explorer::{EtherscanClient, ExplorerApi};

pub use balance::{get_balance, BALANCE_LOADING, BALANCE_UNAVAILABLE};
pub use history::list_recent_transactions;
pub use transfer::transfer;

/// Everything the background worker needs to serve one chain
#[derive(Clone)]
pub struct WalletBackend {
    chain: ChainConfig,
    provider: Arc<dyn ChainProvider>,
    explorer: Arc<dyn ExplorerApi>,
}

impl WalletBackend {
    pub fn new(
        chain: ChainConfig,
        provider: Arc<dyn ChainProvider>,
        explorer: Arc<dyn ExplorerApi>,
    ) -> Self {
        Self {
            chain,
            provider,
            explorer,
        }
    }

    /// Backend talking to the chain's RPC endpoint and explorer API
    pub fn connect(chain: &ChainConfig, explorer_api_key: &str) -> Result<Self> {
        let provider = AlloyProvider::for_chain(chain);
        let explorer = EtherscanClient::for_chain(chain, explorer_api_key)?;
        tracing::info!(
            chain_id = %chain.chain_id,
            rpc = %provider.endpoint_name(),
            "Wallet backend ready"
        );
        Ok(Self::new(chain.clone(), Arc::new(provider), Arc::new(explorer)))
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn endpoint_name(&self) -> String {
        self.provider.endpoint_name()
    }

    pub async fn balance(&self, address: &str) -> String {
        get_balance(self.provider.as_ref(), address).await
    }

    pub async fn transfer(&self, request: &TransferRequest) -> WalletResult<TransferResult> {
        transfer(self.provider.as_ref(), request).await
    }

    pub async fn recent_transactions(&self, address: &str) -> Vec<TransactionRecord> {
        list_recent_transactions(self.explorer.as_ref(), address).await
    }
}
