//! JSON-RPC provider abstraction and its Alloy HTTP implementation

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, U256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, PendingTransactionError, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::{RpcError, TransportErrorKind};
use url::Url;

use crate::domain::chain::ChainConfig;
use crate::domain::transaction::ReceiptSummary;
use crate::infrastructure::ethereum::types::summarize_receipt;

/// A failed RPC interaction, normalized at the provider boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcFailure {
    /// Error message supplied by the node, if it sent one
    pub reason: Option<String>,
    /// Full error text
    pub detail: String,
}

impl RpcFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            reason: None,
            detail: detail.into(),
        }
    }

    /// A failure carrying a node-supplied message
    pub fn rejected(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            detail: format!("server returned an error response: {reason}"),
            reason: Some(reason),
        }
    }

    /// The node's reason when present, the full text otherwise
    pub fn message(&self) -> &str {
        self.reason.as_deref().unwrap_or(&self.detail)
    }

    fn from_rpc(err: &RpcError<TransportErrorKind>) -> Self {
        Self {
            reason: err.as_error_resp().map(|payload| payload.message.to_string()),
            detail: err.to_string(),
        }
    }

    fn from_pending(err: &PendingTransactionError) -> Self {
        match err {
            PendingTransactionError::TransportError(rpc) => Self::from_rpc(rpc),
            other => Self::new(other.to_string()),
        }
    }
}

impl std::fmt::Display for RpcFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Chain operations the wallet needs
///
/// Implemented over HTTP by [`AlloyProvider`]; tests substitute an in-memory
/// ledger.
#[async_trait::async_trait]
pub trait ChainProvider: Send + Sync + 'static {
    /// Balance of `address` in wei at the latest block
    async fn get_balance(&self, address: Address) -> Result<U256, RpcFailure>;

    /// Sign `request` with `signer`, submit it and wait for its receipt.
    /// Nonce, fees and chain id are filled in by the provider.
    async fn send_transfer(
        &self,
        signer: PrivateKeySigner,
        request: TransactionRequest,
    ) -> Result<ReceiptSummary, RpcFailure>;

    /// Endpoint display name
    fn endpoint_name(&self) -> String;
}

// Read-only provider with the recommended fillers
type HttpFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// HTTP JSON-RPC provider for one chain
pub struct AlloyProvider {
    provider: HttpFillProvider,
    rpc_url: Url,
}

impl AlloyProvider {
    pub fn new(rpc_url: Url) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url.clone());
        Self { provider, rpc_url }
    }

    pub fn for_chain(chain: &ChainConfig) -> Self {
        Self::new(chain.rpc_url.clone())
    }
}

#[async_trait::async_trait]
impl ChainProvider for AlloyProvider {
    async fn get_balance(&self, address: Address) -> Result<U256, RpcFailure> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| RpcFailure::from_rpc(&e))
    }

    async fn send_transfer(
        &self,
        signer: PrivateKeySigner,
        request: TransactionRequest,
    ) -> Result<ReceiptSummary, RpcFailure> {
        // Signing provider is built per transfer: the key only lives as long
        // as the request.
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.rpc_url.clone());

        let pending = provider
            .send_transaction(request)
            .await
            .map_err(|e| RpcFailure::from_rpc(&e))?;
        tracing::info!(tx_hash = %pending.tx_hash(), "Transaction submitted");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RpcFailure::from_pending(&e))?;
        Ok(summarize_receipt(&receipt))
    }

    fn endpoint_name(&self) -> String {
        self.rpc_url.to_string()
    }
}
