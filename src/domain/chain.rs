//! Static chain registry
//!
//! Populated once at startup from a literal table, optionally patched with
//! endpoint overrides from the config file, then shared read-only.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::error::{WalletError, WalletResult};

pub const SEPOLIA_CHAIN_ID: &str = "11155111";
pub const MAINNET_CHAIN_ID: &str = "1";

/// BIP-44 coin type for Ether
pub const ETHEREUM_COIN_TYPE: u32 = 60;

/// Metadata for one supported chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: String,
    pub name: String,
    /// Native currency ticker
    pub symbol: String,
    pub rpc_url: Url,
    pub block_explorer_url: Url,
    /// Etherscan-compatible API endpoint
    pub explorer_api_url: Url,
    pub coin_type: u32,
}

impl ChainConfig {
    /// Explorer page for a transaction
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_base(), tx_hash)
    }

    /// Explorer page for an address
    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }

    /// BIP-44 path of the external account at `index`
    pub fn derivation_path(&self, index: u32) -> String {
        format!("m/44'/{}'/0'/0/{}", self.coin_type, index)
    }

    fn explorer_base(&self) -> &str {
        self.block_explorer_url.as_str().trim_end_matches('/')
    }
}

/// Endpoint override for a built-in chain, read from the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainOverride {
    pub id: String,
    pub rpc: Option<String>,
    pub explorer: Option<String>,
    pub explorer_api: Option<String>,
}

/// Chain id -> chain metadata
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: BTreeMap<String, ChainConfig>,
}

impl ChainRegistry {
    /// The fixed table of chains the wallet knows about
    pub fn builtin() -> Self {
        let table = [
            ChainConfig {
                chain_id: SEPOLIA_CHAIN_ID.to_string(),
                name: "Sepolia Testnet".to_string(),
                symbol: "ETH".to_string(),
                rpc_url: literal_url("https://ethereum-sepolia-rpc.publicnode.com"),
                block_explorer_url: literal_url("https://sepolia.etherscan.io/"),
                explorer_api_url: literal_url("https://api-sepolia.etherscan.io/api"),
                coin_type: ETHEREUM_COIN_TYPE,
            },
            ChainConfig {
                chain_id: MAINNET_CHAIN_ID.to_string(),
                name: "Ethereum".to_string(),
                symbol: "ETH".to_string(),
                rpc_url: literal_url("https://ethereum-rpc.publicnode.com"),
                block_explorer_url: literal_url("https://etherscan.io/"),
                explorer_api_url: literal_url("https://api.etherscan.io/api"),
                coin_type: ETHEREUM_COIN_TYPE,
            },
        ];

        let chains = table
            .into_iter()
            .map(|chain| (chain.chain_id.clone(), chain))
            .collect();
        Self { chains }
    }

    /// Apply config-file endpoint overrides. Only chains already in the table
    /// can be overridden.
    pub fn with_overrides(mut self, overrides: &[ChainOverride]) -> Result<Self> {
        for entry in overrides {
            let id = entry.id.trim();
            let chain = self
                .chains
                .get_mut(id)
                .ok_or_else(|| WalletError::UnknownChain(id.to_string()))?;

            if let Some(rpc) = non_empty(entry.rpc.as_deref()) {
                chain.rpc_url = Url::parse(rpc)
                    .with_context(|| format!("Invalid RPC URL for chain {id}: {rpc}"))?;
            }
            if let Some(explorer) = non_empty(entry.explorer.as_deref()) {
                chain.block_explorer_url = Url::parse(explorer)
                    .with_context(|| format!("Invalid explorer URL for chain {id}: {explorer}"))?;
            }
            if let Some(api) = non_empty(entry.explorer_api.as_deref()) {
                chain.explorer_api_url = Url::parse(api)
                    .with_context(|| format!("Invalid explorer API URL for chain {id}: {api}"))?;
            }
        }
        Ok(self)
    }

    pub fn lookup(&self, chain_id: &str) -> WalletResult<&ChainConfig> {
        let id = chain_id.trim();
        self.chains
            .get(id)
            .ok_or_else(|| WalletError::UnknownChain(id.to_string()))
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn literal_url(value: &'static str) -> Url {
    Url::parse(value).expect("built-in chain URL literal is valid")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
