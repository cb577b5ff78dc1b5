//! Etherscan-compatible `txlist` client

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::domain::chain::ChainConfig;
use crate::domain::transaction::TransactionRecord;

/// Entries requested per history query
pub const HISTORY_PAGE_SIZE: usize = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of an address's recent transactions
#[async_trait::async_trait]
pub trait ExplorerApi: Send + Sync + 'static {
    /// Most recent transactions touching `address`, newest first
    async fn fetch_transactions(&self, address: &str) -> Result<Vec<TransactionRecord>>;
}

/// `module=account&action=txlist` response envelope
#[derive(Debug, Deserialize)]
struct TxListResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    /// Array of transactions, or a plain string on errors and empty results
    #[serde(default)]
    result: serde_json::Value,
}

/// Explorer API client for one chain
pub struct EtherscanClient {
    http: reqwest::Client,
    api_url: Url,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(api_url: Url, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            api_url,
            api_key: api_key.into(),
        })
    }

    pub fn for_chain(chain: &ChainConfig, api_key: impl Into<String>) -> Result<Self> {
        Self::new(chain.explorer_api_url.clone(), api_key)
    }

    fn txlist_url(&self, address: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("module", "account")
            .append_pair("action", "txlist")
            .append_pair("address", address)
            .append_pair("page", "1")
            .append_pair("offset", &HISTORY_PAGE_SIZE.to_string())
            .append_pair("sort", "desc")
            .append_pair("apikey", &self.api_key);
        url
    }
}

#[async_trait::async_trait]
impl ExplorerApi for EtherscanClient {
    async fn fetch_transactions(&self, address: &str) -> Result<Vec<TransactionRecord>> {
        let url = self.txlist_url(address);
        tracing::debug!(host = ?url.host_str(), address, "Requesting transaction list");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to query explorer API")?
            .error_for_status()
            .context("Explorer API returned an error status")?;

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse explorer response")?;

        parse_txlist(body)
    }
}

/// Interpret a `txlist` response body.
///
/// A non-array `result` ("No transactions found", rate limit notices) is an
/// empty history. Rows that don't match the expected shape are skipped.
pub fn parse_txlist(body: serde_json::Value) -> Result<Vec<TransactionRecord>> {
    let response: TxListResponse =
        serde_json::from_value(body).context("Unexpected explorer response shape")?;

    let rows = match response.result {
        serde_json::Value::Array(rows) => rows,
        other => {
            tracing::debug!(
                status = %response.status,
                message = %response.message,
                result = %other,
                "Explorer returned no transaction list"
            );
            return Ok(Vec::new());
        }
    };

    let records = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<TransactionRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed transaction row");
                None
            }
        })
        .take(HISTORY_PAGE_SIZE)
        .collect();

    Ok(records)
}
