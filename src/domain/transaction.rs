//! Transfer and history value types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed gas limit for a plain value transfer
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// One value transfer, built per submit action
#[derive(Clone, PartialEq)]
pub struct TransferRequest {
    /// Amount in ether
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub private_key: String,
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRequest")
            .field("amount", &self.amount)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    Success,
    Failure,
}

/// The parts of a transaction receipt the wallet cares about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub transaction_hash: String,
    pub status: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub from: String,
    pub to: Option<String>,
}

/// Outcome of a submitted transfer that reached a receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub transaction_hash: String,
    pub status: ConfirmationStatus,
    pub receipt: ReceiptSummary,
}

impl TransferResult {
    pub fn from_receipt(receipt: ReceiptSummary) -> Self {
        let status = if receipt.status {
            ConfirmationStatus::Success
        } else {
            ConfirmationStatus::Failure
        };
        Self {
            transaction_hash: receipt.transaction_hash.clone(),
            status,
            receipt,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ConfirmationStatus::Success
    }

    /// Receipt rendered as JSON, shown when the transfer failed on-chain
    pub fn diagnostic(&self) -> String {
        serde_json::to_string(&self.receipt)
            .unwrap_or_else(|_| format!("{:?}", self.receipt))
    }
}

/// One row of the transaction history, as returned by the explorer API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(rename = "isError", deserialize_with = "flag_from_str")]
    pub is_error: bool,
    #[serde(rename = "timeStamp", deserialize_with = "u64_from_str")]
    pub timestamp: u64,
}

impl TransactionRecord {
    pub fn status_glyph(&self) -> &'static str {
        if self.is_error {
            "❌"
        } else {
            "✅"
        }
    }

    /// Timestamp as "YYYY-MM-DD HH:MM:SS" UTC, or the raw seconds if out of range
    pub fn timestamp_display(&self) -> String {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}

/// First 5 and last 3 characters joined by "...", as the history table shows them
pub fn truncate_middle(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return value.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", head, tail)
}

fn flag_from_str<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim() != "0")
}

fn u64_from_str<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}
