//! Wallet error taxonomy
//!
//! Every failure a wallet operation can report is one of these variants.
//! Errors coming out of alloy, reqwest or serde are normalized into this
//! enum at the seam where they occur.

use thiserror::Error;

/// Errors surfaced by wallet operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Chain id is not present in the registry
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    /// Input is neither a valid mnemonic nor a valid private key
    #[error("invalid seed phrase or private key: {0}")]
    InvalidSeed(String),

    /// Building, signing, submitting or confirming a transfer failed
    #[error("{reason}")]
    Transfer { reason: String },

    /// Balance could not be read
    #[error("balance unavailable: {0}")]
    BalanceUnavailable(String),

    /// Transaction history could not be fetched
    #[error("history unavailable: {0}")]
    HistoryUnavailable(String),
}

impl WalletError {
    pub fn transfer(reason: impl Into<String>) -> Self {
        WalletError::Transfer {
            reason: reason.into(),
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
