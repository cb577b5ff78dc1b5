//! Balance query

use alloy::primitives::Address;

use crate::domain::units::{format_balance, DISPLAY_DECIMALS};
use crate::error::WalletError;
use crate::infrastructure::ethereum::ChainProvider;

/// Shown in place of a balance when the query failed
pub const BALANCE_UNAVAILABLE: &str = "Error fetching balance";

/// Shown while a balance query is in flight
pub const BALANCE_LOADING: &str = "Loading...";

/// Balance of `address` in ether with two decimals.
///
/// Never fails: any error is logged and turned into [`BALANCE_UNAVAILABLE`].
pub async fn get_balance(provider: &dyn ChainProvider, address: &str) -> String {
    match try_get_balance(provider, address).await {
        Ok(balance) => balance,
        Err(e) => {
            tracing::warn!(address, error = %e, "Balance query failed");
            BALANCE_UNAVAILABLE.to_string()
        }
    }
}

async fn try_get_balance(provider: &dyn ChainProvider, address: &str) -> Result<String, WalletError> {
    let address: Address = address
        .trim()
        .parse()
        .map_err(|e| WalletError::BalanceUnavailable(format!("invalid address {address}: {e}")))?;

    let wei = provider
        .get_balance(address)
        .await
        .map_err(|e| WalletError::BalanceUnavailable(e.detail))?;

    Ok(format_balance(wei, DISPLAY_DECIMALS))
}
