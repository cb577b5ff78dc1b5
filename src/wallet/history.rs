//! Transaction history query

use crate::domain::transaction::TransactionRecord;
use crate::error::WalletError;
use crate::infrastructure::explorer::{ExplorerApi, HISTORY_PAGE_SIZE};

/// Up to ten most recent transactions of `address`, newest first.
///
/// Never fails: network and decoding errors are logged and give an empty list.
pub async fn list_recent_transactions(
    explorer: &dyn ExplorerApi,
    address: &str,
) -> Vec<TransactionRecord> {
    match explorer.fetch_transactions(address).await {
        Ok(mut records) => {
            records.truncate(HISTORY_PAGE_SIZE);
            records
        }
        Err(e) => {
            let err = WalletError::HistoryUnavailable(format!("{e:#}"));
            tracing::warn!(address, error = %err, "History query failed");
            Vec::new()
        }
    }
}
