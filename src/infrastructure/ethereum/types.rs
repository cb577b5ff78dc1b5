//! Conversions from Alloy RPC types to wallet types

use alloy::network::ReceiptResponse;

use crate::domain::transaction::ReceiptSummary;

/// Keep the receipt fields the wallet reports
pub fn summarize_receipt<R: ReceiptResponse>(receipt: &R) -> ReceiptSummary {
    ReceiptSummary {
        transaction_hash: receipt.transaction_hash().to_string(),
        status: receipt.status(),
        block_number: receipt.block_number(),
        gas_used: receipt.gas_used(),
        effective_gas_price: receipt.effective_gas_price(),
        from: receipt.from().to_checksum(None),
        to: receipt.to().map(|to| to.to_checksum(None)),
    }
}
