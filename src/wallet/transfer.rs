//! Transfer execution

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;

use crate::domain::account::signer_from_private_key;
use crate::domain::transaction::{TransferRequest, TransferResult, TRANSFER_GAS_LIMIT};
use crate::domain::units::amount_to_wei;
use crate::error::{WalletError, WalletResult};
use crate::infrastructure::ethereum::ChainProvider;

/// Sign, submit and confirm a value transfer.
///
/// A mined receipt always gives `Ok`, with the receipt status deciding
/// success or failure. Errors before inclusion map to
/// [`WalletError::Transfer`] carrying the node's message when it sent one.
/// There is no retry: resubmitting after an ambiguous failure may send twice.
pub async fn transfer(
    provider: &dyn ChainProvider,
    request: &TransferRequest,
) -> WalletResult<TransferResult> {
    let value = amount_to_wei(request.amount).map_err(WalletError::transfer)?;

    let to: Address = request
        .to
        .trim()
        .parse()
        .map_err(|e| WalletError::transfer(format!("invalid recipient address: {e}")))?;

    let signer = signer_from_private_key(&request.private_key)
        .map_err(|e| WalletError::transfer(e.to_string()))?;
    let from = signer.address();

    if !request.from.trim().is_empty() {
        let claimed: Address = request
            .from
            .trim()
            .parse()
            .map_err(|e| WalletError::transfer(format!("invalid sender address: {e}")))?;
        if claimed != from {
            return Err(WalletError::transfer(
                "sender address does not match the signing key",
            ));
        }
    }

    let tx = TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(value)
        .with_gas_limit(TRANSFER_GAS_LIMIT);

    tracing::info!(
        from = %from,
        to = %to,
        amount = request.amount,
        endpoint = %provider.endpoint_name(),
        "Submitting transfer"
    );

    let receipt = provider.send_transfer(signer, tx).await.map_err(|e| {
        tracing::error!(from = %from, to = %to, error = %e, "Transfer failed");
        WalletError::transfer(e.message())
    })?;

    let result = TransferResult::from_receipt(receipt);
    if result.is_success() {
        tracing::info!(tx_hash = %result.transaction_hash, "Transfer confirmed");
    } else {
        tracing::warn!(tx_hash = %result.transaction_hash, "Transfer reverted");
    }
    Ok(result)
}
