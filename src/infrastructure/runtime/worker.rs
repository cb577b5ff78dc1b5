//! Async worker - runs in Tokio runtime and serves wallet commands

use std::sync::mpsc::Sender;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};
use crate::wallet::WalletBackend;

/// Run the async worker loop until `Shutdown` or until every sender is gone.
///
/// Each command runs as its own task, so a transfer waiting for its receipt
/// never holds up balance or history fetches.
pub async fn run_async_worker(
    backend: WalletBackend,
    mut cmd_rx: UnboundedReceiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let backend = Arc::new(backend);
    tracing::debug!(chain_id = %backend.chain().chain_id, "Worker started");

    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, RuntimeCommand::Shutdown) {
            break;
        }
        tokio::spawn(handle_command(Arc::clone(&backend), cmd, evt_tx.clone()));
    }

    tracing::debug!("Worker shutting down");
    Ok(())
}

async fn handle_command(backend: Arc<WalletBackend>, cmd: RuntimeCommand, evt_tx: Sender<RuntimeEvent>) {
    let event = match cmd {
        RuntimeCommand::FetchBalance { address } => {
            tracing::debug!(address = %address, "Fetching balance");
            let balance = backend.balance(&address).await;
            RuntimeEvent::BalanceReady { address, balance }
        }
        RuntimeCommand::FetchHistory { address } => {
            tracing::debug!(address = %address, "Fetching history");
            let records = backend.recent_transactions(&address).await;
            RuntimeEvent::HistoryReady { address, records }
        }
        RuntimeCommand::Transfer { id, request } => {
            tracing::debug!(id, from = %request.from, to = %request.to, "Running transfer");
            let result = backend.transfer(&request).await;
            RuntimeEvent::TransferFinished { id, result }
        }
        RuntimeCommand::Shutdown => return,
    };

    // The TUI may already be gone
    let _ = evt_tx.send(event);
}
