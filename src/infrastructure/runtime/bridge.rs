//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI thread never awaits. It sends [`RuntimeCommand`]s over an
//! unbounded Tokio channel to a worker thread that owns a Tokio runtime, and
//! drains [`RuntimeEvent`]s on every tick.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::Context;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::domain::transaction::{TransactionRecord, TransferRequest, TransferResult};
use crate::error::WalletError;
use crate::infrastructure::runtime::worker::run_async_worker;
use crate::wallet::WalletBackend;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Fetch the display balance of an address
    FetchBalance { address: String },
    /// Fetch the recent transaction list of an address
    FetchHistory { address: String },
    /// Sign, submit and confirm a transfer; `id` comes back with the result
    Transfer { id: u64, request: TransferRequest },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Balance ready (possibly the unavailable sentinel)
    BalanceReady { address: String, balance: String },
    /// History ready (empty on failure)
    HistoryReady {
        address: String,
        records: Vec<TransactionRecord>,
    },
    /// Transfer reached a receipt or failed
    TransferFinished {
        id: u64,
        result: Result<TransferResult, WalletError>,
    },
    /// Error occurred
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: UnboundedSender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Start the worker thread serving `backend`
    pub fn new(backend: WalletBackend) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = unbounded_channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to create Tokio runtime")?;

        thread::Builder::new()
            .name("pocket-worker".to_string())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(backend, cmd_rx, evt_tx.clone()).await {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })
            .context("Failed to spawn worker thread")?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
