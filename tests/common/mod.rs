//! Shared test doubles: an in-memory ledger and a mock explorer API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use url::Url;

use pocket::domain::chain::{ChainConfig, ChainRegistry, SEPOLIA_CHAIN_ID};
use pocket::domain::transaction::{ReceiptSummary, TransactionRecord, TRANSFER_GAS_LIMIT};
use pocket::domain::units::parse_ether;
use pocket::infrastructure::ethereum::{ChainProvider, RpcFailure};
use pocket::infrastructure::explorer::ExplorerApi;

pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// 1 gwei
pub const GAS_PRICE: u128 = 1_000_000_000;

pub fn sepolia() -> ChainConfig {
    ChainRegistry::builtin()
        .lookup(SEPOLIA_CHAIN_ID)
        .unwrap()
        .clone()
}

pub fn ether(value: &str) -> U256 {
    parse_ether(value).unwrap()
}

pub fn address(value: &str) -> Address {
    value.parse().unwrap()
}

/// In-memory chain: balances, a fixed gas price and a receipt per transfer
pub struct MockLedger {
    balances: Mutex<HashMap<Address, U256>>,
    next_tx: AtomicU64,
    balance_calls: AtomicUsize,
    transfer_calls: AtomicUsize,
    reject_balance: AtomicBool,
    revert_transfers: AtomicBool,
    transfer_delay: Mutex<Duration>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            next_tx: AtomicU64::new(1),
            balance_calls: AtomicUsize::new(0),
            transfer_calls: AtomicUsize::new(0),
            reject_balance: AtomicBool::new(false),
            revert_transfers: AtomicBool::new(false),
            transfer_delay: Mutex::new(Duration::ZERO),
        }
    }
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fund(&self, owner: &str, amount: U256) {
        self.balances.lock().unwrap().insert(address(owner), amount);
    }

    pub fn balance_of(&self, owner: &str) -> U256 {
        self.balances
            .lock()
            .unwrap()
            .get(&address(owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn transfer_calls(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    pub fn reject_balance_queries(&self) {
        self.reject_balance.store(true, Ordering::SeqCst);
    }

    pub fn revert_transfers(&self) {
        self.revert_transfers.store(true, Ordering::SeqCst);
    }

    pub fn delay_transfers(&self, delay: Duration) {
        *self.transfer_delay.lock().unwrap() = delay;
    }

    pub fn fee() -> U256 {
        U256::from(TRANSFER_GAS_LIMIT) * U256::from(GAS_PRICE)
    }
}

#[async_trait::async_trait]
impl ChainProvider for MockLedger {
    async fn get_balance(&self, owner: Address) -> Result<U256, RpcFailure> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_balance.load(Ordering::SeqCst) {
            return Err(RpcFailure::rejected("header not found"));
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&owner)
            .copied()
            .unwrap_or_default())
    }

    async fn send_transfer(
        &self,
        signer: PrivateKeySigner,
        request: TransactionRequest,
    ) -> Result<ReceiptSummary, RpcFailure> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.transfer_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let from = signer.address();
        let to = request
            .to
            .and_then(|kind| kind.to().copied())
            .ok_or_else(|| RpcFailure::new("missing recipient"))?;
        let value = request.value.unwrap_or_default();
        let gas = request.gas.unwrap_or(TRANSFER_GAS_LIMIT);
        let fee = U256::from(gas) * U256::from(GAS_PRICE);
        let reverted = self.revert_transfers.load(Ordering::SeqCst);

        let mut balances = self.balances.lock().unwrap();
        let available = balances.get(&from).copied().unwrap_or_default();
        let needed = if reverted { fee } else { value + fee };
        if available < needed {
            return Err(RpcFailure::rejected("insufficient funds for gas * price + value"));
        }

        balances.insert(from, available - needed);
        if !reverted {
            *balances.entry(to).or_default() += value;
        }

        let nonce = self.next_tx.fetch_add(1, Ordering::SeqCst);
        Ok(ReceiptSummary {
            transaction_hash: format!("0x{:064x}", nonce),
            status: !reverted,
            block_number: Some(nonce),
            gas_used: gas,
            effective_gas_price: GAS_PRICE,
            from: from.to_checksum(None),
            to: Some(to.to_checksum(None)),
        })
    }

    fn endpoint_name(&self) -> String {
        "mock://ledger".to_string()
    }
}

/// Explorer double returning a fixed list
pub struct StaticExplorer {
    pub records: Vec<TransactionRecord>,
    pub calls: AtomicUsize,
}

impl StaticExplorer {
    pub fn new(records: Vec<TransactionRecord>) -> Arc<Self> {
        Arc::new(Self {
            records,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl ExplorerApi for StaticExplorer {
    async fn fetch_transactions(&self, _address: &str) -> anyhow::Result<Vec<TransactionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }
}

pub fn record(hash: &str, is_error: bool) -> TransactionRecord {
    TransactionRecord {
        hash: hash.to_string(),
        from: TEST_ADDRESS.to_string(),
        to: RECIPIENT.to_string(),
        is_error,
        timestamp: 1_700_000_000,
    }
}

pub fn txlist_row(hash: &str, is_error: &str) -> serde_json::Value {
    serde_json::json!({
        "blockNumber": "6000000",
        "timeStamp": "1700000000",
        "hash": hash,
        "nonce": "0",
        "from": TEST_ADDRESS.to_lowercase(),
        "to": RECIPIENT.to_lowercase(),
        "value": "1500000000000000000",
        "gas": "21000",
        "gasPrice": "1000000000",
        "isError": is_error,
        "txreceipt_status": if is_error == "0" { "1" } else { "0" },
        "gasUsed": "21000"
    })
}

#[derive(Clone)]
struct ExplorerState {
    status: StatusCode,
    body: Arc<String>,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn txlist(
    State(state): State<ExplorerState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    state.seen.lock().unwrap().push(params);
    (state.status, state.body.as_ref().clone())
}

/// A running mock explorer API
pub struct MockExplorer {
    pub url: Url,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockExplorer {
    /// Serve `body` with `status` at `/api`
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = ExplorerState {
            status,
            body: Arc::new(body.into()),
            seen: Arc::clone(&seen),
        };
        let router = Router::new().route("/api", get(txlist)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            url: Url::parse(&format!("http://{addr}/api")).unwrap(),
            seen,
        }
    }

    pub async fn json(body: serde_json::Value) -> Self {
        Self::start(StatusCode::OK, body.to_string()).await
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.seen.lock().unwrap().clone()
    }
}

pub const INSUFFICIENT_FUNDS: &str = "insufficient funds for gas * price + value";

#[derive(Clone)]
struct RpcState {
    balance: Option<U256>,
    methods: Arc<Mutex<Vec<String>>>,
}

fn rpc_error(id: Value, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": -32000, "message": message }
    })
}

fn rpc_answer(state: &RpcState, call: &Value) -> Value {
    let id = call.get("id").cloned().unwrap_or(Value::Null);
    let method = call.get("method").and_then(Value::as_str).unwrap_or_default();
    state.methods.lock().unwrap().push(method.to_string());

    let result = match method {
        "eth_chainId" => json!("0xaa36a7"),
        "eth_blockNumber" => json!("0x10"),
        "eth_getTransactionCount" => json!("0x0"),
        "eth_gasPrice" | "eth_maxPriorityFeePerGas" => json!("0x3b9aca00"),
        "eth_estimateGas" => json!("0x5208"),
        "eth_feeHistory" => json!({
            "oldestBlock": "0x10",
            "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
            "gasUsedRatio": [0.5],
            "reward": [["0x3b9aca00"]]
        }),
        "eth_getBalance" => match state.balance {
            Some(balance) => json!(format!("0x{balance:x}")),
            None => return rpc_error(id, "header not found"),
        },
        // Everything else, including eth_sendRawTransaction, is refused
        _ => return rpc_error(id, INSUFFICIENT_FUNDS),
    };
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

async fn rpc(State(state): State<RpcState>, Json(body): Json<Value>) -> Json<Value> {
    let answer = match body {
        Value::Array(calls) => Value::Array(calls.iter().map(|c| rpc_answer(&state, c)).collect()),
        call => rpc_answer(&state, &call),
    };
    Json(answer)
}

/// A running JSON-RPC node double: answers reads and fee queries, refuses
/// every transaction
pub struct MockRpc {
    pub url: Url,
    methods: Arc<Mutex<Vec<String>>>,
}

impl MockRpc {
    /// `balance` of `None` makes `eth_getBalance` fail
    pub async fn start(balance: Option<U256>) -> Self {
        let methods = Arc::new(Mutex::new(Vec::new()));
        let state = RpcState {
            balance,
            methods: Arc::clone(&methods),
        };
        let router = Router::new().route("/", post(rpc)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            methods,
        }
    }

    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }
}
