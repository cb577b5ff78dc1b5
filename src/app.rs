use std::time::{Duration, Instant};

use crate::core::{parse_command, Action, Command, CopyTarget, NotifyLevel};
use crate::domain::account::{derive_account, Account, ProvisionedAccount};
use crate::domain::chain::ChainConfig;
use crate::domain::transaction::{TransactionRecord, TransferRequest, TransferResult};
use crate::error::WalletError;
use crate::infrastructure::runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
use crate::wallet::{BALANCE_LOADING, BALANCE_UNAVAILABLE};

const STATUS_TTL: Duration = Duration::from_secs(3);

/// Editable text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SeedPhrase,
    Destination,
    Amount,
}

impl Field {
    pub fn title(&self) -> &'static str {
        match self {
            Field::SeedPhrase => "Seed phrase",
            Field::Destination => "Destination",
            Field::Amount => "Amount",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Editing(Field),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl From<NotifyLevel> for StatusLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Info => StatusLevel::Info,
            NotifyLevel::Warn => StatusLevel::Warn,
            NotifyLevel::Error => StatusLevel::Error,
        }
    }
}

/// Transfer banner state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    Idle,
    Pending,
    Complete { hash: String, url: String },
    Error { message: String },
}

/// Where the session is, derived from account and transfer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoAccount,
    AccountReady,
    TransferPending,
    TransferComplete,
    TransferError,
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

pub struct App {
    pub chain: ChainConfig,
    pub rpc_endpoint: String,

    // Account
    pub account: Option<Account>,
    pub seed_phrase: String,
    pub account_index: u32,
    pub recovery_open: bool,
    pub recovery_input: String,

    // Transfer form
    pub destination: String,
    pub amount: String,
    pub transfer: TransferStatus,
    pub last_tx_url: Option<String>,
    /// Id of the transfer awaiting its result; survives account changes
    transfer_in_flight: Option<u64>,
    next_transfer_id: u64,

    // History
    pub history: Vec<TransactionRecord>,
    pub history_loading: bool,

    // UI
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,

    // Outgoing requests, drained by the event loop
    pending_balance_request: Option<String>,
    pending_history_request: Option<String>,
    pending_transfer_request: Option<(u64, TransferRequest)>,
    pending_clipboard: Option<(&'static str, String)>,
}

impl App {
    pub fn new(chain: ChainConfig, rpc_endpoint: impl Into<String>) -> Self {
        Self {
            chain,
            rpc_endpoint: rpc_endpoint.into(),
            account: None,
            seed_phrase: String::new(),
            account_index: 0,
            recovery_open: false,
            recovery_input: String::new(),
            destination: String::new(),
            amount: String::new(),
            transfer: TransferStatus::Idle,
            last_tx_url: None,
            transfer_in_flight: None,
            next_transfer_id: 1,
            history: Vec::new(),
            history_loading: false,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            help_open: false,
            should_quit: false,
            pending_balance_request: None,
            pending_history_request: None,
            pending_transfer_request: None,
            pending_clipboard: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.account.is_none() {
            return Phase::NoAccount;
        }
        match self.transfer {
            TransferStatus::Idle => Phase::AccountReady,
            TransferStatus::Pending => Phase::TransferPending,
            TransferStatus::Complete { .. } => Phase::TransferComplete,
            TransferStatus::Error { .. } => Phase::TransferError,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    // ---- Account provisioning ----

    /// Generate a new mnemonic and switch to its first account
    pub fn create_account(&mut self) {
        self.provision("", 0);
    }

    /// Recover from a mnemonic (or import a raw key) at index 0
    pub fn recover_account(&mut self, seed_phrase: &str) {
        self.provision(seed_phrase, 0);
    }

    /// Re-derive the current mnemonic at another index
    pub fn set_account_index(&mut self, index: u32) {
        if self.seed_phrase.is_empty() {
            self.set_status(
                "No seed phrase available to derive from",
                StatusLevel::Warn,
            );
            return;
        }
        let phrase = self.seed_phrase.clone();
        self.provision(&phrase, index);
    }

    fn provision(&mut self, seed_phrase: &str, index: u32) {
        match derive_account(&self.chain, seed_phrase, index) {
            Ok(provisioned) => self.apply_provisioned(provisioned, index),
            Err(err) => self.set_status(err.to_string(), StatusLevel::Error),
        }
    }

    fn apply_provisioned(&mut self, provisioned: ProvisionedAccount, index: u32) {
        let ProvisionedAccount {
            mut account,
            seed_phrase,
        } = provisioned;
        account.balance = BALANCE_LOADING.to_string();
        let address = account.address.clone();

        self.account = Some(account);
        self.account_index = if seed_phrase.is_empty() { 0 } else { index };
        self.seed_phrase = seed_phrase;
        self.recovery_open = false;
        self.recovery_input.clear();
        // A transfer still waiting for its receipt keeps its banner
        if self.transfer_in_flight.is_none() {
            self.transfer = TransferStatus::Idle;
        }
        self.history.clear();
        self.history_loading = true;
        if let InputMode::Editing(Field::SeedPhrase) = self.input_mode {
            self.input_mode = InputMode::Normal;
        }

        self.pending_balance_request = Some(address.clone());
        self.pending_history_request = Some(address.clone());
        self.set_status(format!("Account ready: {}", short_addr(&address)), StatusLevel::Info);
    }

    /// Re-query balance and history of the current account
    pub fn refresh(&mut self) {
        let Some(address) = self.account.as_ref().map(|a| a.address.clone()) else {
            self.set_status("No account created yet", StatusLevel::Warn);
            return;
        };
        if let Some(account) = self.account.as_mut() {
            account.balance = BALANCE_LOADING.to_string();
        }
        self.history_loading = true;
        self.pending_balance_request = Some(address.clone());
        self.pending_history_request = Some(address);
        self.set_status("Refreshing…", StatusLevel::Info);
    }

    // ---- Transfer ----

    /// The amount field as a positive finite number
    pub fn amount_value(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value > 0.0)
    }

    pub fn can_send(&self) -> bool {
        self.account.is_some()
            && self.amount_value().is_some()
            && self.transfer_in_flight.is_none()
    }

    pub fn submit_transfer(&mut self) {
        if !self.can_send() {
            let reason = if self.account.is_none() {
                "No account created yet"
            } else if self.transfer_in_flight.is_some() {
                "A transfer is already pending"
            } else {
                "Enter an amount greater than zero"
            };
            self.set_status(reason, StatusLevel::Warn);
            return;
        }
        let (Some(account), Some(amount)) = (self.account.as_ref(), self.amount_value()) else {
            return;
        };

        let request = TransferRequest {
            amount,
            from: account.address.clone(),
            to: self.destination.trim().to_string(),
            private_key: account.private_key.clone(),
        };
        let id = self.next_transfer_id;
        self.next_transfer_id += 1;
        self.transfer_in_flight = Some(id);
        self.transfer = TransferStatus::Pending;
        self.pending_transfer_request = Some((id, request));
    }

    /// Hide the complete/error banner
    pub fn dismiss_banner(&mut self) {
        if matches!(
            self.transfer,
            TransferStatus::Complete { .. } | TransferStatus::Error { .. }
        ) {
            self.transfer = TransferStatus::Idle;
        }
    }

    // ---- Runtime answers ----

    fn is_current_address(&self, address: &str) -> bool {
        self.account
            .as_ref()
            .is_some_and(|account| account.address.eq_ignore_ascii_case(address))
    }

    pub fn apply_balance(&mut self, address: String, balance: String) {
        if !self.is_current_address(&address) {
            return;
        }
        if let Some(account) = self.account.as_mut() {
            account.balance = balance;
        }
    }

    pub fn apply_history(&mut self, address: String, records: Vec<TransactionRecord>) {
        if !self.is_current_address(&address) {
            return;
        }
        self.history = records;
        self.history_loading = false;
    }

    pub fn apply_transfer_result(&mut self, id: u64, result: Result<TransferResult, WalletError>) {
        if self.transfer_in_flight != Some(id) {
            tracing::warn!(id, "Ignoring result of a transfer that is not in flight");
            return;
        }
        self.transfer_in_flight = None;
        match result {
            Ok(result) if result.is_success() => {
                let url = self.chain.tx_url(&result.transaction_hash);
                self.last_tx_url = Some(url.clone());
                self.transfer = TransferStatus::Complete {
                    hash: result.transaction_hash,
                    url,
                };
                if let Some(account) = self.account.as_mut() {
                    account.balance = BALANCE_LOADING.to_string();
                    self.pending_balance_request = Some(account.address.clone());
                }
            }
            Ok(result) => {
                self.transfer = TransferStatus::Error {
                    message: result.diagnostic(),
                };
            }
            Err(err) => {
                self.transfer = TransferStatus::Error {
                    message: err.to_string(),
                };
            }
        }
    }

    pub fn apply_runtime_error(&mut self, message: String) {
        self.set_status(message, StatusLevel::Error);
    }

    fn fail_balance_request(&mut self, address: &str, message: String) {
        if self.is_current_address(address) {
            if let Some(account) = self.account.as_mut() {
                account.balance = BALANCE_UNAVAILABLE.to_string();
            }
        }
        self.set_status(message, StatusLevel::Error);
    }

    fn fail_history_request(&mut self, address: &str, message: String) {
        if self.is_current_address(address) {
            self.history_loading = false;
        }
        self.set_status(message, StatusLevel::Error);
    }

    fn fail_transfer_request(&mut self, id: u64, message: String) {
        if self.transfer_in_flight == Some(id) {
            self.transfer_in_flight = None;
            self.transfer = TransferStatus::Error { message };
        }
    }

    // ---- Input modes ----

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn start_editing(&mut self, field: Field) {
        if field == Field::SeedPhrase {
            self.recovery_open = true;
        }
        self.input_mode = InputMode::Editing(field);
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// `i` key: open the recovery input, or close it if it is open
    pub fn toggle_recovery(&mut self) {
        if self.recovery_open {
            self.recovery_open = false;
            if self.input_mode == InputMode::Editing(Field::SeedPhrase) {
                self.input_mode = InputMode::Normal;
            }
        } else {
            self.start_editing(Field::SeedPhrase);
        }
    }

    pub fn field_buffer(&self, field: Field) -> &str {
        match field {
            Field::SeedPhrase => &self.recovery_input,
            Field::Destination => &self.destination,
            Field::Amount => &self.amount,
        }
    }

    fn field_buffer_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::SeedPhrase => &mut self.recovery_input,
            Field::Destination => &mut self.destination,
            Field::Amount => &mut self.amount,
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if let InputMode::Editing(field) = self.input_mode {
            self.field_buffer_mut(field).push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if let InputMode::Editing(field) = self.input_mode {
            self.field_buffer_mut(field).pop();
        }
    }

    /// Tab: move to the next form field
    pub fn next_field(&mut self) {
        let InputMode::Editing(field) = self.input_mode else {
            return;
        };
        let next = match field {
            Field::SeedPhrase => Field::Destination,
            Field::Destination => Field::Amount,
            Field::Amount if self.recovery_open => Field::SeedPhrase,
            Field::Amount => Field::Destination,
        };
        self.input_mode = InputMode::Editing(next);
    }

    /// Enter while editing
    pub fn submit_field(&mut self) {
        let InputMode::Editing(field) = self.input_mode else {
            return;
        };
        match field {
            Field::SeedPhrase => {
                let phrase = self.recovery_input.clone();
                self.recover_account(&phrase);
            }
            Field::Destination => self.input_mode = InputMode::Editing(Field::Amount),
            Field::Amount => {
                self.input_mode = InputMode::Normal;
                self.submit_transfer();
            }
        }
    }

    // ---- Commands ----

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }

        let cmd = parse_command(&input);
        self.exit_command();
        let action = self.execute_command(&cmd);
        self.apply_action(action);
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::New => {
                self.create_account();
                Action::None
            }
            Command::Recover(Some(phrase)) => {
                self.recover_account(phrase);
                Action::None
            }
            Command::Recover(None) => {
                self.start_editing(Field::SeedPhrase);
                Action::None
            }
            Command::Index(index) => {
                self.set_account_index(*index);
                Action::None
            }
            Command::Send { amount, to } => {
                self.amount = amount.clone();
                self.destination = to.clone();
                self.submit_transfer();
                Action::None
            }
            Command::To(address) => {
                self.destination = address.clone();
                Action::Notify(format!("Destination set to {}", short_addr(address)), NotifyLevel::Info)
            }
            Command::Amount(value) => {
                self.amount = value.clone();
                Action::None
            }
            Command::Refresh => {
                self.refresh();
                Action::None
            }
            Command::Copy(target) => self.copy(*target),
            Command::Help => {
                self.help_open = true;
                Action::None
            }
            Command::Quit => Action::Quit,
            Command::Unknown(s) => {
                Action::Notify(format!("Unknown command: {}", s), NotifyLevel::Warn)
            }
        }
    }

    /// Apply an action returned by a command
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Copy { label, text } => self.pending_clipboard = Some((label, text)),
            Action::Notify(msg, level) => self.set_status(msg, level.into()),
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn copy(&self, target: CopyTarget) -> Action {
        let (label, text) = match target {
            CopyTarget::Address => ("address", self.account.as_ref().map(|a| a.address.clone())),
            CopyTarget::PrivateKey => (
                "private key",
                self.account.as_ref().map(|a| a.private_key.clone()),
            ),
            CopyTarget::Mnemonic => (
                "seed phrase",
                Some(self.seed_phrase.clone()).filter(|s| !s.is_empty()),
            ),
            CopyTarget::TxLink => ("transaction link", self.last_tx_url.clone()),
        };
        match text {
            Some(text) => Action::Copy { label, text },
            None => Action::Notify(format!("No {label} to copy"), NotifyLevel::Warn),
        }
    }

    // ---- Request slots ----

    pub fn take_balance_request(&mut self) -> Option<String> {
        self.pending_balance_request.take()
    }

    pub fn take_history_request(&mut self) -> Option<String> {
        self.pending_history_request.take()
    }

    pub fn take_transfer_request(&mut self) -> Option<(u64, TransferRequest)> {
        self.pending_transfer_request.take()
    }

    pub fn take_clipboard_request(&mut self) -> Option<(&'static str, String)> {
        self.pending_clipboard.take()
    }
}

/// Feed runtime answers into `app` and forward its queued requests
pub fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::BalanceReady { address, balance } => app.apply_balance(address, balance),
            RuntimeEvent::HistoryReady { address, records } => app.apply_history(address, records),
            RuntimeEvent::TransferFinished { id, result } => app.apply_transfer_result(id, result),
            RuntimeEvent::Error { message } => app.apply_runtime_error(message),
        }
    }

    if let Some(address) = app.take_balance_request() {
        let cmd = RuntimeCommand::FetchBalance {
            address: address.clone(),
        };
        if let Err(err) = runtime.send(cmd) {
            app.fail_balance_request(&address, err.to_string());
        }
    }
    if let Some(address) = app.take_history_request() {
        let cmd = RuntimeCommand::FetchHistory {
            address: address.clone(),
        };
        if let Err(err) = runtime.send(cmd) {
            app.fail_history_request(&address, err.to_string());
        }
    }
    if let Some((id, request)) = app.take_transfer_request() {
        if let Err(err) = runtime.send(RuntimeCommand::Transfer { id, request }) {
            app.fail_transfer_request(id, err.to_string());
        }
    }
}

/// First 6 and last 4 characters of a long address
pub fn short_addr(addr: &str) -> String {
    let chars: Vec<char> = addr.chars().collect();
    if chars.len() <= 12 {
        return addr.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::{ChainRegistry, SEPOLIA_CHAIN_ID};
    use crate::domain::transaction::ReceiptSummary;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const OTHER_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn app() -> App {
        let chain = ChainRegistry::builtin()
            .lookup(SEPOLIA_CHAIN_ID)
            .unwrap()
            .clone();
        App::new(chain, "http://localhost:8545")
    }

    fn recovered() -> App {
        let mut app = app();
        app.recover_account(TEST_MNEMONIC);
        app.take_balance_request();
        app.take_history_request();
        app
    }

    /// Submit the form and return the queued transfer id
    fn submit(app: &mut App) -> u64 {
        app.submit_transfer();
        app.take_transfer_request().map(|(id, _)| id).unwrap()
    }

    fn receipt(status: bool) -> TransferResult {
        TransferResult::from_receipt(ReceiptSummary {
            transaction_hash: "0xabc".to_string(),
            status,
            block_number: Some(1),
            gas_used: 21_000,
            effective_gas_price: 1,
            from: TEST_ADDRESS.to_string(),
            to: Some(OTHER_ADDRESS.to_string()),
        })
    }

    #[test]
    fn test_starts_without_account() {
        let app = app();
        assert_eq!(app.phase(), Phase::NoAccount);
        assert!(!app.can_send());
    }

    #[test]
    fn test_provisioning_queues_one_balance_and_history_fetch() {
        let mut app = app();
        app.recover_account(TEST_MNEMONIC);

        assert_eq!(app.phase(), Phase::AccountReady);
        let account = app.account.as_ref().unwrap();
        assert_eq!(account.address, TEST_ADDRESS);
        assert_eq!(account.balance, BALANCE_LOADING);
        assert_eq!(app.seed_phrase, TEST_MNEMONIC);

        assert_eq!(app.take_balance_request().as_deref(), Some(TEST_ADDRESS));
        assert_eq!(app.take_history_request().as_deref(), Some(TEST_ADDRESS));
        assert!(app.take_balance_request().is_none());
        assert!(app.take_history_request().is_none());
    }

    #[test]
    fn test_invalid_seed_shows_error_and_keeps_state() {
        let mut app = recovered();
        app.recover_account("not a valid mnemonic");
        assert_eq!(app.account.as_ref().unwrap().address, TEST_ADDRESS);
        let (text, level) = app.status_text().unwrap();
        assert_eq!(level, StatusLevel::Error);
        assert!(text.contains("invalid"));
        assert!(app.take_balance_request().is_none());
    }

    #[test]
    fn test_index_rederives() {
        let mut app = recovered();
        app.set_account_index(1);
        assert_eq!(app.account.as_ref().unwrap().address, OTHER_ADDRESS);
        assert_eq!(app.account_index, 1);
        assert_eq!(app.take_balance_request().as_deref(), Some(OTHER_ADDRESS));
    }

    #[test]
    fn test_index_without_mnemonic_warns() {
        let mut app = app();
        app.set_account_index(2);
        assert!(app.account.is_none());
        assert_eq!(app.status_text().unwrap().1, StatusLevel::Warn);
    }

    #[test]
    fn test_can_send_requires_positive_amount() {
        let mut app = recovered();
        for amount in ["", "0", "0.0", "-1", "abc", "NaN", "inf"] {
            app.amount = amount.to_string();
            assert!(!app.can_send(), "amount {amount:?} should disable send");
        }
        app.amount = "1.5".to_string();
        assert!(app.can_send());
    }

    #[test]
    fn test_submit_transfer_goes_pending_once() {
        let mut app = recovered();
        app.destination = OTHER_ADDRESS.to_string();
        app.amount = "1.5".to_string();
        app.submit_transfer();

        assert_eq!(app.phase(), Phase::TransferPending);
        assert!(!app.can_send());
        let (_, request) = app.take_transfer_request().unwrap();
        assert_eq!(request.amount, 1.5);
        assert_eq!(request.from, TEST_ADDRESS);
        assert_eq!(request.to, OTHER_ADDRESS);

        app.submit_transfer();
        assert!(app.take_transfer_request().is_none());
    }

    #[test]
    fn test_zero_amount_does_not_submit() {
        let mut app = recovered();
        app.amount = "0".to_string();
        app.submit_transfer();
        assert_eq!(app.phase(), Phase::AccountReady);
        assert!(app.take_transfer_request().is_none());
    }

    #[test]
    fn test_success_completes_and_refreshes_balance_once() {
        let mut app = recovered();
        app.amount = "1".to_string();
        let id = submit(&mut app);

        app.apply_transfer_result(id, Ok(receipt(true)));
        assert_eq!(
            app.transfer,
            TransferStatus::Complete {
                hash: "0xabc".to_string(),
                url: "https://sepolia.etherscan.io/tx/0xabc".to_string(),
            }
        );
        assert_eq!(app.take_balance_request().as_deref(), Some(TEST_ADDRESS));
        assert!(app.take_balance_request().is_none());
        assert!(app.take_history_request().is_none());

        app.dismiss_banner();
        assert_eq!(app.phase(), Phase::AccountReady);
    }

    #[test]
    fn test_failed_receipt_shows_diagnostic() {
        let mut app = recovered();
        app.amount = "1".to_string();
        let id = submit(&mut app);

        app.apply_transfer_result(id, Ok(receipt(false)));
        match &app.transfer {
            TransferStatus::Error { message } => assert!(message.contains("\"status\":false")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(app.take_balance_request().is_none());
    }

    #[test]
    fn test_transfer_error_shows_reason() {
        let mut app = recovered();
        app.amount = "1".to_string();
        let id = submit(&mut app);

        app.apply_transfer_result(id, Err(WalletError::transfer("insufficient funds")));
        assert_eq!(app.phase(), Phase::TransferError);
        assert_eq!(
            app.transfer,
            TransferStatus::Error {
                message: "insufficient funds".to_string()
            }
        );
        assert!(app.can_send());
    }

    #[test]
    fn test_stale_answers_are_dropped() {
        let mut app = recovered();
        app.apply_balance(OTHER_ADDRESS.to_string(), "9.00".to_string());
        assert_eq!(app.account.as_ref().unwrap().balance, BALANCE_LOADING);

        app.apply_balance(TEST_ADDRESS.to_lowercase(), "1.00".to_string());
        assert_eq!(app.account.as_ref().unwrap().balance, "1.00");

        app.apply_history(OTHER_ADDRESS.to_string(), Vec::new());
        assert!(app.history_loading);
    }

    #[test]
    fn test_new_account_keeps_transfer_in_flight() {
        let mut app = recovered();
        app.destination = OTHER_ADDRESS.to_string();
        app.amount = "1".to_string();
        let first = submit(&mut app);

        app.set_account_index(1);
        assert_eq!(app.phase(), Phase::TransferPending);
        assert!(!app.can_send());

        app.amount = "2".to_string();
        app.submit_transfer();
        assert!(app.take_transfer_request().is_none());
        assert_eq!(app.status_text().unwrap().0, "A transfer is already pending");

        app.apply_transfer_result(first, Ok(receipt(true)));
        assert_eq!(app.phase(), Phase::TransferComplete);
        assert!(app.can_send());
    }

    #[test]
    fn test_result_for_another_transfer_is_ignored() {
        let mut app = recovered();
        app.amount = "1".to_string();
        let id = submit(&mut app);

        app.apply_transfer_result(id + 1, Ok(receipt(true)));
        assert_eq!(app.transfer, TransferStatus::Pending);

        app.apply_transfer_result(id, Err(WalletError::transfer("nonce too low")));
        assert_eq!(app.phase(), Phase::TransferError);
        let second = submit(&mut app);
        assert_ne!(second, id);

        // A repeated answer for the finished transfer changes nothing
        app.apply_transfer_result(id, Ok(receipt(true)));
        assert_eq!(app.transfer, TransferStatus::Pending);
    }

    #[test]
    fn test_recover_starts_at_index_zero() {
        let mut app = recovered();
        app.set_account_index(1);
        assert_eq!(app.account_index, 1);

        app.recover_account(TEST_MNEMONIC);
        assert_eq!(app.account_index, 0);
        assert_eq!(app.account.as_ref().unwrap().address, TEST_ADDRESS);
    }

    #[test]
    fn test_editing_and_submit_seed_phrase() {
        let mut app = app();
        app.toggle_recovery();
        assert!(app.recovery_open);
        assert_eq!(app.input_mode, InputMode::Editing(Field::SeedPhrase));
        for ch in TEST_MNEMONIC.chars() {
            app.push_char(ch);
        }
        app.submit_field();
        assert_eq!(app.account.as_ref().unwrap().address, TEST_ADDRESS);
        assert!(!app.recovery_open);
        assert!(app.recovery_input.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_tab_cycles_fields() {
        let mut app = app();
        app.start_editing(Field::Destination);
        app.next_field();
        assert_eq!(app.input_mode, InputMode::Editing(Field::Amount));
        app.next_field();
        assert_eq!(app.input_mode, InputMode::Editing(Field::Destination));
        app.push_char('x');
        app.pop_char();
        app.pop_char();
        assert!(app.destination.is_empty());
    }

    #[test]
    fn test_command_palette() {
        let mut app = app();
        app.enter_command();
        app.command.input = format!("recover {TEST_MNEMONIC}");
        app.apply_command();
        assert_eq!(app.account.as_ref().unwrap().address, TEST_ADDRESS);

        app.enter_command();
        app.command.input = format!("send 0.25 {OTHER_ADDRESS}");
        app.apply_command();
        assert_eq!(app.phase(), Phase::TransferPending);

        app.enter_command();
        app.command.input = "bogus".to_string();
        app.apply_command();
        assert_eq!(app.status_text().unwrap(), ("Unknown command: bogus", StatusLevel::Warn));

        app.enter_command();
        app.command.input = "quit".to_string();
        app.apply_command();
        assert!(app.should_quit);
    }

    #[test]
    fn test_copy_targets() {
        let mut app = app();
        assert!(matches!(app.copy(CopyTarget::Address), Action::Notify(_, NotifyLevel::Warn)));

        app.recover_account(TEST_MNEMONIC);
        assert_eq!(
            app.copy(CopyTarget::Address),
            Action::Copy {
                label: "address",
                text: TEST_ADDRESS.to_string()
            }
        );
        assert!(matches!(app.copy(CopyTarget::TxLink), Action::Notify(..)));

        let action = app.copy(CopyTarget::Mnemonic);
        app.apply_action(action);
        assert_eq!(
            app.take_clipboard_request(),
            Some(("seed phrase", TEST_MNEMONIC.to_string()))
        );
    }

    #[test]
    fn test_short_addr() {
        assert_eq!(short_addr(TEST_ADDRESS), "0xf39F…2266");
        assert_eq!(short_addr("0x1234"), "0x1234");
        assert_eq!(short_addr("aéééééééééééé"), "aééééé…éééé");
    }

    #[test]
    fn test_to_command_with_multibyte_text() {
        let mut app = app();
        app.enter_command();
        app.command.input = "to aéééééééé".to_string();
        app.apply_command();
        assert_eq!(app.destination, "aéééééééé");
        assert_eq!(app.status_text().unwrap().0, "Destination set to aéééééééé");

        app.enter_command();
        app.command.input = "to ééééééééééééééé".to_string();
        app.apply_command();
        assert_eq!(
            app.status_text().unwrap().0,
            "Destination set to éééééé…éééé"
        );
    }
}
