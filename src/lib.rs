//! Pocket: a terminal wallet for EVM test networks
//!
//! Generate or recover an account from a BIP-39 mnemonic, watch its balance,
//! send native currency and list recent transactions.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod ui;
pub mod wallet;

pub use error::{WalletError, WalletResult};
