//! Domain layer - wallet types and pure logic
//!
//! No IO lives here apart from the OS randomness used for new mnemonics.

pub mod account;
pub mod chain;
pub mod transaction;
pub mod units;

pub use account::{derive_account, generate_account, Account, ProvisionedAccount};
pub use chain::{ChainConfig, ChainOverride, ChainRegistry};
pub use transaction::{
    ConfirmationStatus, ReceiptSummary, TransactionRecord, TransferRequest, TransferResult,
};
