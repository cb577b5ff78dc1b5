//! Account provisioning: generate, recover or import an account
//!
//! Key material lives only in memory. Nothing here is ever written to disk
//! or logged.

use std::fmt;

use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use bip39::{Language, Mnemonic};
use rand::RngCore;

use crate::domain::chain::ChainConfig;
use crate::error::{WalletError, WalletResult};

/// Entropy size for generated mnemonics (256 bits -> 24 words)
pub const MNEMONIC_ENTROPY_BYTES: usize = 32;

/// Balance shown before the first balance query answers
pub const DEFAULT_BALANCE: &str = "0";

/// A single account held by the wallet session
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// EIP-55 checksummed address
    pub address: String,
    /// 0x-prefixed hex private key
    pub private_key: String,
    /// Display balance in ether
    pub balance: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .field("balance", &self.balance)
            .finish()
    }
}

impl Account {
    fn from_signer(signer: &PrivateKeySigner) -> Self {
        Self {
            address: signer.address().to_checksum(None),
            private_key: format!("0x{}", hex::encode(signer.to_bytes())),
            balance: DEFAULT_BALANCE.to_string(),
        }
    }
}

/// Result of provisioning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    pub account: Account,
    /// The mnemonic used, or empty when a raw private key was imported
    pub seed_phrase: String,
}

/// Generate a fresh 24-word mnemonic and derive its first account
pub fn generate_account(chain: &ChainConfig) -> WalletResult<ProvisionedAccount> {
    derive_account(chain, "", 0)
}

/// Derive or recover an account.
///
/// * empty input: a new 24-word mnemonic is generated first
/// * input containing whitespace: treated as a BIP-39 mnemonic and derived at
///   the chain's BIP-44 path for `account_index`
/// * anything else: treated as a raw hex private key
pub fn derive_account(
    chain: &ChainConfig,
    seed_phrase: &str,
    account_index: u32,
) -> WalletResult<ProvisionedAccount> {
    let input = seed_phrase.trim();

    let phrase = if input.is_empty() {
        generate_mnemonic()?
    } else if input.contains(char::is_whitespace) {
        normalize_mnemonic(input)?
    } else {
        let signer = signer_from_private_key(input)?;
        tracing::info!(address = %signer.address(), "Imported account from private key");
        return Ok(ProvisionedAccount {
            account: Account::from_signer(&signer),
            seed_phrase: String::new(),
        });
    };

    let path = chain.derivation_path(account_index);
    let signer = MnemonicBuilder::<English>::default()
        .phrase(phrase.as_str())
        .derivation_path(&path)
        .map_err(|e| WalletError::InvalidSeed(format!("invalid derivation path {path}: {e}")))?
        .build()
        .map_err(|e| WalletError::InvalidSeed(format!("mnemonic derivation failed: {e}")))?;

    tracing::info!(
        address = %signer.address(),
        account_index,
        "Derived account from mnemonic"
    );

    Ok(ProvisionedAccount {
        account: Account::from_signer(&signer),
        seed_phrase: phrase,
    })
}

/// Build a signer from a hex private key, with or without 0x prefix
pub fn signer_from_private_key(private_key: &str) -> WalletResult<PrivateKeySigner> {
    let key_hex = private_key
        .trim()
        .strip_prefix("0x")
        .or_else(|| private_key.trim().strip_prefix("0X"))
        .unwrap_or(private_key.trim());

    if key_hex.len() != 64 || !key_hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidSeed(
            "expected a mnemonic or a 64 hex character private key".to_string(),
        ));
    }

    key_hex
        .parse::<PrivateKeySigner>()
        .map_err(|e| WalletError::InvalidSeed(format!("invalid private key: {e}")))
}

fn generate_mnemonic() -> WalletResult<String> {
    let mut entropy = [0u8; MNEMONIC_ENTROPY_BYTES];
    rand::thread_rng().fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::InvalidSeed(format!("mnemonic generation failed: {e}")))?;
    Ok(mnemonic.to_string())
}

/// Collapse whitespace and validate words and checksum
fn normalize_mnemonic(input: &str) -> WalletResult<String> {
    let phrase = input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    Mnemonic::parse_in(Language::English, &phrase)
        .map_err(|e| WalletError::InvalidSeed(format!("invalid mnemonic: {e}")))?;
    Ok(phrase)
}
