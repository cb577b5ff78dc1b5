//! Ethereum infrastructure - Alloy provider implementation

mod provider;
pub(crate) mod types;

pub use provider::{AlloyProvider, ChainProvider, RpcFailure};
