//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based JSON-RPC provider
//! - Etherscan-compatible explorer client
//! - Tokio runtime bridge for async operations

pub mod ethereum;
pub mod explorer;
pub mod runtime;

pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
