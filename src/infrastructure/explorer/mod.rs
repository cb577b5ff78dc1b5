//! Block explorer API access

mod client;

pub use client::{parse_txlist, EtherscanClient, ExplorerApi, HISTORY_PAGE_SIZE};
