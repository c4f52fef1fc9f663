//! txwatch - Ethereum address transaction watcher
//!
//! Keeps a set of subscribed addresses and, each time a block is parsed,
//! records the transactions in it that were sent from or to one of them.
//! Blocks are fetched on demand from a JSON-RPC endpoint; nothing is
//! persisted across restarts.

pub mod api;
pub mod config;
pub mod error;
pub mod rpc;
pub mod store;
pub mod types;

#[cfg(test)]
mod mock;

// Re-export the main types for convenience
pub use error::{ChainFetchError, FetchErrorKind};
pub use rpc::{BlockSource, RpcClient};
pub use store::{ParseSummary, WatchStore};
pub use types::{Block, Transaction};
