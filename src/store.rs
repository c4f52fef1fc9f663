//! Watch store
//!
//! Keeps the subscribed addresses, the transactions seen for each of them,
//! and the number of the last parsed block. All three live behind a single
//! read-write lock so a reader never sees a history update without the
//! matching block pointer update.

use crate::error::Result;
use crate::rpc::BlockSource;
use crate::types::{Block, Transaction};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct WatchState {
    subscriptions: HashSet<String>,
    /// Populated lazily; a missing key means no history yet.
    transactions: HashMap<String, Vec<Transaction>>,
    current_block: u64,
}

impl WatchState {
    /// Append `tx` to `address`'s history if the address is subscribed.
    fn record(&mut self, address: &str, tx: &Transaction) -> bool {
        if !self.subscriptions.contains(address) {
            return false;
        }
        self.transactions
            .entry(address.to_string())
            .or_default()
            .push(tx.clone());
        true
    }
}

/// Outcome of a successful [`WatchStore::parse_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    /// Block number that was parsed
    pub block: u64,
    /// Transactions contained in the block
    pub transactions: usize,
    /// History entries appended (a tx between two watched addresses counts twice)
    pub matches: usize,
}

/// Subscription registry and per-address transaction ledger.
pub struct WatchStore<S> {
    source: S,
    state: RwLock<WatchState>,
}

impl<S> WatchStore<S> {
    /// Create an empty store fetching blocks from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RwLock::new(WatchState::default()),
        }
    }

    /// Number of the last successfully parsed block, 0 before any parse.
    pub fn current_block(&self) -> u64 {
        self.state.read().current_block
    }

    /// Subscribe to `address`.
    ///
    /// Returns `false` if it was already subscribed.
    pub fn subscribe(&self, address: &str) -> bool {
        let added = self.state.write().subscriptions.insert(address.to_string());
        if added {
            debug!("Subscribed to address {}", address);
        } else {
            debug!("Address {} already subscribed", address);
        }
        added
    }

    /// Subscribe to every address in `addresses`, returning how many were new.
    pub fn subscribe_all<I>(&self, addresses: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut state = self.state.write();
        let mut added = 0;
        for address in addresses {
            if state.subscriptions.insert(address.into()) {
                added += 1;
            }
        }
        added
    }

    /// Number of subscribed addresses.
    pub fn subscriptions(&self) -> usize {
        self.state.read().subscriptions.len()
    }

    /// Snapshot of the history recorded for `address`.
    ///
    /// Unknown and never-matched addresses yield an empty list.
    pub fn transactions_for(&self, address: &str) -> Vec<Transaction> {
        self.state
            .read()
            .transactions
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Apply a fetched block under the write lock.
    fn commit(&self, number: u64, block: &Block) -> usize {
        let mut state = self.state.write();
        let mut matches = 0;

        for tx in &block.transactions {
            // Both sides are checked independently; a self-transfer from a
            // watched address is recorded twice.
            if state.record(&tx.from, tx) {
                matches += 1;
            }
            if let Some(to) = tx.to.as_deref() {
                if state.record(to, tx) {
                    matches += 1;
                }
            }
        }

        state.current_block = number;
        matches
    }
}

impl<S: BlockSource> WatchStore<S> {
    /// Fetch block `number` and record its transactions for watched addresses.
    ///
    /// The fetch happens without holding the lock. On failure nothing is
    /// changed. On success the block pointer moves to `number` even if it
    /// is lower than the previous one.
    pub async fn parse_block(&self, number: u64) -> Result<ParseSummary> {
        let block = self.source.get_block(number).await?;

        if block.number != number {
            warn!(
                "Requested block {} but node returned block {}",
                number, block.number
            );
        }

        let matches = self.commit(number, &block);
        info!(
            "Parsed block {} ({} transactions, {} matches)",
            number,
            block.transactions.len(),
            matches
        );

        Ok(ParseSummary {
            block: number,
            transactions: block.transactions.len(),
            matches,
        })
    }
}
