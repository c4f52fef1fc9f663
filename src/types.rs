//! Ethereum JSON-RPC types
//!
//! Blocks and transactions as returned by `eth_getBlockByNumber` with full
//! transaction objects. Transaction fields stay in their RPC text encoding;
//! only the block number is decoded.

use serde::{Deserialize, Deserializer, Serialize};

/// Ethereum block with full transaction details.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    /// Block number (hex string in JSON, parsed to u64)
    #[serde(rename = "number", deserialize_with = "deserialize_hex_u64")]
    pub number: u64,

    /// Transactions in block order
    #[serde(rename = "transactions", default)]
    pub transactions: Vec<Transaction>,
}

/// Ethereum transaction as seen by a watched address.
///
/// Addresses are compared as exact strings, so `0xAB..` and `0xab..` are
/// different keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash
    pub hash: String,

    /// Sender address
    pub from: String,

    /// Recipient address (None for contract creation)
    #[serde(default)]
    pub to: Option<String>,

    /// Value transferred in wei, hex quantity
    #[serde(default)]
    pub value: String,

    /// Number of the containing block, hex quantity
    #[serde(rename = "blockNumber", default)]
    pub block_number: String,
}

/// Encode a block number as a JSON-RPC hex quantity (`0x` prefix, no leading zeros).
pub fn hex_quantity(n: u64) -> String {
    format!("0x{:x}", n)
}

/// Deserialize a hex string to u64.
fn deserialize_hex_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.strip_prefix("0x").unwrap_or(&s);
    if s.is_empty() {
        return Err(serde::de::Error::custom("empty hex quantity"));
    }
    u64::from_str_radix(s, 16).map_err(serde::de::Error::custom)
}
