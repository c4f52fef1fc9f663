//! JSON-RPC client for Ethereum nodes
//!
//! Fetches full blocks with `eth_getBlockByNumber` and maps every failure
//! mode of the round trip onto [`ChainFetchError`].

use crate::error::{ChainFetchError, Result};
use crate::types::{hex_quantity, Block};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Anything that can hand the watch store a block by number.
#[trait_variant::make(Send)]
pub trait BlockSource {
    /// Fetch block `number` with full transaction objects.
    async fn get_block(&self, number: u64) -> Result<Block>;
}

/// Response envelope.
///
/// A member that is present but `null` is kept as `Some(Value::Null)`; only
/// an absent member is `None`.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default, deserialize_with = "deserialize_present")]
    result: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    error: Option<Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// The `error` member, structured when the node follows JSON-RPC 2.0.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RpcErrorPayload {
    Structured {
        code: i64,
        #[serde(default)]
        message: String,
    },
    Raw(Value),
}

impl From<RpcErrorPayload> for ChainFetchError {
    fn from(payload: RpcErrorPayload) -> Self {
        match payload {
            RpcErrorPayload::Structured { code, message } => ChainFetchError::Rpc {
                code: Some(code),
                message,
            },
            RpcErrorPayload::Raw(Value::String(message)) => {
                ChainFetchError::Rpc { code: None, message }
            }
            RpcErrorPayload::Raw(raw) => ChainFetchError::Rpc {
                code: None,
                message: raw.to_string(),
            },
        }
    }
}

/// JSON-RPC client for Ethereum nodes.
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
}

impl RpcClient {
    /// Create a new RPC client.
    ///
    /// `timeout` bounds each request end to end, including reading the body.
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a JSON-RPC call and return its `result` member, which may be `null`.
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        let response = self.client.post(&self.url).json(&request).send().await?;
        debug!("RPC {} answered with status {}", method, response.status());

        // Nodes report JSON-RPC errors with non-2xx statuses too, so the
        // status is not checked; the envelope decides.
        let body = response.bytes().await?;
        let envelope: RpcResponse = serde_json::from_slice(&body)?;

        // Any `error` member fails the call, `null` included.
        if let Some(error) = envelope.error {
            let payload: RpcErrorPayload = serde_json::from_value(error)?;
            return Err(payload.into());
        }

        match envelope.result {
            Some(result) => Ok(result),
            None => Err(ChainFetchError::Decode(serde::de::Error::missing_field(
                "result",
            ))),
        }
    }
}

impl BlockSource for RpcClient {
    async fn get_block(&self, number: u64) -> Result<Block> {
        let params = json!([hex_quantity(number), true]);
        let result = self.call("eth_getBlockByNumber", params).await?;

        // Nodes answer `null` for blocks they do not have; that parses as a
        // block with no transactions.
        if result.is_null() {
            debug!("Block {} returned null, treating it as empty", number);
            return Ok(Block {
                number,
                transactions: Vec::new(),
            });
        }

        Ok(serde_json::from_value(result)?)
    }
}
