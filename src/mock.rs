//! In-process JSON-RPC node for tests

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::Filter;

/// Serve `respond` on an ephemeral local port and return its base URL.
///
/// `respond` sees every decoded request body and returns the raw reply.
pub(crate) async fn spawn_node<F>(respond: F) -> String
where
    F: Fn(Value) -> (StatusCode, String) + Clone + Send + Sync + 'static,
{
    let route = warp::post()
        .and(warp::body::json())
        .map(move |req: Value| {
            let (status, body) = respond(req);
            warp::reply::with_status(body, status)
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{}", addr)
}

/// Successful envelope answering `req`.
pub(crate) fn rpc_result(req: &Value, result: Value) -> (StatusCode, String) {
    let body = json!({
        "jsonrpc": "2.0",
        "id": req["id"],
        "result": result
    });
    (StatusCode::OK, body.to_string())
}

/// Block JSON as a node returns it; each tx is `(hash, from, to)`.
pub(crate) fn block_json(number: u64, txs: &[(&str, &str, Option<&str>)]) -> Value {
    let number = format!("0x{:x}", number);
    let transactions: Vec<Value> = txs
        .iter()
        .map(|(hash, from, to)| {
            json!({
                "hash": hash,
                "from": from,
                "to": to,
                "value": "0xde0b6b3a7640000",
                "blockNumber": number,
                "gas": "0x5208",
                "input": "0x"
            })
        })
        .collect();

    json!({
        "number": number,
        "hash": "0x5f5e0c8b2d7a4f0e9b3c1a6d8e2f4b7c9a1d3e5f7b9c2d4e6f8a0b1c3d5e7f9a",
        "transactions": transactions
    })
}
