//! HTTP API
//!
//! Routes:
//! - `/subscribe?address=<address>` - subscribe to an address
//! - `/transactions?address=<address>` - transactions recorded for an address
//! - `/current-block` - last parsed block number
//! - `/parse-block?block=<number>` - fetch and parse a block (decimal number)

use crate::rpc::BlockSource;
use crate::store::WatchStore;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error, info};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

#[derive(Debug, Deserialize)]
pub struct AddressParam {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockParam {
    #[serde(default)]
    pub block: String,
}

fn text(body: impl Into<String>, status: StatusCode) -> Response {
    warp::reply::with_status(body.into(), status).into_response()
}

fn with_store<S>(
    store: Arc<WatchStore<S>>,
) -> impl Filter<Extract = (Arc<WatchStore<S>>,), Error = Infallible> + Clone
where
    S: Send + Sync + 'static,
{
    warp::any().map(move || store.clone())
}

async fn handle_subscribe<S>(
    params: AddressParam,
    store: Arc<WatchStore<S>>,
) -> Result<Response, Rejection> {
    if params.address.is_empty() {
        return Ok(text("Address parameter is required", StatusCode::BAD_REQUEST));
    }

    if store.subscribe(&params.address) {
        Ok(text(
            format!("Successfully subscribed to address: {}", params.address),
            StatusCode::OK,
        ))
    } else {
        Ok(text("Address already subscribed", StatusCode::CONFLICT))
    }
}

async fn handle_transactions<S>(
    params: AddressParam,
    store: Arc<WatchStore<S>>,
) -> Result<Response, Rejection> {
    if params.address.is_empty() {
        return Ok(text("Address parameter is required", StatusCode::BAD_REQUEST));
    }

    let transactions = store.transactions_for(&params.address);
    debug!(
        "Returning {} transactions for address {}",
        transactions.len(),
        params.address
    );
    Ok(warp::reply::json(&transactions).into_response())
}

async fn handle_current_block<S>(store: Arc<WatchStore<S>>) -> Result<Response, Rejection> {
    let current = store.current_block();
    debug!("Current block: {}", current);
    Ok(text(format!("Current block: {}", current), StatusCode::OK))
}

async fn handle_parse_block<S>(
    params: BlockParam,
    store: Arc<WatchStore<S>>,
) -> Result<Response, Rejection>
where
    S: BlockSource + Sync,
{
    let number = match params.block.parse::<u64>() {
        Ok(number) => number,
        Err(_) => {
            error!("Invalid block number: {:?}", params.block);
            return Ok(text("Invalid block number", StatusCode::BAD_REQUEST));
        }
    };

    match store.parse_block(number).await {
        Ok(summary) => {
            info!(
                "Block {} parsed successfully ({} matches)",
                summary.block, summary.matches
            );
            Ok(text("Block parsed successfully", StatusCode::OK))
        }
        Err(e) => {
            error!("Failed to parse block {}: {}", number, e);
            Ok(text(
                format!("Failed to parse block: {}", e),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Build the API routes over a shared store.
pub fn routes<S>(store: Arc<WatchStore<S>>) -> BoxedFilter<(Response,)>
where
    S: BlockSource + Send + Sync + 'static,
{
    let subscribe = warp::path!("subscribe")
        .and(warp::query::<AddressParam>())
        .and(with_store(store.clone()))
        .and_then(handle_subscribe::<S>);

    let transactions = warp::path!("transactions")
        .and(warp::query::<AddressParam>())
        .and(with_store(store.clone()))
        .and_then(handle_transactions::<S>);

    let current_block = warp::path!("current-block")
        .and(with_store(store.clone()))
        .and_then(handle_current_block::<S>);

    let parse_block = warp::path!("parse-block")
        .and(warp::query::<BlockParam>())
        .and(with_store(store))
        .and_then(handle_parse_block::<S>);

    let not_found = warp::any().map(|| text("Not Found", StatusCode::NOT_FOUND));

    subscribe
        .or(transactions)
        .unify()
        .or(current_block)
        .unify()
        .or(parse_block)
        .unify()
        .or(not_found)
        .unify()
        .boxed()
}
