//! Ethereum address watcher binary
//!
//! Serves the subscription API and parses blocks on request.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use txwatch::api;
use txwatch::config::{load_watchlist, Config};
use txwatch::{RpcClient, WatchStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::parse();

    info!("Starting Ethereum address watcher");

    let rpc = RpcClient::new(config.rpc_url.clone(), config.rpc_timeout())
        .context("Failed to build RPC client")?;
    info!("RPC URL: {} (timeout {:?})", rpc.url(), config.rpc_timeout());
    let store = Arc::new(WatchStore::new(rpc));

    if let Some(path) = &config.watchlist {
        let addresses = load_watchlist(path).context("Failed to load watchlist")?;
        let added = store.subscribe_all(addresses);
        info!("Subscribed to {} addresses from {:?}", added, path);
    }
    info!("Watching {} addresses", store.subscriptions());

    let (addr, server) = warp::serve(api::routes(store))
        .try_bind_with_graceful_shutdown(config.listen, shutdown_signal())
        .with_context(|| format!("Could not listen on {}", config.listen))?;

    info!("Server is listening on {}", addr);
    server.await;
    info!("Server gracefully stopped");

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down server..."),
        _ = terminate => info!("Received SIGTERM, shutting down server..."),
    }
}
