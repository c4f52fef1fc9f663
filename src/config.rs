//! Configuration and watchlist loading
//!
//! Settings come from command-line flags with environment fallbacks. The
//! optional watchlist file holds one address per line.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public endpoint used when neither `--rpc-url` nor `ETH_URL` is given.
pub const DEFAULT_RPC_URL: &str = "https://cloudflare-eth.com";

/// Ethereum address transaction watcher
#[derive(Debug, Clone, Parser)]
#[command(name = "txwatch")]
#[command(about = "Record transactions touching subscribed addresses, one parsed block at a time")]
pub struct Config {
    /// JSON-RPC endpoint URL
    #[arg(long, env = "ETH_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Address the HTTP API listens on
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Timeout for each RPC request, in seconds
    #[arg(long, env = "RPC_TIMEOUT_SECS", default_value_t = 5)]
    pub rpc_timeout_secs: u64,

    /// Path to a watchlist file to subscribe at startup (one address per line)
    #[arg(short, long, env = "WATCHLIST")]
    pub watchlist: Option<PathBuf>,
}

impl Config {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

/// Load a watchlist from a file.
///
/// Each line holds one address, kept exactly as written apart from
/// surrounding whitespace. Empty lines and lines starting with '#' are ignored.
///
/// # Example file format:
/// ```text
/// 0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb
/// # exchange hot wallet
/// 0xdAC17F958D2ee523a2206206994597C13D831ec7
/// ```
pub fn load_watchlist(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read watchlist file: {:?}", path))?;

    let addresses: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if addresses.is_empty() {
        anyhow::bail!("Watchlist is empty (no addresses found in {:?})", path);
    }

    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_watchlist() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0x0742d35Cc6634C0532925a3b844Bc9e7595f0bEb").unwrap();
        writeln!(file, "# This is a comment").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  0xdAC17F958D2ee523a2206206994597C13D831ec7  ").unwrap();
        file.flush().unwrap();

        let addresses = load_watchlist(file.path()).unwrap();
        assert_eq!(
            addresses,
            vec![
                "0x0742d35Cc6634C0532925a3b844Bc9e7595f0bEb",
                "0xdAC17F958D2ee523a2206206994597C13D831ec7",
            ]
        );
    }

    #[test]
    fn test_load_watchlist_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# only comments").unwrap();
        file.flush().unwrap();

        assert!(load_watchlist(file.path()).is_err());
    }

    #[test]
    fn test_load_watchlist_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_watchlist(&dir.path().join("nope.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read watchlist file"));
    }

    #[test]
    fn test_config_flags() {
        let config = Config::try_parse_from([
            "txwatch",
            "--rpc-url",
            "http://127.0.0.1:8545",
            "--listen",
            "127.0.0.1:9000",
            "--rpc-timeout-secs",
            "2",
            "--watchlist",
            "watchlist.txt",
        ])
        .unwrap();

        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.listen, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.rpc_timeout(), Duration::from_secs(2));
        assert_eq!(config.watchlist, Some(PathBuf::from("watchlist.txt")));
    }

    #[test]
    fn test_config_rejects_bad_listen_addr() {
        assert!(Config::try_parse_from(["txwatch", "--listen", "not-an-addr"]).is_err());
    }
}
