//! Errors raised while fetching blocks from the JSON-RPC endpoint

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainFetchError>;

/// Failure to turn a block request into a decoded [`Block`](crate::types::Block).
///
/// Every variant is terminal for the call that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum ChainFetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("RPC error {}: {message}", display_code(.code))]
    Rpc { code: Option<i64>, message: String },
}

fn display_code(code: &Option<i64>) -> String {
    code.map_or_else(|| "?".to_string(), |c| c.to_string())
}

/// Coarse classification of a [`ChainFetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    Decode,
    Rpc,
}

impl ChainFetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Transport(_) => FetchErrorKind::Transport,
            Self::Decode(_) => FetchErrorKind::Decode,
            Self::Rpc { .. } => FetchErrorKind::Rpc,
        }
    }
}
