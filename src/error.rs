//! Error type shared by the backend client, the tool executor and the server.

use thiserror::Error;

use crate::mcp::types::{INTERNAL_ERROR, INVALID_PARAMS};

/// Everything that can go wrong while serving a single tool call.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Connection refused, timeout, or any other failure below HTTP.
    /// The request URL is stripped, since its query carries the token.
    #[error("backend request failed: {0}")]
    Transport(reqwest::Error),

    /// The backend answered with a status code >= 400.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// `/ping` answered, but not with the expected sentinel.
    #[error("unexpected ping response: {0}")]
    UnexpectedPing(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments failed to decode or validate.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        BridgeError::Transport(e.without_url())
    }
}

impl BridgeError {
    /// JSON-RPC error code to report for this failure.
    pub fn rpc_code(&self) -> i64 {
        match self {
            BridgeError::InvalidArguments(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
