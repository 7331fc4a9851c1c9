//! Error types for the WiGLE client.

use reqwest::StatusCode;
use thiserror::Error;

use nodes::NodeError;

/// A request the WiGLE API answered with a non-success status.
///
/// `Display` is the fixed message shown to workflow users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400
    #[error("Request error.")]
    BadRequest,

    /// 402, commercial queries need a paid balance.
    #[error("Insufficient balance for commercial query.")]
    InsufficientBalance,

    /// 410
    #[error("Query Failed.")]
    QueryFailed,

    /// 429, the daily query quota is used up.
    #[error("Too many queries today.")]
    RateLimited,

    /// Any other non-success status.
    #[error("Unknown error occurred.")]
    Unexpected { status: u16 },
}

impl ApiError {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest,
            402 => Self::InsufficientBalance,
            410 => Self::QueryFailed,
            429 => Self::RateLimited,
            status => Self::Unexpected { status },
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::InsufficientBalance => 402,
            Self::QueryFailed => 410,
            Self::RateLimited => 429,
            Self::Unexpected { status } => *status,
        }
    }
}

/// Top-level error type for the `wigle` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered, but not with success.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response at all: connection refused, DNS failure, timeout.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with success but the body was not valid JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The key cannot be sent as an HTTP header value.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

impl Error {
    /// Error text without this crate's category prefix.
    ///
    /// Connection tests echo the underlying failure as is.
    pub fn raw_message(&self) -> String {
        match self {
            Self::Transport(e) | Self::Client(e) => e.to_string(),
            Self::Decode(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<Error> for NodeError {
    fn from(err: Error) -> Self {
        NodeError::Operation(err.to_string())
    }
}
