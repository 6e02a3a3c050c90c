//! Failure taxonomy for calls to the upstream completion service.

use thiserror::Error;

/// Anything that can go wrong between sending a request and receiving the
/// final byte of its response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("could not connect to inference API: {0}")]
    Connect(String),

    #[error("inference request failed: {0}")]
    Transport(String),

    #[error("inference API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed inference response: {0}")]
    Decode(String),

    #[error("inference response contained no choices")]
    EmptyResponse,

    #[error("stream interrupted: {0}")]
    Stream(String),
}

impl InferenceError {
    /// Short, user-presentable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "Timeout",
            Self::Connect(_) => "ConnectionError",
            Self::Transport(_) => "TransportError",
            Self::Status { .. } => "UpstreamStatusError",
            Self::Decode(_) => "MalformedResponse",
            Self::EmptyResponse => "EmptyResponse",
            Self::Stream(_) => "StreamError",
        }
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
