//! Cortex API access
//!
//! The catalog core never talks to the network directly. Every call goes
//! through a [`Transport`], which performs one authenticated GET and hands back
//! the raw status and body. [`HttpTransport`] is the production implementation
//! (ureq, sync, bearer auth, bounded retry); [`ScriptedTransport`] replays canned
//! responses for tests and offline runs.

mod client;
mod context;
mod scripted;
mod transport;

pub use client::{HttpTransport, RetryPolicy};
pub use context::{CancellationToken, QueryContext};
pub use scripted::ScriptedTransport;
pub use transport::{ApiRequest, ApiResponse, Transport};

use thiserror::Error;

/// Errors that can occur while listing catalog data
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP status. `status` is the full status line, e.g. `500 Internal Server Error`.
    #[error("error from cortex API {status}: {body}")]
    Status { status: String, body: String },

    #[error("request to cortex API failed: {message}")]
    Transport { message: String },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing API key: set {env_var} or api_key in the config file")]
    MissingApiKey { env_var: String },

    #[error("query cancelled")]
    Cancelled,

    #[error("query deadline exceeded")]
    DeadlineExceeded,
}

impl ApiError {
    /// HTTP status code for `Status` errors
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => status
                .split_whitespace()
                .next()
                .and_then(|code| code.parse().ok()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: "500 Internal Server Error".to_string(),
            body: "{\"details\": \"fake error on page 0\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "error from cortex API 500 Internal Server Error: {\"details\": \"fake error on page 0\"}"
        );
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn test_status_code_only_for_status_errors() {
        assert_eq!(ApiError::Cancelled.status_code(), None);
        let err = ApiError::Transport {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status_code(), None);
    }
}
