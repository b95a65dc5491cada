//! Error types for the Kafka Connect client.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Result type for Kafka Connect operations.
pub type ConnectResult<T> = Result<T, ConnectError>;

/// Transport failure information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportErrorInfo {
    /// Error message.
    pub message: String,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
}

impl From<reqwest::Error> for TransportErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

/// Errors raised by Kafka Connect operations.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    /// The request never produced an HTTP response (DNS, refused, TLS, timeout).
    #[error("transport error: {}", .0.message)]
    Transport(TransportErrorInfo),

    /// Basic-auth string without a `:` separator.
    #[error("Invalid auth string. Expected a colon-delimited string of `username` and `password`.")]
    InvalidAuth,

    /// Base endpoint that cannot carry request paths.
    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Connector name pattern that does not compile.
    #[error("invalid connector pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// 409 on a path where the cluster documents it as fatal (restart).
    #[error("rebalance in progress (409): {text}")]
    Conflict {
        /// Raw response text.
        text: String,
    },

    /// 404 on the restart path.
    #[error("connector not found (404): {text}")]
    NotFound {
        /// Raw response text.
        text: String,
    },

    /// 500 on the restart path: the coordinator timed out forwarding it.
    #[error("restart request timed out (500): {text}")]
    ServerTimeout {
        /// Raw response text.
        text: String,
    },

    /// Any other non-2xx status.
    #[error("HTTP status {status}: {text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response text.
        text: String,
    },

    /// 2xx response whose body does not have the shape the operation needs.
    #[error("unexpected response for {operation}: {message}")]
    UnexpectedResponse {
        /// Operation name.
        operation: &'static str,
        /// Details.
        message: String,
    },
}

impl From<reqwest::Error> for ConnectError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(TransportErrorInfo::from(err))
    }
}

impl ConnectError {
    /// HTTP status reported by the cluster, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Conflict { .. } => Some(409),
            Self::NotFound { .. } => Some(404),
            Self::ServerTimeout { .. } => Some(500),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when no HTTP response was received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Raw response text for cluster-reported errors.
    #[must_use]
    pub fn response_text(&self) -> Option<&str> {
        match self {
            Self::Conflict { text }
            | Self::NotFound { text }
            | Self::ServerTimeout { text }
            | Self::Status { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Short machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::InvalidAuth => "invalid_auth",
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
            Self::InvalidPattern(_) => "invalid_pattern",
            Self::Conflict { .. } => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::ServerTimeout { .. } => "server_timeout",
            Self::Status { .. } => "http_status",
            Self::UnexpectedResponse { .. } => "unexpected_response",
        }
    }

    /// Structured rendering for report output.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Some(status) = self.status() {
            value["status"] = json!(status);
        }
        if let Some(text) = self.response_text() {
            value["body"] = serde_json::from_str(text).unwrap_or_else(|_| json!(text));
        }
        value
    }
}
