//! Error types for the GreenRoute client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole client.
///
/// Variants follow the failure taxonomy the route workflow relies on:
/// validation failures never reach the network, transport failures and
/// server rejections are surfaced verbatim after a single attempt, and the
/// storage/serialization variants cover the local session file.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RouteError {
    /// Bad input shape, rejected before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server accepted the request but omitted required fields.
    #[error("Incomplete server response: missing {}", .missing.join(", "))]
    IncompleteServerResponse { missing: Vec<String> },

    /// Connection or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured bound.
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Non-success HTTP status with a server supplied message.
    #[error("Server rejected request ({status}): {message}")]
    ServerRejection { status: u16, message: String },

    /// Success status, but the body could not be understood.
    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    /// An operation needed a session and none is stored.
    #[error("No active session")]
    NoActiveSession,

    /// The route already reached its terminal state.
    #[error("Route already complete")]
    RouteAlreadyComplete,

    /// The stored session's protocol has no such operation.
    #[error("'{operation}' is not supported by the {protocol} protocol")]
    UnsupportedOperation { operation: String, protocol: String },

    /// Local persistence failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RouteError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an IncompleteServerResponse error from the missing field names
    pub fn incomplete<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::IncompleteServerResponse {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Timeout error
    pub fn timeout(operation: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds,
        }
    }

    /// Creates a ServerRejection error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ServerRejection {
            status,
            message: message.into(),
        }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates an UnsupportedOperation error
    pub fn unsupported(operation: impl Into<String>, protocol: impl ToString) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            protocol: protocol.to_string(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True for failures that happened on the way to or from the server:
    /// transport errors, timeouts, rejections and unreadable bodies.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Timeout { .. }
                | Self::ServerRejection { .. }
                | Self::MalformedResponse(_)
                | Self::IncompleteServerResponse { .. }
        )
    }

    /// Check if this error reports the terminal route state
    pub fn is_route_complete(&self) -> bool {
        matches!(self, Self::RouteAlreadyComplete)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RouteError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RouteError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for RouteError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for RouteError {
    fn from(err: version_migrate::MigrationError) -> Self {
        Self::Serialization {
            format: "migration".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RouteError>`.
pub type Result<T> = std::result::Result<T, RouteError>;
