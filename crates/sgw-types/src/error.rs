use std::time::Duration;

use thiserror::Error;

/// Errors produced along the request path.
///
/// Nodes, the pool, and the routing services all speak this type so that
/// an error raised by a node reaches the transport with its kind intact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The identifier fails the format check. Raised before any I/O.
    #[error("{0} not valid")]
    NotValid(String),

    /// The backend reports the key absent.
    #[error("{0} not found")]
    NotFound(String),

    /// The ring is empty or the selected node is offline.
    #[error("{0} not available")]
    NotAvailable(String),

    /// The caller's deadline expired while waiting on discovery or a node.
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: String,
        elapsed: Duration,
    },

    /// Anything else: unexpected backend errors, malformed responses.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn object_id_not_valid() -> Self {
        Self::NotValid("object ID".into())
    }

    pub fn object_not_found() -> Self {
        Self::NotFound("object".into())
    }

    pub fn storage_not_available() -> Self {
        Self::NotAvailable("object storage".into())
    }

    pub fn timeout(operation: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => Self::timeout("I/O", Duration::ZERO),
            _ => Self::Internal(err.to_string()),
        }
    }
}

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
