//! Error types for GraphQL operations.

use thiserror::Error;

/// A remote operation failed.
///
/// The display text is what ends up after the error marker in the
/// operation log, so variants that carry a server or transport message
/// render it unadorned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Connection-level failure (DNS, refused, reset).
    #[error("{0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Server answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Server answered with a GraphQL `errors` array.
    #[error("{0}")]
    GraphQL(String),

    /// Response body is not a GraphQL response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// WebSocket transport failure.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// Peer violated the graphql-transport-ws protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Subscription ended by the server.
    #[error("subscription closed by server")]
    Closed,

    /// The operation task panicked.
    #[error("operation panicked: {0}")]
    Panicked(String),
}

impl ClientError {
    /// Classify a reqwest error.
    pub fn from_reqwest(e: reqwest::Error, timeout_seconds: Option<u64>) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(timeout_seconds.unwrap_or_default())
        } else if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl ClientError {
    /// Wrap a caught panic payload.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        ClientError::Panicked(message)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::WebSocket(e.to_string())
    }
}
