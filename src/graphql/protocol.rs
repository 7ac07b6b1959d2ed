//! Wire types: GraphQL responses and graphql-transport-ws messages.

use super::error::ClientError;
use super::operations::OperationRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// WebSocket subprotocol spoken for subscriptions
pub const GRAPHQL_TRANSPORT_WS: &str = "graphql-transport-ws";

/// `data` object shared by all three ping operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PingData {
    #[serde(default)]
    pub ping: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQLErrorItem {
    pub message: String,
}

/// Standard GraphQL response envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<PingData>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLErrorItem>>,
}

impl GraphQLResponse {
    /// Resolve to the ping value, or the joined error messages when the
    /// server reported any.
    pub fn into_ping(self) -> Result<Option<String>, ClientError> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            return Err(join_errors(&errors));
        }
        Ok(self.data.and_then(|d| d.ping))
    }
}

pub(crate) fn join_errors(errors: &[GraphQLErrorItem]) -> ClientError {
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    ClientError::GraphQL(message)
}

/// Messages sent by the client over graphql-transport-ws
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ConnectionInit {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Ping {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Pong {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Subscribe {
        id: String,
        payload: OperationRequest,
    },
    Complete {
        id: String,
    },
}

/// Messages received from the server over graphql-transport-ws
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionAck {
        #[serde(default)]
        payload: Option<Value>,
    },
    Ping {
        #[serde(default)]
        payload: Option<Value>,
    },
    Pong {
        #[serde(default)]
        payload: Option<Value>,
    },
    Next {
        id: String,
        payload: GraphQLResponse,
    },
    Error {
        id: String,
        payload: Vec<GraphQLErrorItem>,
    },
    Complete {
        id: String,
    },
}
