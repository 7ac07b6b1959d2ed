//! GraphQL documents for the ping service.

use crate::oplog::OperationKind;
use serde::Serialize;

pub const GET_LAST_PING: &str = "query GetLastPing {\n  ping\n}";

pub const TRIGGER_PING: &str = "mutation TriggerPing {\n  ping\n}";

pub const PING_SUBSCRIPTION: &str = "subscription PingSubscription {\n  ping\n}";

/// Request body for one operation, shared by HTTP and WebSocket transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub query: &'static str,
    pub operation_name: &'static str,
}

impl OperationRequest {
    pub fn for_kind(kind: OperationKind) -> Self {
        let query = match kind {
            OperationKind::Query => GET_LAST_PING,
            OperationKind::Mutation => TRIGGER_PING,
            OperationKind::Subscription => PING_SUBSCRIPTION,
        };
        Self {
            query,
            operation_name: kind.operation_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_name_their_operation() {
        for kind in [
            OperationKind::Query,
            OperationKind::Mutation,
            OperationKind::Subscription,
        ] {
            let req = OperationRequest::for_kind(kind);
            assert!(req.query.starts_with(&kind.to_string()));
            assert!(req.query.contains(req.operation_name));
            assert!(req.query.contains("ping"));
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body =
            serde_json::to_value(OperationRequest::for_kind(OperationKind::Mutation)).unwrap();
        assert_eq!(body["operationName"], "TriggerPing");
        assert_eq!(body["query"], TRIGGER_PING);
    }
}
