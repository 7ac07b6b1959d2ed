//! Type definitions for the operation log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix that marks a payload as a failure message rather than a ping value.
pub const ERROR_MARKER: &str = "Error: ";

/// Kind of GraphQL operation that produced a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Operation name used at the call site for this kind.
    pub fn operation_name(self) -> &'static str {
        match self {
            OperationKind::Query => "GetLastPing",
            OperationKind::Mutation => "TriggerPing",
            OperationKind::Subscription => "PingSubscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        };
        f.write_str(s)
    }
}

/// One observed client-server interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationLogEntry {
    /// `<unix millis>-<random hex>`, unique on a best-effort basis
    pub id: String,
    pub kind: OperationKind,
    pub name: String,
    pub observed_at: DateTime<Utc>,
    /// Ping value, or [`ERROR_MARKER`] followed by the failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl OperationLogEntry {
    /// Build an entry stamped with the current time and a fresh id.
    pub fn new(kind: OperationKind, name: impl Into<String>, payload: Option<String>) -> Self {
        let observed_at = Utc::now();
        Self {
            id: generate_entry_id(observed_at),
            kind,
            name: name.into(),
            observed_at,
            payload,
        }
    }

    /// Returns true when the payload carries an error message.
    pub fn is_error(&self) -> bool {
        self.payload
            .as_deref()
            .is_some_and(|p| p.starts_with(ERROR_MARKER))
    }
}

/// Generate an entry id from a timestamp plus a random suffix.
pub fn generate_entry_id(at: DateTime<Utc>) -> String {
    format!("{}-{:08x}", at.timestamp_millis(), rand::random::<u32>())
}

/// Format a failure message as a log payload.
pub fn error_payload(message: impl fmt::Display) -> String {
    format!("{}{}", ERROR_MARKER, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_are_fixed_per_kind() {
        assert_eq!(OperationKind::Query.operation_name(), "GetLastPing");
        assert_eq!(OperationKind::Mutation.operation_name(), "TriggerPing");
        assert_eq!(
            OperationKind::Subscription.operation_name(),
            "PingSubscription"
        );
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&OperationKind::Subscription).unwrap();
        assert_eq!(json, "\"subscription\"");
        assert_eq!(OperationKind::Mutation.to_string(), "mutation");
    }

    #[test]
    fn test_entry_id_has_timestamp_prefix() {
        let entry = OperationLogEntry::new(OperationKind::Query, "GetLastPing", None);
        let (millis, suffix) = entry.id.split_once('-').unwrap();
        assert_eq!(
            millis.parse::<i64>().unwrap(),
            entry.observed_at.timestamp_millis()
        );
        assert_eq!(suffix.len(), 8);
    }

    #[test]
    fn test_entry_ids_differ() {
        let a = OperationLogEntry::new(OperationKind::Query, "GetLastPing", None);
        let b = OperationLogEntry::new(OperationKind::Query, "GetLastPing", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_error_payload_detection() {
        let ok = OperationLogEntry::new(
            OperationKind::Query,
            "GetLastPing",
            Some("2024-01-01T00:00:00.000Z".to_string()),
        );
        let err = OperationLogEntry::new(
            OperationKind::Query,
            "GetLastPing",
            Some(error_payload("network error")),
        );
        let empty = OperationLogEntry::new(OperationKind::Query, "GetLastPing", None);

        assert!(!ok.is_error());
        assert!(err.is_error());
        assert!(!empty.is_error());
        assert_eq!(err.payload.as_deref(), Some("Error: network error"));
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = OperationLogEntry::new(
            OperationKind::Mutation,
            "TriggerPing",
            Some("T1".to_string()),
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["kind"], "mutation");
        assert_eq!(value["name"], "TriggerPing");
        assert_eq!(value["payload"], "T1");
        assert!(value.get("observedAt").is_some());
    }
}
