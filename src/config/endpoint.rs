//! Ping service endpoint configuration

use serde::{Deserialize, Serialize};

/// Default GraphQL endpoint of the ping service
pub const DEFAULT_HTTP_URL: &str = "http://localhost:8080/query";

/// Where the ping service lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointConfig {
    /// URL for queries and mutations (HTTP POST)
    pub http_url: String,
    /// URL for subscriptions; derived from `http_url` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_url: Option<String>,
    /// Per-request timeout. Unset means requests may pend indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl EndpointConfig {
    /// WebSocket URL for subscriptions.
    ///
    /// Falls back to `http_url` with the scheme swapped (`http` to `ws`,
    /// `https` to `wss`).
    pub fn ws_url(&self) -> String {
        if let Some(ref url) = self.ws_url {
            return url.clone();
        }
        if let Some(rest) = self.http_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.http_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.http_url.clone()
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            http_url: DEFAULT_HTTP_URL.to_string(),
            ws_url: None,
            timeout_seconds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults() {
        let config = EndpointConfig::default();
        assert_eq!(config.http_url, "http://localhost:8080/query");
        assert_eq!(config.ws_url(), "ws://localhost:8080/query");
        assert!(config.timeout_seconds.is_none());
    }

    #[test]
    fn test_ws_url_from_https() {
        let config = EndpointConfig {
            http_url: "https://example.com/graphql".to_string(),
            ..Default::default()
        };
        assert_eq!(config.ws_url(), "wss://example.com/graphql");
    }

    #[test]
    fn test_explicit_ws_url_wins() {
        let config = EndpointConfig {
            ws_url: Some("ws://other:9000/subscriptions".to_string()),
            ..Default::default()
        };
        assert_eq!(config.ws_url(), "ws://other:9000/subscriptions");
    }
}
