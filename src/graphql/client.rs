//! HTTP + WebSocket implementation of [`PingBackend`].

use super::error::ClientError;
use super::operations::OperationRequest;
use super::protocol::{join_errors, GraphQLResponse};
use super::{subscription, OperationOutcome, PingBackend, PingStream};
use crate::config::EndpointConfig;
use crate::oplog::OperationKind;
use async_trait::async_trait;
use std::time::Duration;

/// Client for a GraphQL ping service
#[derive(Debug, Clone)]
pub struct GraphQLClient {
    client: reqwest::Client,
    http_url: String,
    ws_url: String,
    timeout_seconds: Option<u64>,
}

impl GraphQLClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &EndpointConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a client with a custom HTTP client (for testing).
    pub fn with_client(config: &EndpointConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            http_url: config.http_url.clone(),
            ws_url: config.ws_url(),
            timeout_seconds: config.timeout_seconds,
        }
    }

    pub fn http_url(&self) -> &str {
        &self.http_url
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// POST one operation and resolve its ping value.
    async fn post_operation(&self, kind: OperationKind) -> OperationOutcome {
        let request = OperationRequest::for_kind(kind);
        tracing::debug!(
            operation = request.operation_name,
            url = %self.http_url,
            "Sending GraphQL request"
        );

        let response = self
            .client
            .post(&self.http_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout_seconds))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout_seconds))?;

        if !status.is_success() {
            // Servers may report validation failures as non-2xx with a
            // regular GraphQL error body.
            if let Ok(GraphQLResponse {
                errors: Some(errors),
                ..
            }) = serde_json::from_str::<GraphQLResponse>(&body)
            {
                if !errors.is_empty() {
                    return Err(join_errors(&errors));
                }
            }
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let parsed: GraphQLResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        parsed.into_ping()
    }
}

#[async_trait]
impl PingBackend for GraphQLClient {
    async fn get_last_ping(&self) -> OperationOutcome {
        self.post_operation(OperationKind::Query).await
    }

    async fn trigger_ping(&self) -> OperationOutcome {
        self.post_operation(OperationKind::Mutation).await
    }

    async fn subscribe(&self) -> Result<PingStream, ClientError> {
        subscription::subscribe(&self.ws_url).await
    }
}
