//! GraphQL client for the ping service.
//!
//! Queries and mutations are sent as HTTP POST requests; the subscription
//! runs over a WebSocket speaking the `graphql-transport-ws` protocol.
//! [`PingBackend`] is the seam the monitor talks to, so tests can swap in
//! an in-process backend.

mod client;
pub mod error;
pub mod operations;
pub mod protocol;
mod subscription;

pub use client::GraphQLClient;
pub use error::ClientError;
pub use operations::OperationRequest;

pub use crate::oplog::OperationOutcome;

use crate::oplog::OperationKind;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;

/// Stream of ping values pushed by a live subscription
pub type PingStream = BoxStream<'static, OperationOutcome>;

/// Remote ping service as seen by the monitor.
///
/// All methods are cancellation-safe: dropping the future abandons the
/// in-flight request.
#[async_trait]
pub trait PingBackend: Send + Sync + 'static {
    /// Run the `GetLastPing` query.
    async fn get_last_ping(&self) -> OperationOutcome;

    /// Run the `TriggerPing` mutation.
    async fn trigger_ping(&self) -> OperationOutcome;

    /// Open the `PingSubscription` stream.
    ///
    /// Returns once the subscription is established; each item is one
    /// server push. The stream ends after the first error or when the
    /// server completes the subscription.
    async fn subscribe(&self) -> Result<PingStream, ClientError>;

    /// Run a single operation of the given kind. For subscriptions this
    /// waits for the first push and then drops the subscription
    /// (`pingmon next`).
    async fn execute(&self, kind: OperationKind) -> OperationOutcome {
        match kind {
            OperationKind::Query => self.get_last_ping().await,
            OperationKind::Mutation => self.trigger_ping().await,
            OperationKind::Subscription => {
                let mut stream = self.subscribe().await?;
                stream.next().await.unwrap_or(Err(ClientError::Closed))
            }
        }
    }
}
