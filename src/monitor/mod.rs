//! Ping monitor event loop.
//!
//! Three independent event sources feed one sink:
//! - the `GetLastPing` query, issued once at start
//! - `TriggerPing` mutations, issued by the [`PingScheduler`]
//! - the `PingSubscription` stream
//!
//! Each source runs on its own task and reports completions over a channel.
//! The loop owns the [`PingState`] and is the only place it is mutated, so
//! entries land in the order completions arrive.

use crate::config::PingmonConfig;
use crate::graphql::{ClientError, PingBackend};
use crate::oplog::{OperationKind, OperationOutcome, PingState};
use crate::scheduler::PingScheduler;
use futures_util::{FutureExt, StreamExt};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Completion of one remote operation
#[derive(Debug)]
pub struct OperationEvent {
    pub kind: OperationKind,
    pub outcome: OperationOutcome,
}

/// Receives the state after every change.
pub trait Render {
    fn render(&mut self, state: &PingState);
}

impl<F> Render for F
where
    F: FnMut(&PingState),
{
    fn render(&mut self, state: &PingState) {
        self(state)
    }
}

/// Wires the event sources to the operation log.
pub struct Monitor {
    backend: Arc<dyn PingBackend>,
    capacity: usize,
    initial_query: bool,
    subscription: bool,
    scheduler: Option<PingScheduler>,
}

impl Monitor {
    pub fn new(backend: Arc<dyn PingBackend>, config: &PingmonConfig) -> Self {
        let scheduler = config
            .scheduler
            .enabled
            .then(|| PingScheduler::new(&config.scheduler));
        Self {
            backend,
            capacity: config.monitor.capacity,
            initial_query: config.monitor.initial_query,
            subscription: config.monitor.subscription,
            scheduler,
        }
    }

    /// Replace the scheduler (for seeded tests), or disable it with `None`.
    pub fn with_scheduler(mut self, scheduler: Option<PingScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Run until `cancel` fires and return the final state.
    ///
    /// On shutdown the scheduler is stopped and in-flight operations are
    /// abandoned; completions that still arrive are dropped.
    pub async fn run<R: Render>(self, mut renderer: R, cancel: CancellationToken) -> PingState {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = PingState::with_capacity(self.capacity);
        renderer.render(&state);

        if self.initial_query {
            spawn_operation(
                Arc::clone(&self.backend),
                OperationKind::Query,
                tx.clone(),
                cancel.clone(),
            );
        }

        let subscription = self.subscription.then(|| {
            spawn_subscription(Arc::clone(&self.backend), tx.clone(), cancel.clone())
        });

        let scheduler = self.scheduler.map(|scheduler| {
            let backend = Arc::clone(&self.backend);
            let tx = tx.clone();
            let op_cancel = cancel.clone();
            scheduler.start(
                move || {
                    spawn_operation(
                        Arc::clone(&backend),
                        OperationKind::Mutation,
                        tx.clone(),
                        op_cancel.clone(),
                    );
                },
                cancel.clone(),
            )
        });
        drop(tx);

        tracing::info!("Monitor started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = rx.recv() => match event {
                    Some(OperationEvent { kind, outcome }) => {
                        if let Some(entry) = state.apply(kind, outcome) {
                            tracing::debug!(
                                kind = %entry.kind,
                                id = %entry.id,
                                error = entry.is_error(),
                                "Recorded operation"
                            );
                            renderer.render(&state);
                        }
                    }
                    None => {
                        // Every source has finished; keep the view up until shutdown.
                        cancel.cancelled().await;
                        break;
                    }
                }
            }
        }

        rx.close();
        if let Some(handle) = scheduler {
            handle.join().await;
        }
        if let Some(handle) = subscription {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Subscription task failed");
            }
        }

        tracing::info!(entries = state.log().len(), "Monitor stopped");
        state
    }
}

/// Issue one operation on its own task and report the completion.
fn spawn_operation(
    backend: Arc<dyn PingBackend>,
    kind: OperationKind,
    tx: mpsc::UnboundedSender<OperationEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(kind = %kind, "Abandoning in-flight operation");
                return;
            }
            outcome = catch_panic(backend.execute(kind)) => outcome,
        };

        if tx.send(OperationEvent { kind, outcome }).is_err() {
            tracing::debug!(kind = %kind, "Monitor stopped, discarding completion");
        }
    })
}

/// Forward subscription pushes until the stream ends, fails or shutdown.
/// The subscription is not re-established after it ends.
fn spawn_subscription(
    backend: Arc<dyn PingBackend>,
    tx: mpsc::UnboundedSender<OperationEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let kind = OperationKind::Subscription;
    tokio::spawn(async move {
        let subscribed = tokio::select! {
            _ = cancel.cancelled() => return,
            subscribed = catch_panic(backend.subscribe()) => subscribed,
        };

        let mut stream = match subscribed {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to open ping subscription");
                let _ = tx.send(OperationEvent {
                    kind,
                    outcome: Err(e),
                });
                return;
            }
        };

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                item = AssertUnwindSafe(stream.next()).catch_unwind() => match item {
                    Ok(Some(outcome)) => {
                        let failed = outcome.is_err();
                        if tx.send(OperationEvent { kind, outcome }).is_err() || failed {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Ping subscription ended");
                        break;
                    }
                    Err(panic) => {
                        let _ = tx.send(OperationEvent {
                            kind,
                            outcome: Err(ClientError::from_panic(&*panic)),
                        });
                        break;
                    }
                }
            }
        }
    })
}

/// Await a remote call, reporting a panic as a failed operation.
async fn catch_panic<T>(
    call: impl Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    AssertUnwindSafe(call)
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ClientError::from_panic(&*panic)))
}
