//! Monitor state: operation log plus last ping value

use super::types::{error_payload, OperationKind, OperationLogEntry};
use super::OperationLog;
use crate::graphql::ClientError;

/// Result of one completed remote operation: a ping value (possibly absent)
/// or the failure that ended it.
pub type OperationOutcome = Result<Option<String>, ClientError>;

/// State rendered by the monitor
#[derive(Debug, Clone, Default)]
pub struct PingState {
    log: OperationLog,
    last_ping: Option<String>,
}

impl PingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            log: OperationLog::with_capacity(capacity),
            last_ping: None,
        }
    }

    /// Record an operation in the log.
    pub fn record(
        &mut self,
        kind: OperationKind,
        name: impl Into<String>,
        payload: Option<String>,
    ) -> &OperationLogEntry {
        self.log.record(kind, name, payload)
    }

    /// Overwrite the last ping value. The string is not validated.
    pub fn set_last_ping(&mut self, value: impl Into<String>) {
        self.last_ping = Some(value.into());
    }

    /// Apply a completion from one of the three event sources.
    ///
    /// A ping value updates the last ping and is logged; a failure is logged
    /// with the error marker and leaves the last ping untouched. A successful
    /// response without a ping records nothing. Returns the new entry, if any.
    pub fn apply(
        &mut self,
        kind: OperationKind,
        outcome: OperationOutcome,
    ) -> Option<&OperationLogEntry> {
        match outcome {
            Ok(Some(ping)) => {
                self.set_last_ping(ping.clone());
                Some(self.log.record(kind, kind.operation_name(), Some(ping)))
            }
            Ok(None) => {
                tracing::debug!(kind = %kind, "Operation completed without a ping value");
                None
            }
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Operation failed");
                Some(
                    self.log
                        .record(kind, kind.operation_name(), Some(error_payload(&e))),
                )
            }
        }
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn last_ping(&self) -> Option<&str> {
        self.last_ping.as_deref()
    }
}
