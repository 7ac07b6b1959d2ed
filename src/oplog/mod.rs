//! Operation log store
//!
//! Keeps a bounded, newest-first log of observed GraphQL operations together
//! with the most recent ping value. The store is owned by the monitor loop
//! and mutated only from there.

mod state;
pub mod types;

pub use state::{OperationOutcome, PingState};
pub use types::{error_payload, OperationKind, OperationLogEntry, ERROR_MARKER};

use std::collections::VecDeque;

/// Default number of entries kept in the log
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded log of operation entries, newest first
#[derive(Debug, Clone)]
pub struct OperationLog {
    entries: VecDeque<OperationLogEntry>,
    capacity: usize,
}

impl OperationLog {
    /// Creates an empty log holding at most [`DEFAULT_CAPACITY`] entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty log with the given capacity (clamped to at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a new entry at the front of the log, evicting the oldest
    /// entry once the capacity is exceeded.
    pub fn record(
        &mut self,
        kind: OperationKind,
        name: impl Into<String>,
        payload: Option<String>,
    ) -> &OperationLogEntry {
        self.push(OperationLogEntry::new(kind, name, payload))
    }

    /// Inserts a pre-built entry at the front of the log.
    pub fn push(&mut self, entry: OperationLogEntry) -> &OperationLogEntry {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    /// Entries in insertion order, newest first
    pub fn entries(&self) -> impl Iterator<Item = &OperationLogEntry> {
        self.entries.iter()
    }

    /// Most recently recorded entry
    pub fn latest(&self) -> Option<&OperationLogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new()
    }
}
