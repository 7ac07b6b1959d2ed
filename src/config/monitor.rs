//! Monitor configuration

use crate::oplog::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Operation log and event source settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Maximum number of log entries kept
    pub capacity: usize,
    /// Run the initial `GetLastPing` query
    pub initial_query: bool,
    /// Listen on `PingSubscription`
    pub subscription: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            initial_query: true,
            subscription: true,
        }
    }
}
