//! Ping scheduler configuration

use serde::{Deserialize, Serialize};

/// Randomized trigger interval for the `TriggerPing` mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Inclusive lower bound of the delay between triggers
    pub min_delay_ms: u64,
    /// Exclusive upper bound of the delay between triggers
    pub max_delay_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}
