//! Configuration module for pingmon
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PINGMON_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use pingmon::config::PingmonConfig;
//!
//! let config = PingmonConfig::default();
//! assert_eq!(config.endpoint.http_url, "http://localhost:8080/query");
//!
//! let toml = r#"
//! [scheduler]
//! max_delay_ms = 5000
//! "#;
//! let config: PingmonConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.scheduler.max_delay_ms, 5000);
//! assert_eq!(config.scheduler.min_delay_ms, 1000);
//! ```

pub mod endpoint;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod scheduler;

pub use endpoint::EndpointConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use monitor::MonitorConfig;
pub use scheduler::SchedulerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for pingmon.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PingmonConfig {
    /// Ping service location
    pub endpoint: EndpointConfig,
    /// Randomized mutation trigger
    pub scheduler: SchedulerConfig,
    /// Operation log and event sources
    pub monitor: MonitorConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl PingmonConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored (previous values are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("PINGMON_ENDPOINT") {
            self.endpoint.http_url = url;
        }
        if let Ok(url) = std::env::var("PINGMON_WS_ENDPOINT") {
            self.endpoint.ws_url = Some(url);
        }

        if let Ok(level) = std::env::var("PINGMON_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PINGMON_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(scheduler) = std::env::var("PINGMON_SCHEDULER") {
            match scheduler.to_lowercase().as_str() {
                "true" => self.scheduler.enabled = true,
                "false" => self.scheduler.enabled = false,
                _ => {}
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(
            "endpoint.http_url",
            &self.endpoint.http_url,
            &["http", "https"],
        )?;
        if let Some(ref ws_url) = self.endpoint.ws_url {
            validate_url("endpoint.ws_url", ws_url, &["ws", "wss"])?;
        }
        if self.endpoint.timeout_seconds == Some(0) {
            return Err(ConfigError::validation(
                "endpoint.timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        if self.scheduler.min_delay_ms >= self.scheduler.max_delay_ms {
            return Err(ConfigError::validation(
                "scheduler.min_delay_ms",
                format!(
                    "must be less than max_delay_ms ({} >= {})",
                    self.scheduler.min_delay_ms, self.scheduler.max_delay_ms
                ),
            ));
        }

        if self.monitor.capacity == 0 {
            return Err(ConfigError::validation(
                "monitor.capacity",
                "capacity must be at least 1",
            ));
        }

        self.logging.validate()
    }
}

fn validate_url(field: &str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::validation(field, "URL cannot be empty"));
    }
    let url =
        reqwest::Url::parse(value).map_err(|e| ConfigError::validation(field, e.to_string()))?;
    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::validation(
            field,
            format!("unsupported scheme '{}', expected one of {:?}", url.scheme(), schemes),
        ));
    }
    Ok(())
}
