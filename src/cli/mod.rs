//! CLI module for pingmon
//!
//! # Commands
//!
//! - `watch` - Run the live monitor (initial query, scheduled mutations, subscription)
//! - `query` - Run `GetLastPing` once
//! - `trigger` - Run `TriggerPing` once
//! - `next` - Wait for the next `PingSubscription` push
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch the default endpoint (http://localhost:8080/query)
//! pingmon watch
//!
//! # Emit one JSON line per operation for 30 seconds
//! pingmon watch --json --duration 30
//!
//! # Generate shell completions
//! pingmon completions bash > ~/.bash_completion.d/pingmon
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod ping;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::PingmonConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// pingmon - GraphQL ping monitor
#[derive(Parser, Debug)]
#[command(
    name = "pingmon",
    version,
    about = "Live monitor for a GraphQL ping service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the ping service and show the operation log
    Watch(WatchArgs),
    /// Fetch the last ping once (GetLastPing)
    Query(PingArgs),
    /// Trigger a ping once (TriggerPing)
    Trigger(PingArgs),
    /// Wait for the next pushed ping (PingSubscription)
    Next(PingArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that talks to the ping service
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "pingmon.toml")]
    pub config: PathBuf,

    /// GraphQL HTTP endpoint
    #[arg(short, long, env = "PINGMON_ENDPOINT")]
    pub endpoint: Option<String>,

    /// GraphQL WebSocket endpoint (defaults to the HTTP endpoint with ws://)
    #[arg(long, env = "PINGMON_WS_ENDPOINT")]
    pub ws_endpoint: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PINGMON_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl EndpointArgs {
    /// Load configuration and apply env and CLI overrides, in that order.
    pub fn load_config(&self) -> Result<PingmonConfig, Box<dyn std::error::Error>> {
        let mut config = load_config_file(&self.config)?.with_env_overrides();

        if let Some(ref endpoint) = self.endpoint {
            config.endpoint.http_url = endpoint.clone();
        }
        if let Some(ref ws_endpoint) = self.ws_endpoint {
            config.endpoint.ws_url = Some(ws_endpoint.clone());
        }
        if let Some(ref log_level) = self.log_level {
            config.logging.level = log_level.clone();
        }

        Ok(config)
    }
}

/// Load from file if it exists, otherwise use defaults
fn load_config_file(path: &Path) -> Result<PingmonConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(PingmonConfig::load(Some(path))?)
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        Ok(PingmonConfig::default())
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Do not listen on PingSubscription
    #[arg(long)]
    pub no_subscription: bool,

    /// Do not trigger TriggerPing mutations
    #[arg(long)]
    pub no_scheduler: bool,

    /// Stop after this many seconds
    #[arg(short, long)]
    pub duration: Option<u64>,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "pingmon.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_watch_defaults() {
        let cli = Cli::try_parse_from(["pingmon", "watch"]).unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(args.endpoint.config, PathBuf::from("pingmon.toml"));
                assert!(!args.endpoint.json);
                assert!(!args.no_subscription);
                assert!(!args.no_scheduler);
                assert!(args.duration.is_none());
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_watch_flags() {
        let cli = Cli::try_parse_from([
            "pingmon",
            "watch",
            "-e",
            "http://ping:8080/query",
            "--json",
            "--no-scheduler",
            "--duration",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(
                    args.endpoint.endpoint.as_deref(),
                    Some("http://ping:8080/query")
                );
                assert!(args.endpoint.json);
                assert!(args.no_scheduler);
                assert_eq!(args.duration, Some(5));
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_query_and_trigger() {
        let cli = Cli::try_parse_from(["pingmon", "query", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Query(ref a) if a.endpoint.json));

        let cli = Cli::try_parse_from(["pingmon", "trigger"]).unwrap();
        assert!(matches!(cli.command, Commands::Trigger(_)));

        let cli = Cli::try_parse_from(["pingmon", "next", "-e", "http://ping:8080/query"]).unwrap();
        match cli.command {
            Commands::Next(args) => assert_eq!(
                args.endpoint.endpoint.as_deref(),
                Some("http://ping:8080/query")
            ),
            _ => panic!("Expected Next command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["pingmon", "config", "init", "-o", "x.toml"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => {
                assert_eq!(args.output, PathBuf::from("x.toml"));
                assert!(!args.force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[endpoint]\nhttp_url = \"http://from-file:8080/query\"\n[logging]\nlevel = \"info\"",
        )
        .unwrap();

        let args = EndpointArgs {
            config: temp.path().to_path_buf(),
            endpoint: Some("http://from-cli:8080/query".to_string()),
            ws_endpoint: None,
            log_level: Some("trace".to_string()),
            json: false,
        };
        let config = args.load_config().unwrap();
        assert_eq!(config.endpoint.http_url, "http://from-cli:8080/query");
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let args = EndpointArgs {
            config: PathBuf::from("/nonexistent/pingmon.toml"),
            endpoint: Some("http://localhost:9999/query".to_string()),
            ws_endpoint: Some("ws://localhost:9999/ws".to_string()),
            log_level: None,
            json: false,
        };
        let config = args.load_config().unwrap();
        assert_eq!(config.monitor.capacity, 50);
        assert_eq!(config.endpoint.ws_url(), "ws://localhost:9999/ws");
    }
}
