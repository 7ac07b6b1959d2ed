//! Watch command implementation

use crate::cli::output::{JsonLinesRenderer, TerminalRenderer};
use crate::cli::WatchArgs;
use crate::config::PingmonConfig;
use crate::graphql::GraphQLClient;
use crate::monitor::Monitor;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &WatchArgs,
) -> Result<PingmonConfig, Box<dyn std::error::Error>> {
    let mut config = args.endpoint.load_config()?;

    if args.no_subscription {
        config.monitor.subscription = false;
    }
    if args.no_scheduler {
        config.scheduler.enabled = false;
    }

    Ok(config)
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => return,
    }

    cancel_token.cancel();
}

/// Cancel `cancel_token` once `duration` has elapsed.
async fn stop_after(duration: Duration, cancel_token: CancellationToken) {
    tokio::select! {
        _ = tokio::time::sleep(duration) => {
            tracing::info!(seconds = duration.as_secs(), "Watch duration elapsed");
            cancel_token.cancel();
        }
        _ = cancel_token.cancelled() => {}
    }
}

/// Main watch command handler
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    crate::logging::init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    let client = GraphQLClient::new(&config.endpoint)?;
    tracing::info!(
        http_url = client.http_url(),
        ws_url = client.ws_url(),
        "Watching ping service"
    );

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));
    if let Some(secs) = args.duration {
        tokio::spawn(stop_after(Duration::from_secs(secs), cancel.clone()));
    }

    let monitor = Monitor::new(Arc::new(client), &config);
    let state = if args.endpoint.json {
        monitor.run(JsonLinesRenderer::stdout(), cancel).await
    } else {
        monitor.run(TerminalRenderer::stdout(), cancel).await
    };

    tracing::info!(
        entries = state.log().len(),
        last_ping = state.last_ping().unwrap_or("none"),
        "Watch finished"
    );

    Ok(())
}
