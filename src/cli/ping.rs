//! One-shot `query`, `trigger` and `next` commands

use crate::cli::output::{format_entry_json, format_ping};
use crate::cli::PingArgs;
use crate::graphql::{GraphQLClient, PingBackend};
use crate::oplog::{OperationKind, PingState};
use colored::Colorize;

/// Run one operation against `backend` and format the result line.
///
/// A failed operation produces no output line; its error is returned and
/// reported once by the caller.
pub async fn handle_ping(
    backend: &dyn PingBackend,
    kind: OperationKind,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let outcome = backend.execute(kind).await?;

    let mut state = PingState::with_capacity(1);
    let output = match state.apply(kind, Ok(outcome)) {
        Some(entry) if json => format_entry_json(entry),
        Some(entry) => format!(
            "{} {}",
            entry.name.bold(),
            format_ping(entry.payload.as_deref().unwrap_or_default())
        ),
        None if json => "null".to_string(),
        None => format!("{} returned no ping yet", kind.operation_name().bold()),
    };

    Ok(output)
}

/// Handle `pingmon query` / `pingmon trigger` / `pingmon next`
pub async fn run_ping(
    args: &PingArgs,
    kind: OperationKind,
) -> Result<String, Box<dyn std::error::Error>> {
    let config = args.endpoint.load_config()?;
    config.validate()?;
    crate::logging::init_tracing(&config.logging)?;

    let client = GraphQLClient::new(&config.endpoint)?;
    handle_ping(&client, kind, args.endpoint.json).await
}
