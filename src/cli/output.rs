//! Output formatting and renderers for the monitor view

use crate::monitor::Render;
use crate::oplog::{OperationKind, OperationLogEntry, PingState};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::io::{self, Write};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Render a ping value in local time. Values that are not RFC 3339
/// timestamps are shown verbatim.
pub fn format_ping(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => value.to_string(),
    }
}

fn format_observed_at(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn kind_badge(kind: OperationKind) -> String {
    let label = kind.to_string().to_uppercase();
    match kind {
        OperationKind::Query => label.green().bold().to_string(),
        OperationKind::Mutation => label.blue().bold().to_string(),
        OperationKind::Subscription => label.magenta().bold().to_string(),
    }
}

fn format_payload(entry: &OperationLogEntry) -> String {
    match entry.payload.as_deref() {
        None => String::new(),
        Some(p) if entry.is_error() => p.red().to_string(),
        Some(p) => format_ping(p),
    }
}

/// Format the last ping value panel
pub fn format_last_ping(state: &PingState) -> String {
    match state.last_ping() {
        Some(ping) => format_ping(ping).cyan().bold().to_string(),
        None => "Waiting for ping...".dimmed().to_string(),
    }
}

/// Format the operation log as a table
pub fn format_log_table(state: &PingState) -> String {
    if state.log().is_empty() {
        return "No operations yet...".dimmed().to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Type", "Operation", "Time", "Data"]);

    for entry in state.log().entries() {
        table.add_row(vec![
            Cell::new(kind_badge(entry.kind)),
            Cell::new(&entry.name),
            Cell::new(format_observed_at(entry.observed_at)),
            Cell::new(format_payload(entry)),
        ]);
    }

    table.to_string()
}

/// Format the full monitor view
pub fn format_state(state: &PingState) -> String {
    format!(
        "{}\n\nLast Ping Timestamp\n  {}\n\nGraphQL Operations Log\n{}\n",
        "GraphQL Ping Monitor".bold(),
        format_last_ping(state),
        format_log_table(state)
    )
}

/// Format one entry as a single JSON line
pub fn format_entry_json(entry: &OperationLogEntry) -> String {
    serde_json::to_string(entry).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize log entry");
        String::new()
    })
}

/// Redraws the whole view on every change
pub struct TerminalRenderer<W: Write> {
    out: W,
    clear: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            clear: true,
        }
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render into `out` without clearing the screen between frames.
    pub fn new(out: W) -> Self {
        Self { out, clear: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for TerminalRenderer<W> {
    fn render(&mut self, state: &PingState) {
        let prefix = if self.clear { CLEAR_SCREEN } else { "" };
        let result = write!(self.out, "{}{}", prefix, format_state(state))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to render monitor view");
        }
    }
}

/// Emits each new log entry as one JSON line
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    last_id: Option<String>,
}

impl JsonLinesRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_id: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for JsonLinesRenderer<W> {
    fn render(&mut self, state: &PingState) {
        let Some(entry) = state.log().latest() else {
            return;
        };
        if self.last_id.as_deref() == Some(entry.id.as_str()) {
            return;
        }
        self.last_id = Some(entry.id.clone());

        let result = writeln!(self.out, "{}", format_entry_json(entry))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write log entry");
        }
    }
}
