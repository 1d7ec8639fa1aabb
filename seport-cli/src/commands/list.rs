//! List command implementation.
//!
//! This module implements the `list` command, which displays the port
//! bindings currently defined in the policy store.

use crate::error::CliError;
use crate::utils::{ensure_selinux_enabled, load_configuration, parse_protocol, GlobalOptions};
use clap::{Args, ValueEnum};
use seport::{Binding, Protocol, SemanageStore};
use serde::Serialize;
use std::io::Write;

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 3] = ["setype", "proto", "port"];

/// List currently defined port bindings.
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: OutputFormat,

    /// Filter by protocol
    #[arg(long, value_parser = parse_protocol)]
    pub proto: Option<Protocol>,

    /// Filter by SELinux type
    #[arg(long, value_name = "TYPE")]
    pub setype: Option<String>,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
}

/// One row of listing output.
#[derive(Serialize)]
struct ListingRow {
    setype: String,
    proto: String,
    port: String,
}

impl From<&Binding> for ListingRow {
    fn from(binding: &Binding) -> Self {
        Self {
            setype: binding.setype.clone(),
            proto: binding.key.protocol.to_string(),
            port: binding.key.range.to_string(),
        }
    }
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Nothing to list without a loaded policy
        ensure_selinux_enabled()?;

        // 2. Load configuration
        let config = load_configuration(global)?;

        // 3. Query the policy store
        let mut store = SemanageStore::from_config(&config);
        let mut bindings = store
            .list_bindings()
            .map_err(seport::Error::StoreUnavailable)
            .map_err(CliError::from)?;

        // 4. Apply filters
        if let Some(proto) = self.proto {
            bindings.retain(|b| b.key.protocol == proto);
        }
        if let Some(ref setype) = self.setype {
            bindings.retain(|b| &b.setype == setype);
        }

        // 5. Sort for stable output
        bindings.sort_by_key(|b| {
            (
                b.setype.clone(),
                b.key.protocol.to_string(),
                b.key.range.low().value(),
                b.key.range.high().value(),
            )
        });

        // 6. Format and output to stdout
        match self.format {
            OutputFormat::Table => format_as_table(&bindings)?,
            OutputFormat::Json => format_as_json(&bindings)?,
        }

        Ok(())
    }
}

/// Format bindings as a human-readable table.
fn format_as_table(bindings: &[Binding]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    // Print header (uppercase for table display)
    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    // Print each binding
    for binding in bindings {
        writeln!(
            handle,
            "{}\t{}\t{}",
            binding.setype, binding.key.protocol, binding.key.range,
        )?;
    }

    Ok(())
}

/// Format bindings as JSON.
fn format_as_json(bindings: &[Binding]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let rows: Vec<ListingRow> = bindings.iter().map(ListingRow::from).collect();
    serde_json::to_writer_pretty(&mut handle, &rows)
        .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    writeln!(handle)?;

    Ok(())
}
