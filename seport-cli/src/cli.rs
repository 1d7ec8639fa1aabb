//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{ApplyCommand, ListCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for reconciling SELinux port type bindings.
#[derive(Parser)]
#[command(name = "seport")]
#[command(version, about = "Reconcile SELinux port type bindings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the semanage binary location
    #[arg(long, value_name = "PATH", global = true, env = "SEPORT_SEMANAGE")]
    pub semanage: Option<PathBuf>,

    /// Read configuration from an explicit file
    #[arg(long, value_name = "PATH", global = true, env = "SEPORT_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Reconcile a declared port binding against the policy store
    Apply(ApplyCommand),

    /// List currently defined port bindings
    List(ListCommand),
}
