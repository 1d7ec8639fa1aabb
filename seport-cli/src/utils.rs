//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI
//! commands, including configuration loading and the SELinux gate.

use crate::error::CliError;
use seport::{Config, ConfigBuilder, Protocol};
use std::path::{Path, PathBuf};

/// Path that exists when an SELinux policy is loaded and selinuxfs is
/// mounted.
const SELINUX_ENFORCE_PATH: &str = "/sys/fs/selinux/enforce";

/// Global CLI options shared across all commands.
///
/// Verbosity is consumed by the logger at startup; only the quiet flag is
/// carried here, for gating the commands' human output.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the semanage binary location.
    pub semanage: Option<PathBuf>,

    /// Read configuration from an explicit file.
    pub config_file: Option<PathBuf>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();

    if let Some(ref config_file) = global.config_file {
        builder = builder.with_config_file(config_file);
    }
    if let Some(ref semanage) = global.semanage {
        builder = builder.with_semanage_path(semanage);
    }

    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// clap value parser for protocol arguments.
pub fn parse_protocol(s: &str) -> Result<Protocol, String> {
    s.parse::<Protocol>().map_err(|e| e.to_string())
}

/// Check whether SELinux is enabled on this host.
pub fn selinux_enabled() -> bool {
    Path::new(SELINUX_ENFORCE_PATH).exists()
}

/// Fail with `SelinuxDisabled` unless an SELinux policy is loaded.
///
/// Port bindings live in the SELinux policy store; without a loaded
/// policy there is nothing to reconcile against, dry-run included.
pub fn ensure_selinux_enabled() -> Result<(), CliError> {
    if selinux_enabled() {
        Ok(())
    } else {
        Err(CliError::SelinuxDisabled)
    }
}
