//! Apply command implementation.
//!
//! This module implements the `apply` command, which reconciles one
//! declared port binding against the policy store.

use crate::error::CliError;
use crate::utils::{ensure_selinux_enabled, load_configuration, parse_protocol, GlobalOptions};
use clap::{Args, ValueEnum};
use seport::{Protocol, ReconcileOptions, SemanageStore};

/// Reconcile a declared port binding against the policy store.
#[derive(Args)]
pub struct ApplyCommand {
    /// Port number or inclusive range (e.g. 8888 or 10000-10100)
    #[arg(long, value_name = "SPEC")]
    pub port: String,

    /// Network protocol
    #[arg(long, value_parser = parse_protocol)]
    pub proto: Protocol,

    /// SELinux type label to bind
    #[arg(long, value_name = "TYPE")]
    pub setype: String,

    /// Desired state of the binding
    #[arg(long, value_enum, default_value = "present", ignore_case = true)]
    pub state: State,

    /// MLS/MCS range for additions (default: from configuration)
    #[arg(long, value_name = "RANGE")]
    pub mls_range: Option<String>,

    /// Skip reloading the active policy after the change
    #[arg(long)]
    pub no_reload: bool,

    /// Report what would change without touching the store
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the result as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Desired state for a binding.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum State {
    /// The binding should exist
    Present,
    /// The binding should not exist
    Absent,
}

impl State {
    fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl ApplyCommand {
    /// Execute the apply command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Nothing to reconcile without a loaded policy
        ensure_selinux_enabled()?;

        // 2. Load configuration
        let config = load_configuration(global)?;

        // 3. Build the desired state
        let mls_range = self
            .mls_range
            .clone()
            .unwrap_or_else(|| config.default_mls_range.clone());
        let options = ReconcileOptions::new(&self.port, self.proto, &self.setype)
            .with_present(matches!(self.state, State::Present))
            .with_reload(!self.no_reload && config.reload)
            .with_dry_run(self.dry_run)
            .with_mls_range(mls_range);

        // 4. Reconcile against the semanage-backed store
        let mut store = SemanageStore::from_config(&config);
        let outcome = seport::reconcile(&options, &mut store).map_err(CliError::from)?;

        // 5. Report
        if self.json {
            let result = serde_json::json!({
                "changed": outcome.changed,
                "port": outcome.binding.key.range.to_string(),
                "proto": outcome.binding.key.protocol.to_string(),
                "setype": outcome.binding.setype,
                "state": self.state.as_str(),
            });
            println!("{result}");
        } else if !global.quiet {
            if self.dry_run {
                eprintln!("Dry run - would perform the following actions:");
                if outcome.actions_taken.is_empty() {
                    eprintln!("  (nothing to do)");
                } else {
                    for (i, action) in outcome.actions_taken.iter().enumerate() {
                        eprintln!("  {}. {action}", i + 1);
                    }
                }
            } else if outcome.changed {
                eprintln!(
                    "Binding {} is now {}",
                    outcome.binding.key,
                    self.state.as_str()
                );
            } else {
                eprintln!(
                    "Binding {} already {} (nothing to do)",
                    outcome.binding.key,
                    self.state.as_str()
                );
            }

            for warning in &outcome.warnings {
                eprintln!("Warning: {warning}");
            }
        }

        Ok(())
    }
}
