//! Main entry point for the seport CLI.
//!
//! This is the command-line interface for reconciling SELinux port type
//! bindings. It provides two commands:
//! - `apply`: Reconcile a declared binding against the policy store
//! - `list`: List currently defined port bindings

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = seport::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        quiet: cli.quiet,
        semanage: cli.semanage,
        config_file: cli.config_file,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Apply(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
