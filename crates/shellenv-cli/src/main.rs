//! shellenv CLI
//!
//! Resolves the environment of a shell invocation from a request file.

mod cli;
mod commands;
mod error;
mod request;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    execute_command(cli.command)
}

/// Log to stderr so stdout stays machine-readable.
///
/// `RUST_LOG` selects the level, defaulting to "info", or "debug" with
/// `--verbose`.
fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Env { request, json } => commands::run_env(&request.request, json),
        Commands::Script { request } => commands::run_script(&request.request),
        Commands::Get {
            request,
            path,
            optional,
            default,
        } => commands::run_get(&request.request, &path, optional, default.as_deref()),
        Commands::Scripts { request } => commands::run_scripts(&request.request),
    }
}
