//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Resolve shell environments from function parameters
#[derive(Parser, Debug)]
#[command(name = "shellenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Request file shared by every command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RequestArgs {
    /// Request file (YAML or JSON) with parameters, documents and stores
    #[arg(short, long, env = "SHELLENV_REQUEST")]
    pub request: PathBuf,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compose and print the environment
    ///
    /// Examples:
    ///   shellenv env -r request.yaml          # KEY=value lines
    ///   shellenv env -r request.yaml --json   # JSON object
    Env {
        #[command(flatten)]
        request: RequestArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the export statements followed by the shell command
    Script {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Resolve a single path
    ///
    /// Examples:
    ///   shellenv get -r request.yaml spec.region
    ///   shellenv get -r request.yaml 'context[apiextensions.crossplane.io/environment].tier' --optional --default dev
    Get {
        #[command(flatten)]
        request: RequestArgs,

        /// Path into the observed composite, or `context[<key>].<path>`
        path: String,

        /// Fall back to the default value instead of failing
        #[arg(long)]
        optional: bool,

        /// Default value used with --optional
        #[arg(long, requires = "optional")]
        default: Option<String>,
    },

    /// Print the scripts loaded from config maps as JSON
    Scripts {
        #[command(flatten)]
        request: RequestArgs,
    },
}
