//! # graphapi CLI Module
//!
//! Command-line interface for the graphapi engine.
//!
//! `server` hosts an engine over HTTP. The other commands run an engine
//! in-process, which makes them handy for trying the operation set without a
//! network hop: every envelope is printed as the engine returned it.

mod commands;

pub use commands::{ScriptStep, run_script};

use crate::config::Config;
use clap::{Parser, Subcommand};
use graphapi_core::GraphError;
use std::path::PathBuf;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// graphapi - in-memory node store behind a uniform RPC envelope
#[derive(Parser, Debug)]
#[command(name = "graphapi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List callable operations
    Apis,

    /// Invoke a single operation against a fresh engine
    Call {
        /// Operation name (e.g. addNode)
        method: String,

        /// JSON argument (defaults to null)
        args: Option<String>,
    },

    /// Run a JSON script of calls against one engine
    Run {
        /// Path to a JSON array of {"method": ..., "args": ...}
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Run the add/delete/delete/clear walkthrough
    Demo,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and loaded configuration.
pub async fn execute(cli: Cli, config: Config) -> Result<(), GraphError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => commands::cmd_server(config, host, port).await,
        Some(Commands::Apis) => commands::cmd_apis(&config, json_mode),
        Some(Commands::Call { method, args }) => {
            commands::cmd_call(&config, json_mode, &method, args.as_deref())
        }
        Some(Commands::Run { file }) => commands::cmd_run(&config, json_mode, &file),
        Some(Commands::Demo) => commands::cmd_demo(&config, json_mode),
        None => {
            // No subcommand - list the operations by default
            commands::cmd_apis(&config, json_mode)
        }
    }
}
