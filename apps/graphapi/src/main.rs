//! # graphapi - RPC Host
//!
//! The main binary for the graphapi node store engine.
//!
//! This application provides:
//! - HTTP RPC server (axum-based)
//! - CLI interface for in-process calls and scripts
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/graphapi (THE BINARY)            │
//! │                                                      │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────┐  │
//! │  │   CLI       │    │   HTTP API  │    │  Config  │  │
//! │  │  (clap)     │    │   (axum)    │    │  (toml)  │  │
//! │  └──────┬──────┘    └──────┬──────┘    └────┬─────┘  │
//! │         └──────────────────┼────────────────┘        │
//! │                            ▼                         │
//! │                   ┌────────────────┐                 │
//! │                   │ graphapi-core  │                 │
//! │                   │  (THE LOGIC)   │                 │
//! │                   └────────────────┘                 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! graphapi server --host 0.0.0.0 --port 8080
//!
//! # In-process calls
//! graphapi apis
//! graphapi call addNode '{"ui_name": "Test Node", "timestamp": 1760000000}'
//! graphapi run -f calls.json
//! graphapi demo
//! ```

use clap::Parser;
use graphapi::cli;
use graphapi::config::{Config, DEFAULT_LOG_FILTER, LogConfig, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Config errors are reported before tracing exists, so go to stderr.
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log, cli.verbose);

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli, config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the config filter.
fn init_tracing(log: &LogConfig, verbose: bool) {
    let default_filter = if verbose {
        "graphapi=debug,graphapi_core=debug,tower_http=debug"
    } else {
        log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so command output on stdout stays machine-readable.
    match log.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   __ _ _ __ __ _ _ __ | |__   __ _ _ __ (_)
  / _` | '__/ _` | '_ \| '_ \ / _` | '_ \| |
 | (_| | | | (_| | |_) | | | | (_| | |_) | |
  \__, |_|  \__,_| .__/|_| |_|\__,_| .__/|_|
  |___/          |_|               |_|

  Node Store RPC Host v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
