//! # graphapi MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to graphapi.
//!
//! Reads configuration from environment variables:
//! - `GRAPHAPI_URL`: graphapi server URL (default: `http://localhost:8080`)
//! - `GRAPHAPI_API_KEY`: optional Bearer token for authentication
//!
//! Communicates with AI clients via MCP over stdio and forwards tool calls to
//! the graphapi RPC routes.

mod client;
mod server;

use client::GraphApiClient;
use rmcp::{ServiceExt, transport::stdio};
use server::GraphApiMcp;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout is reserved for the MCP stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let url = std::env::var("GRAPHAPI_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let api_key = std::env::var("GRAPHAPI_API_KEY").ok();

    tracing::info!("graphapi MCP server starting, target: {}", url);

    let client = GraphApiClient::new(url, api_key);
    if let Err(e) = client.health().await {
        tracing::warn!("graphapi server not reachable yet: {}", e);
    }

    let service = GraphApiMcp::new(client)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("MCP serve error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
