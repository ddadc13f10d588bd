//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, ApisResponse, RpcResponse};
use crate::config::Config;
use graphapi_core::{GraphEngine, GraphError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

// =============================================================================
// INPUT LIMITS
// =============================================================================

/// Maximum script file size (10 MB).
const MAX_SCRIPT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of calls in one script.
const MAX_SCRIPT_STEPS: usize = 10000;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), GraphError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| GraphError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(GraphError::InvalidArgument(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and make sure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, GraphError> {
    let canonical = path.canonicalize().map_err(|e| {
        GraphError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(GraphError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// SCRIPTS
// =============================================================================

/// One call in a script file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

impl ScriptStep {
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Run `steps` in order against `engine`, collecting every envelope.
///
/// A failing step does not stop the script; its error envelope is recorded
/// like any other result.
pub fn run_script(engine: &GraphEngine, steps: &[ScriptStep]) -> Vec<(String, RpcResponse)> {
    steps
        .iter()
        .map(|step| (step.method.clone(), engine.call(&step.method, step.args.clone())))
        .collect()
}

fn load_script(path: &Path) -> Result<Vec<ScriptStep>, GraphError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_SCRIPT_FILE_SIZE)?;

    let text = std::fs::read_to_string(&path)
        .map_err(|e| GraphError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&text)
        .map_err(|e| GraphError::InvalidArgument(format!("Invalid script: {}", e)))?;

    if steps.len() > MAX_SCRIPT_STEPS {
        return Err(GraphError::InvalidArgument(format!(
            "Script has {} steps, maximum is {}",
            steps.len(),
            MAX_SCRIPT_STEPS
        )));
    }
    Ok(steps)
}

fn build_engine(config: &Config) -> Result<GraphEngine, GraphError> {
    GraphEngine::with_config(config.engine.clone())
}

fn print_results(results: &[(String, RpcResponse)], json_mode: bool) {
    for (method, envelope) in results {
        if json_mode {
            let line = json!({ "method": method, "response": envelope });
            println!("{}", serde_json::to_string(&line).unwrap_or_default());
        } else {
            println!(
                "{} -> {}",
                method,
                serde_json::to_string(envelope).unwrap_or_default()
            );
        }
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), GraphError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;
    let engine = build_engine(&config)?;

    println!("graphapi Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  First id:   node_{}", config.engine.id_start);
    println!("  Rate limit: {}/s", config.server.rate_limit);
    println!();
    println!("Endpoints:");
    println!("  POST /rpc/{{method}} - Invoke an operation");
    println!("  GET  /apis          - List operations");
    println!("  GET  /status        - Node count");
    println!("  GET  /health        - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.server, engine).await
}

// =============================================================================
// APIS COMMAND
// =============================================================================

/// List callable operations.
pub fn cmd_apis(config: &Config, json_mode: bool) -> Result<(), GraphError> {
    let engine = build_engine(config)?;
    let listing = ApisResponse::new(engine.apis());

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&listing).unwrap_or_default()
        );
        return Ok(());
    }

    println!("graphapi Operations (envelope v{})", listing.version);
    println!("================================");
    for api in &listing.apis {
        println!("{:<12} {} -> {}", api.name, api.req, api.resp);
    }
    Ok(())
}

// =============================================================================
// CALL COMMAND
// =============================================================================

/// Invoke a single operation against a fresh engine.
pub fn cmd_call(
    config: &Config,
    json_mode: bool,
    method: &str,
    args: Option<&str>,
) -> Result<(), GraphError> {
    let args = match args {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| GraphError::InvalidArgument(format!("Argument is not JSON: {}", e)))?,
        None => Value::Null,
    };

    let engine = build_engine(config)?;
    let results = run_script(&engine, &[ScriptStep::new(method, args)]);
    print_results(&results, json_mode);
    Ok(())
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Run a script file against one engine.
///
/// Every step runs and is printed; the command fails if any step failed.
pub fn cmd_run(config: &Config, json_mode: bool, file: &Path) -> Result<(), GraphError> {
    let steps = load_script(file)?;
    let engine = build_engine(config)?;

    tracing::info!("Running {} calls from {}", steps.len(), file.display());
    let results = run_script(&engine, &steps);
    print_results(&results, json_mode);

    script_outcome(&results)
}

/// `Err` when any step of a script returned a failed envelope.
fn script_outcome(results: &[(String, RpcResponse)]) -> Result<(), GraphError> {
    let failed = results.iter().filter(|(_, env)| !env.is_ok()).count();
    if failed > 0 {
        return Err(GraphError::InvalidArgument(format!(
            "{} of {} calls failed",
            failed,
            results.len()
        )));
    }
    Ok(())
}

// =============================================================================
// DEMO COMMAND
// =============================================================================

/// First call of the walkthrough; later calls reuse the id it returns.
fn demo_add_step(now: i64) -> ScriptStep {
    ScriptStep::new("addNode", json!({ "ui_name": "Test Node", "timestamp": now }))
}

/// Add a node, delete it twice, then clear the graph.
pub fn cmd_demo(config: &Config, json_mode: bool) -> Result<(), GraphError> {
    let engine = build_engine(config)?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    if !json_mode {
        let names: Vec<_> = engine.apis().map(|a| a.name).collect();
        println!("Loaded engine with apis: {}", names.join(", "));
    }

    let mut results = run_script(&engine, &[demo_add_step(now)]);
    let node_id = results
        .first()
        .and_then(|(_, env)| env.data().cloned())
        .unwrap_or(Value::Null);

    results.extend(run_script(
        &engine,
        &[
            ScriptStep::new("deleteNode", node_id.clone()),
            ScriptStep::new("deleteNode", node_id),
            ScriptStep::new("clearGraph", json!({})),
        ],
    ));
    print_results(&results, json_mode);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
