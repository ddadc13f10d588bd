//! # graphapi MCP Server
//!
//! Implements `ServerHandler` with one MCP tool per node operation, each
//! forwarding to `POST /rpc/{method}` on the graphapi server.

use crate::client::GraphApiClient;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use serde_json::{Value, json};

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to a graphapi HTTP server.
#[derive(Clone)]
pub struct GraphApiMcp {
    client: GraphApiClient,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

// =============================================================================
// TOOL PARAMETER STRUCTS
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddNodeParams {
    #[schemars(description = "Display label for the node, stored verbatim")]
    pub ui_name: String,
    #[schemars(description = "Caller-supplied timestamp in seconds since the Unix epoch")]
    pub timestamp: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NodeIdParams {
    #[schemars(description = "Node id as returned by graph_add_node (e.g. 'node_1000')")]
    pub node_id: String,
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl GraphApiMcp {
    pub fn new(client: GraphApiClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    async fn forward(&self, method: &str, args: Value) -> Result<CallToolResult, McpError> {
        match self.client.call(method, &args).await {
            Ok(envelope) => Ok(CallToolResult::success(vec![Content::text(
                format_envelope(method, &envelope),
            )])),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Add a node to the graph and return its new id")]
    async fn graph_add_node(
        &self,
        params: Parameters<AddNodeParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("addNode", add_node_args(params.0)).await
    }

    #[tool(description = "Delete a node by id; reports whether anything was removed")]
    async fn graph_delete_node(
        &self,
        params: Parameters<NodeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("deleteNode", json!(params.0.node_id)).await
    }

    #[tool(description = "Remove every node from the graph")]
    async fn graph_clear(&self) -> Result<CallToolResult, McpError> {
        self.forward("clearGraph", json!({})).await
    }

    #[tool(description = "Fetch one node by id")]
    async fn graph_get_node(
        &self,
        params: Parameters<NodeIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.forward("getNode", json!(params.0.node_id)).await
    }

    #[tool(description = "List every node in issuance order")]
    async fn graph_list_nodes(&self) -> Result<CallToolResult, McpError> {
        self.forward("listNodes", json!({})).await
    }

    #[tool(description = "List the operations the graph server exposes")]
    async fn graph_apis(&self) -> Result<CallToolResult, McpError> {
        match self.client.apis().await {
            Ok(resp) => Ok(CallToolResult::success(vec![Content::text(format_apis(
                &resp,
            ))])),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for GraphApiMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "graphapi node store. Use tools to add, fetch, list and delete nodes, \
                 or clear the graph. Node ids are never reused."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// =============================================================================
// RESPONSE FORMATTING
// =============================================================================

/// Argument of `addNode`, passed through verbatim.
fn add_node_args(params: AddNodeParams) -> Value {
    json!({ "ui_name": params.ui_name, "timestamp": params.timestamp })
}

/// Render an envelope as human-readable text.
fn format_envelope(method: &str, envelope: &Value) -> String {
    let code = envelope
        .pointer("/status/code")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN");
    let message = envelope
        .pointer("/status/message")
        .and_then(Value::as_str)
        .unwrap_or("");

    if envelope.get("ok").and_then(Value::as_bool) != Some(true) {
        return format!("{method} failed ({code}): {message}");
    }

    let data = envelope.get("data").unwrap_or(&Value::Null);
    match (method, data) {
        ("addNode", Value::String(id)) => format!("Node added. Id: {id}"),
        ("deleteNode", Value::Bool(true)) => "Node deleted.".to_string(),
        ("deleteNode", Value::Bool(false)) => "No such node; nothing deleted.".to_string(),
        ("clearGraph", _) => "Graph cleared.".to_string(),
        ("getNode", node) => format_node(node),
        ("listNodes", Value::Array(nodes)) if nodes.is_empty() => "Graph is empty.".to_string(),
        ("listNodes", Value::Array(nodes)) => {
            let mut lines = vec![format!("Nodes ({}):", nodes.len())];
            lines.extend(nodes.iter().map(|n| format!("  {}", format_node(n))));
            lines.join("\n")
        }
        (_, other) => format!("{method}: {other}"),
    }
}

fn format_node(node: &Value) -> String {
    let id = node.get("id").and_then(Value::as_str).unwrap_or("?");
    let name = node.get("ui_name").and_then(Value::as_str).unwrap_or("?");
    let ts = node.get("timestamp").and_then(Value::as_i64).unwrap_or(0);
    format!("{id} \"{name}\" @ {ts}")
}

fn format_apis(resp: &Value) -> String {
    let version = resp.get("version").and_then(Value::as_u64).unwrap_or(0);
    let mut lines = vec![format!("Operations (envelope v{version}):")];
    if let Some(apis) = resp.get("apis").and_then(Value::as_array) {
        for api in apis {
            let field = |k: &str| api.get(k).and_then(Value::as_str).unwrap_or("?").to_string();
            lines.push(format!("  {} {} -> {}", field("name"), field("req"), field("resp")));
        }
    }
    lines.join("\n")
}

// =============================================================================
// TESTS
// =============================================================================
