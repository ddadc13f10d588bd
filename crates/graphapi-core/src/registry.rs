//! # Operation Registry
//!
//! The statically-declared table of every operation a `GraphEngine` exposes.
//!
//! Each entry pairs an `ApiInfo` (what hosts see when they enumerate `apis`)
//! with a type-erased handler that decodes plain-data arguments, calls the
//! typed engine method, and re-encodes the resulting envelope.

use crate::engine::GraphEngine;
use crate::envelope::{Envelope, Void};
use crate::types::{AddNodeRequest, GraphError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

// =============================================================================
// API INFO
// =============================================================================

/// Public description of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiInfo {
    /// The operation name hosts call.
    pub name: &'static str,
    /// Shape of the single argument.
    pub req: &'static str,
    /// Shape of `data` on success.
    pub resp: &'static str,
}

/// Type-erased entry point of an operation.
pub type Handler = fn(&GraphEngine, Value) -> Envelope<Value>;

/// A registered operation.
#[derive(Clone, Copy)]
pub struct Operation {
    pub info: ApiInfo,
    handler: Handler,
}

impl Operation {
    /// Run this operation against `engine`.
    pub fn invoke(&self, engine: &GraphEngine, args: Value) -> Envelope<Value> {
        (self.handler)(engine, args)
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation").field("info", &self.info).finish()
    }
}

// =============================================================================
// THE TABLE
// =============================================================================

/// Every operation, in the order `apis` lists them.
pub static OPERATIONS: [Operation; 6] = [
    Operation {
        info: ApiInfo {
            name: "addNode",
            req: "{ui_name: string, timestamp: integer}",
            resp: "string",
        },
        handler: add_node,
    },
    Operation {
        info: ApiInfo {
            name: "deleteNode",
            req: "string",
            resp: "boolean",
        },
        handler: delete_node,
    },
    Operation {
        info: ApiInfo {
            name: "clearGraph",
            req: "{}",
            resp: "{}",
        },
        handler: clear_graph,
    },
    Operation {
        info: ApiInfo {
            name: "getNode",
            req: "string",
            resp: "{id: string, ui_name: string, timestamp: integer}",
        },
        handler: get_node,
    },
    Operation {
        info: ApiInfo {
            name: "listNodes",
            req: "{}",
            resp: "[{id: string, ui_name: string, timestamp: integer}]",
        },
        handler: list_nodes,
    },
    Operation {
        info: ApiInfo {
            name: "nodeCount",
            req: "{}",
            resp: "integer",
        },
        handler: node_count,
    },
];

/// Look up an operation by exact name.
pub fn find(name: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.info.name == name)
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Decode `args`, run `op`, and erase the payload type.
///
/// An argument that does not fit `Req` never reaches the engine; it becomes
/// an `INVALID_ARGUMENT` envelope and the store is untouched.
fn dispatch<Req, Res>(args: Value, op: impl FnOnce(Req) -> Envelope<Res>) -> Envelope<Value>
where
    Req: DeserializeOwned,
    Res: Serialize,
{
    match serde_json::from_value::<Req>(args) {
        Ok(req) => op(req).into_value(),
        Err(e) => {
            let err = GraphError::InvalidArgument(e.to_string());
            tracing::warn!(event = "invalid_argument", error = %err, "Rejected call arguments");
            Envelope::from_error(&err)
        }
    }
}

fn add_node(engine: &GraphEngine, args: Value) -> Envelope<Value> {
    dispatch(args, |req: AddNodeRequest| engine.add_node(req))
}

fn delete_node(engine: &GraphEngine, args: Value) -> Envelope<Value> {
    dispatch(args, |id: String| engine.delete_node(&id))
}

fn clear_graph(engine: &GraphEngine, args: Value) -> Envelope<Value> {
    dispatch(args, |_: Void| engine.clear_graph())
}

fn get_node(engine: &GraphEngine, args: Value) -> Envelope<Value> {
    dispatch(args, |id: String| engine.get_node(&id))
}

fn list_nodes(engine: &GraphEngine, args: Value) -> Envelope<Value> {
    dispatch(args, |_: Void| engine.list_nodes())
}

fn node_count(engine: &GraphEngine, args: Value) -> Envelope<Value> {
    dispatch(args, |_: Void| engine.node_count())
}

// =============================================================================
// TESTS
// =============================================================================
