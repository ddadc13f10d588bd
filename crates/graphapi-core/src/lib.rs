//! # graphapi-core
//!
//! The in-memory graph node store and its RPC envelope - THE LOGIC.
//!
//! A `GraphEngine` owns one node table and exposes a fixed set of named
//! operations. Every operation takes a single plain-data argument and returns
//! exactly one `Envelope { ok, status, data }`; nothing escapes a call as a
//! panic or an unhandled error.
//!
//! ## Operations
//!
//! | Name         | Argument                      | `data` on success |
//! |--------------|-------------------------------|-------------------|
//! | `addNode`    | `{ui_name, timestamp}`        | new id (string)   |
//! | `deleteNode` | id (string)                   | `true` / `false`  |
//! | `clearGraph` | anything (ignored)            | `{}`              |
//! | `getNode`    | id (string)                   | node object       |
//! | `listNodes`  | anything (ignored)            | array of nodes    |
//! | `nodeCount`  | anything (ignored)            | integer           |
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no environment lookups: hosts inject `EngineConfig`
//! - Each engine instance is isolated; there is no global registry of stores
//! - Ids come from a monotonic counter and are never reissued

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod engine;
pub mod envelope;
pub mod graph;
pub mod primitives;
pub mod registry;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use config::EngineConfig;
pub use engine::GraphEngine;
pub use envelope::{Envelope, Status, StatusCode, Void};
pub use graph::{Graph, GraphStore};
pub use primitives::ENVELOPE_VERSION;
pub use registry::{ApiInfo, OPERATIONS, Operation};
pub use types::{AddNodeRequest, GraphError, Node, NodeId};
