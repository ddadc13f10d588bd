//! # Graph Engine
//!
//! One engine instance = one node store + the operation set over it.
//!
//! The engine is the only owner of its store. Mutations (`addNode`,
//! `deleteNode`, `clearGraph`) hold the write lock for their whole duration;
//! reads (`getNode`, `listNodes`, `nodeCount`) share the read lock. No
//! operation can observe another one half-applied.
//!
//! Two entry points reach the same code:
//! - typed methods for in-process callers (no serialization)
//! - `call(name, args)` for hosts speaking plain data across a boundary

use crate::config::EngineConfig;
use crate::envelope::{Envelope, Void};
use crate::graph::{Graph, GraphStore};
use crate::registry::{self, ApiInfo};
use crate::{AddNodeRequest, GraphError, Node, NodeId};
use serde_json::Value;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The graph store engine.
#[derive(Debug)]
pub struct GraphEngine {
    store: RwLock<Graph>,
    config: EngineConfig,
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }
}

impl GraphEngine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with an injected configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, GraphError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        Self {
            store: RwLock::new(Graph::with_id_start(config.id_start)),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Every operation this engine answers to, in registry order.
    pub fn apis(&self) -> impl Iterator<Item = &'static ApiInfo> {
        registry::OPERATIONS.iter().map(|op| &op.info)
    }

    /// Invoke an operation by name with a plain-data argument.
    ///
    /// Unknown names produce an `UNIMPLEMENTED` envelope.
    pub fn call(&self, name: &str, args: Value) -> Envelope<Value> {
        tracing::debug!(operation = name, "Dispatching call");
        match registry::find(name) {
            Some(op) => op.invoke(self, args),
            None => {
                let err = GraphError::UnknownOperation(name.to_string());
                tracing::warn!(event = "unknown_operation", operation = name, "{}", err);
                Envelope::from_error(&err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// `addNode`: insert a node and return its new id.
    pub fn add_node(&self, req: AddNodeRequest) -> Envelope<NodeId> {
        Envelope::from_result(self.try_add_node(req))
    }

    fn try_add_node(&self, req: AddNodeRequest) -> Result<NodeId, GraphError> {
        if req.ui_name.len() > self.config.max_ui_name_length {
            let err = GraphError::InvalidArgument(format!(
                "ui_name length {} exceeds maximum {} bytes",
                req.ui_name.len(),
                self.config.max_ui_name_length
            ));
            tracing::warn!(event = "add_node_rejected", error = %err, "addNode rejected");
            return Err(err);
        }

        let AddNodeRequest { ui_name, timestamp } = req;
        let mut store = self.write();
        match store.insert_node(ui_name, timestamp) {
            Ok(id) => {
                tracing::info!(event = "node_added", id = %id, timestamp, "Added node");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(event = "add_node_failed", error = %e, "addNode failed");
                Err(e)
            }
        }
    }

    /// `deleteNode`: remove a node if present.
    ///
    /// `data` is `true` if a node was removed and `false` if the id named no
    /// live node. Both are successes.
    pub fn delete_node(&self, id: &str) -> Envelope<bool> {
        let Some(node_id) = NodeId::parse(id) else {
            tracing::debug!(event = "delete_miss", id, "Delete of non-canonical id");
            return Envelope::make_ok(false);
        };

        let mut store = self.write();
        Envelope::from_result(store.remove_node(node_id).inspect(|removed| {
            if *removed {
                tracing::info!(event = "node_deleted", id, "Deleted node");
            } else {
                tracing::debug!(event = "delete_miss", id, "Delete of absent id");
            }
        }))
    }

    /// `clearGraph`: remove every node.
    pub fn clear_graph(&self) -> Envelope<Void> {
        let mut store = self.write();
        Envelope::from_result(store.clear().map(|removed| {
            tracing::info!(event = "graph_cleared", removed, "Cleared all nodes");
            Void
        }))
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// `getNode`: fetch one node, `NOT_FOUND` if absent.
    pub fn get_node(&self, id: &str) -> Envelope<Node> {
        let found = NodeId::parse(id)
            .map(|node_id| self.read().lookup(node_id))
            .transpose()
            .map(Option::flatten);

        Envelope::from_result(
            found.and_then(|node| node.ok_or_else(|| GraphError::NodeNotFound(id.to_string()))),
        )
    }

    /// `listNodes`: every live node in issuance order.
    pub fn list_nodes(&self) -> Envelope<Vec<Node>> {
        Envelope::from_result(self.read().list_nodes())
    }

    /// `nodeCount`: number of live nodes.
    pub fn node_count(&self) -> Envelope<usize> {
        Envelope::from_result(self.read().node_count())
    }

    // -------------------------------------------------------------------------
    // Locking
    // -------------------------------------------------------------------------

    // A poisoned lock still guards a consistent map: every mutation is a
    // single BTreeMap call made after all fallible work is done.
    fn write(&self) -> RwLockWriteGuard<'_, Graph> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, Graph> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// TESTS
// =============================================================================
