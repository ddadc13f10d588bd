//! # Graph Store
//!
//! The node table behind the engine.
//!
//! This module implements the `GraphStore` trait for the in-memory `Graph`.
//! All data structures use `BTreeMap`, so enumeration follows id order, which
//! is issuance order.

use crate::primitives::{DEFAULT_ID_START, MAX_ID_ATTEMPTS};
use crate::{GraphError, Node, NodeId};
use std::collections::BTreeMap;

// =============================================================================
// GRAPHSTORE TRAIT
// =============================================================================

/// The GraphStore trait defines node lifecycle operations.
///
/// Every method either applies its whole mutation or none of it. Fallible
/// operations return `Result<T, GraphError>` so alternative backends can
/// report their own failures uniformly.
pub trait GraphStore {
    /// Insert a new node with a freshly issued id. Returns that id.
    fn insert_node(&mut self, ui_name: String, timestamp: i64) -> Result<NodeId, GraphError>;

    /// Remove a node. Returns whether a node was actually removed.
    fn remove_node(&mut self, id: NodeId) -> Result<bool, GraphError>;

    /// Remove every node. Returns how many were removed.
    fn clear(&mut self) -> Result<usize, GraphError>;

    /// Lookup a node by id. Returns an owned copy.
    fn lookup(&self, id: NodeId) -> Result<Option<Node>, GraphError>;

    /// Check if a node exists.
    fn contains_node(&self, id: NodeId) -> Result<bool, GraphError>;

    /// Get the number of live nodes.
    fn node_count(&self) -> Result<usize, GraphError>;

    /// All live nodes in issuance order.
    fn list_nodes(&self) -> Result<Vec<Node>, GraphError>;
}

// =============================================================================
// GRAPH IMPLEMENTATION
// =============================================================================

/// The in-memory node store.
///
/// `next_id` only moves forward; `None` means the id space is used up.
/// Deleted ids are removed outright and the counter never revisits them.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Node storage: NodeId -> Node
    nodes: BTreeMap<NodeId, Node>,

    /// Next sequence number to try
    next_id: Option<u64>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::with_id_start(DEFAULT_ID_START)
    }
}

impl Graph {
    /// Create a new empty graph issuing ids from `node_1000`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty graph whose first id is `node_<start>`.
    #[must_use]
    pub fn with_id_start(start: u64) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: Some(start),
        }
    }

    /// Get all nodes in issuance order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// The sequence number the next insert will try, if any remain.
    #[must_use]
    pub fn next_id(&self) -> Option<u64> {
        self.next_id
    }

    /// Check if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Issue a fresh id that no live node holds.
    ///
    /// Advances the counter on every attempt, so an id handed out once is
    /// never handed out again even if the insert that requested it fails.
    fn issue_id(&mut self) -> Result<NodeId, GraphError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let seq = self.next_id.ok_or(GraphError::IdSpaceExhausted)?;
            self.next_id = seq.checked_add(1);

            let candidate = NodeId::new(seq);
            if !self.nodes.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(GraphError::IdCollision(MAX_ID_ATTEMPTS))
    }
}

impl GraphStore for Graph {
    fn insert_node(&mut self, ui_name: String, timestamp: i64) -> Result<NodeId, GraphError> {
        let id = self.issue_id()?;
        self.nodes.insert(id, Node::new(id, ui_name, timestamp));
        Ok(id)
    }

    fn remove_node(&mut self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.nodes.remove(&id).is_some())
    }

    fn clear(&mut self) -> Result<usize, GraphError> {
        let removed = self.nodes.len();
        self.nodes.clear();
        Ok(removed)
    }

    fn lookup(&self, id: NodeId) -> Result<Option<Node>, GraphError> {
        Ok(self.nodes.get(&id).cloned())
    }

    fn contains_node(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.nodes.contains_key(&id))
    }

    fn node_count(&self) -> Result<usize, GraphError> {
        Ok(self.nodes.len())
    }

    fn list_nodes(&self) -> Result<Vec<Node>, GraphError> {
        Ok(self.nodes.values().cloned().collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
