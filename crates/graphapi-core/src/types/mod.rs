//! # Core Type Definitions
//!
//! This module contains the value types shared by the store and the engine:
//! - Node identity (`NodeId`) and its canonical wire form
//! - The stored entity (`Node`)
//! - Request payloads (`AddNodeRequest`)
//! - Error types (`GraphError`)
//!
//! ## Identity Guarantees
//!
//! `NodeId` orders by issuance sequence, so a `BTreeMap<NodeId, _>` enumerates
//! nodes in the order they were created. The wire form is always the canonical
//! `node_<n>` string; any other spelling names no node.

use crate::envelope::StatusCode;
use crate::primitives::NODE_ID_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// NODE IDENTIFIER
// =============================================================================

/// Unique identifier for a node, issued by the engine.
///
/// Serialized as a string (`"node_1000"`) so hosts can tell it apart from
/// numeric and boolean payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId(u64);

impl NodeId {
    /// Create a node id from its raw sequence number.
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Get the raw sequence number.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.0
    }

    /// Parse the canonical wire form.
    ///
    /// Returns `None` for anything that is not exactly what `Display` would
    /// produce: a missing prefix, leading zeros, signs, or trailing bytes.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix(NODE_ID_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        digits.parse::<u64>().ok().map(Self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NODE_ID_PREFIX, self.0)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = GraphError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| GraphError::InvalidArgument(format!("malformed node id: {s:?}")))
    }
}

// =============================================================================
// NODE
// =============================================================================

/// A node in the store.
///
/// Nodes are never edited in place; they are created by `addNode` and
/// removed by `deleteNode` or `clearGraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The engine-issued identifier.
    pub id: NodeId,
    /// Caller-supplied display label, stored verbatim.
    pub ui_name: String,
    /// Caller-supplied seconds since epoch, stored verbatim.
    pub timestamp: i64,
}

impl Node {
    /// Create a new node.
    #[must_use]
    pub fn new(id: NodeId, ui_name: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id,
            ui_name: ui_name.into(),
            timestamp,
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Arguments of `addNode`.
///
/// Both fields are required; unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNodeRequest {
    pub ui_name: String,
    pub timestamp: i64,
}

impl AddNodeRequest {
    /// Create a new request.
    #[must_use]
    pub fn new(ui_name: impl Into<String>, timestamp: i64) -> Self {
        Self {
            ui_name: ui_name.into(),
            timestamp,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur inside the engine.
///
/// Internal code propagates these with `?`. They are converted to an error
/// envelope exactly once, at the operation boundary, and never escape a call.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The caller supplied a missing or malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested node is not in the store.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No operation is registered under this name.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The id counter cannot advance any further.
    #[error("node id space exhausted")]
    IdSpaceExhausted,

    /// Every candidate id collided with a live node.
    #[error("could not issue a unique node id after {0} attempts")]
    IdCollision(usize),

    /// A payload could not be converted to or from plain data.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl GraphError {
    /// The envelope status code this error is reported under.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::InvalidArgument,
            Self::NodeNotFound(_) => StatusCode::NotFound,
            Self::UnknownOperation(_) => StatusCode::Unimplemented,
            Self::IdSpaceExhausted => StatusCode::ResourceExhausted,
            Self::IdCollision(_) | Self::Serialization(_) | Self::Config(_) | Self::Io(_) => {
                StatusCode::Internal
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display_is_prefixed() {
        assert_eq!(NodeId::new(1000).to_string(), "node_1000");
    }

    #[test]
    fn node_id_parse_accepts_canonical_form() {
        assert_eq!(NodeId::parse("node_1000"), Some(NodeId::new(1000)));
        assert_eq!(NodeId::parse("node_0"), Some(NodeId::new(0)));
    }

    #[test]
    fn node_id_parse_rejects_non_canonical_spellings() {
        for s in [
            "", "node_", "1000", "node_01000", "node_+1", "node_-1", "node_1x", "NODE_1",
            "node_99999999999999999999",
        ] {
            assert_eq!(NodeId::parse(s), None, "{s:?} should not parse");
        }
    }

    #[test]
    fn node_id_serializes_as_string() {
        let json = serde_json::to_value(NodeId::new(1001)).expect("serialize");
        assert_eq!(json, serde_json::json!("node_1001"));

        let back: NodeId = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, NodeId::new(1001));
    }

    #[test]
    fn node_id_orders_by_sequence() {
        // Lexicographic order would put node_10000 before node_1001.
        assert!(NodeId::new(1001) < NodeId::new(10000));
    }

    #[test]
    fn add_node_request_requires_both_fields() {
        let missing_ts = serde_json::json!({ "ui_name": "a" });
        assert!(serde_json::from_value::<AddNodeRequest>(missing_ts).is_err());

        let wrong_type = serde_json::json!({ "ui_name": 7, "timestamp": 1 });
        assert!(serde_json::from_value::<AddNodeRequest>(wrong_type).is_err());

        let extra = serde_json::json!({ "ui_name": "a", "timestamp": 1, "color": "red" });
        let req: AddNodeRequest = serde_json::from_value(extra).expect("extra fields ignored");
        assert_eq!(req, AddNodeRequest::new("a", 1));
    }

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(
            GraphError::InvalidArgument("x".into()).status_code(),
            StatusCode::InvalidArgument
        );
        assert_eq!(
            GraphError::UnknownOperation("x".into()).status_code(),
            StatusCode::Unimplemented
        );
        assert_eq!(GraphError::IdSpaceExhausted.status_code(), StatusCode::ResourceExhausted);
        assert_eq!(GraphError::IdCollision(8).status_code(), StatusCode::Internal);
    }
}
