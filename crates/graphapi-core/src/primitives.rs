//! # Engine Primitives
//!
//! Hardcoded constants for the graphapi CORE.
//!
//! These are compiled into the binary. Values that a deployment may want to
//! tune (the first id, the label limit) are only defaults here; the effective
//! values come from `EngineConfig`.

/// Version of the envelope wire contract.
///
/// Increment this when the shape of `{ok, status, data}` or the meaning of a
/// status code changes.
pub const ENVELOPE_VERSION: u32 = 1;

/// Prefix of every issued node id.
pub const NODE_ID_PREFIX: &str = "node_";

/// First sequence number issued by a default engine (`node_1000`).
pub const DEFAULT_ID_START: u64 = 1000;

/// How many candidate ids `addNode` tries before giving up.
///
/// A monotonic counter never collides on its own; this bounds the loop if a
/// store is ever seeded with ids the counter has not passed yet.
pub const MAX_ID_ATTEMPTS: usize = 8;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Default maximum length for `ui_name`, in bytes (64KB).
///
/// Longer labels are rejected as a caller error. This prevents memory
/// exhaustion from malicious or malformed input.
pub const DEFAULT_MAX_UI_NAME_LENGTH: usize = 65536;

/// Canonical message of a successful status.
pub const OK_MESSAGE: &str = "ok";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_default_id_is_node_1000() {
        assert_eq!(format!("{NODE_ID_PREFIX}{DEFAULT_ID_START}"), "node_1000");
    }
}
