//! # Engine Configuration
//!
//! Settings injected into a `GraphEngine` at construction. The core never
//! reads the environment or the filesystem; hosts build an `EngineConfig`
//! (the binary loads it from the `[engine]` table of its TOML file).

use crate::GraphError;
use crate::primitives::{DEFAULT_ID_START, DEFAULT_MAX_UI_NAME_LENGTH};
use serde::{Deserialize, Serialize};

/// Per-instance engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sequence number of the first issued id.
    pub id_start: u64,
    /// Maximum accepted `ui_name` length in bytes.
    pub max_ui_name_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            id_start: DEFAULT_ID_START,
            max_ui_name_length: DEFAULT_MAX_UI_NAME_LENGTH,
        }
    }
}

impl EngineConfig {
    /// Reject settings no engine could run with.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.max_ui_name_length == 0 {
            return Err(GraphError::Config(
                "max_ui_name_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_primitives() {
        let config = EngineConfig::default();
        assert_eq!(config.id_start, 1000);
        assert_eq!(config.max_ui_name_length, 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_value(serde_json::json!({ "id_start": 5 })).expect("parse");
        assert_eq!(config.id_start, 5);
        assert_eq!(config.max_ui_name_length, DEFAULT_MAX_UI_NAME_LENGTH);
    }

    #[test]
    fn zero_label_limit_is_rejected() {
        let config = EngineConfig {
            max_ui_name_length: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(GraphError::Config(_))));
    }
}
