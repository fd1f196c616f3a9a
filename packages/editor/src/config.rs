//! Editor configuration

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::EditorError;
use blockpad_model::{BlockTypeConfig, BlockTypeRegistry, ModelError};
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHILD_OFFSET: f64 = 0.1;
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Capacity of each history stack
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Offset from a container's position for its first child
    #[serde(default = "default_child_offset")]
    pub child_offset: f64,

    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,

    /// Extra block types, registered over the built-ins
    #[serde(default)]
    pub block_types: Vec<BlockTypeConfig>,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_child_offset() -> f64 {
    DEFAULT_CHILD_OFFSET
}

fn default_autosave_debounce_ms() -> u64 {
    DEFAULT_AUTOSAVE_DEBOUNCE_MS
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            child_offset: DEFAULT_CHILD_OFFSET,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            block_types: Vec::new(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(|e| EditorError::Model(ModelError::Json(e)))
    }

    /// Built-in types plus `block_types`
    pub fn registry(&self) -> BlockTypeRegistry {
        let mut registry = BlockTypeRegistry::with_builtins();
        for config in &self.block_types {
            registry.register(config.clone());
        }
        registry
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::milliseconds(self.autosave_debounce_ms.try_into().unwrap_or(i64::MAX))
    }
}
