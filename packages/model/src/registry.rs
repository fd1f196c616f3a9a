//! Block type registry: per-type defaults and the container set

use crate::BlockData;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Static description of a block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTypeConfig {
    pub name: String,

    /// May hold child blocks via `parent_id`
    #[serde(default)]
    pub container: bool,

    /// Payload merged under caller-supplied initial data
    #[serde(default)]
    pub defaults: BlockData,
}

impl BlockTypeConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container: false,
            defaults: BlockData::new(),
        }
    }

    pub fn container(mut self) -> Self {
        self.container = true;
        self
    }

    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }
}

/// Registry of known block types
#[derive(Debug, Clone)]
pub struct BlockTypeRegistry {
    types: BTreeMap<String, BlockTypeConfig>,
}

impl BlockTypeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Registry with the built-in block types
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(
            BlockTypeConfig::new("header")
                .container()
                .with_default("text", json!(""))
                .with_default("level", json!(1)),
        );
        registry.register(
            BlockTypeConfig::new("section")
                .container()
                .with_default("title", json!("")),
        );
        registry.register(
            BlockTypeConfig::new("footer")
                .container()
                .with_default("text", json!("")),
        );
        registry.register(BlockTypeConfig::new("text").with_default("text", json!("")));
        registry.register(
            BlockTypeConfig::new("table")
                .with_default("columns", json!([]))
                .with_default("rows", json!([])),
        );
        registry.register(
            BlockTypeConfig::new("code")
                .with_default("language", json!("plaintext"))
                .with_default("source", json!("")),
        );
        registry.register(
            BlockTypeConfig::new("list")
                .with_default("items", json!([]))
                .with_default("ordered", json!(false)),
        );
        registry.register(
            BlockTypeConfig::new("image")
                .with_default("src", json!(""))
                .with_default("alt", json!("")),
        );
        registry.register(BlockTypeConfig::new("divider"));

        registry
    }

    /// Register a type, returning the config it replaced
    pub fn register(&mut self, config: BlockTypeConfig) -> Option<BlockTypeConfig> {
        self.types.insert(config.name.clone(), config)
    }

    pub fn get(&self, name: &str) -> Option<&BlockTypeConfig> {
        self.types.get(name)
    }

    /// Unknown types are never containers
    pub fn is_container(&self, name: &str) -> bool {
        self.types.get(name).is_some_and(|config| config.container)
    }

    /// Defaults for a type, empty when unknown
    pub fn defaults_for(&self, name: &str) -> BlockData {
        self.types
            .get(name)
            .map(|config| config.defaults.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for BlockTypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
