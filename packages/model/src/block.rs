//! Block records and partial updates

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque, type-specific block payload
pub type BlockData = Map<String, Value>;

/// Atomic addressable content unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Unique within the owning document
    pub id: String,

    /// Type discriminator (header, text, table, ...)
    #[serde(rename = "type")]
    pub block_type: String,

    /// Global sort key
    pub position: f64,

    /// Containing block, if nested
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Excluded from drag-and-drop registration
    #[serde(default)]
    pub protected: bool,

    #[serde(default)]
    pub data: BlockData,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>, position: f64) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            position,
            parent_id: None,
            protected: false,
            data: BlockData::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_data(mut self, data: BlockData) -> Self {
        self.data = data;
        self
    }

    pub fn with_protected(mut self, protected: bool) -> Self {
        self.protected = protected;
        self
    }

    /// Current position and parent
    pub fn placement(&self) -> Placement {
        Placement {
            position: self.position,
            parent_id: self.parent_id.clone(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Where a block sits: its sort key and its parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub position: f64,
    pub parent_id: Option<String>,
}

impl Placement {
    pub fn new(position: f64, parent_id: Option<String>) -> Self {
        Self {
            position,
            parent_id,
        }
    }
}

/// Partial update applied by `Document::update_block`
///
/// Only fields that are `Some` are assigned. `data` is merged shallowly into
/// the existing payload. `parent_id` is doubly optional so a patch can move a
/// block back to the top level (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    pub data: Option<BlockData>,
    pub position: Option<f64>,
    pub parent_id: Option<Option<String>>,
    pub protected: Option<bool>,
}

impl BlockPatch {
    pub fn data(data: BlockData) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn position(position: f64) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn placement(placement: Placement) -> Self {
        Self {
            position: Some(placement.position),
            parent_id: Some(placement.parent_id),
            ..Self::default()
        }
    }

    pub fn protected(protected: bool) -> Self {
        Self {
            protected: Some(protected),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
            && self.position.is_none()
            && self.parent_id.is_none()
            && self.protected.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_serializes_with_wire_names() {
        let mut data = BlockData::new();
        data.insert("text".to_string(), json!("Hello"));
        let block = Block::new("b1", "text", 2.5)
            .with_parent("s1")
            .with_data(data);

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "b1",
                "type": "text",
                "position": 2.5,
                "parentId": "s1",
                "protected": false,
                "data": { "text": "Hello" }
            })
        );
    }

    #[test]
    fn test_block_deserializes_missing_optional_fields() {
        let block: Block =
            serde_json::from_str(r#"{"id":"b1","type":"code","position":0}"#).unwrap();
        assert_eq!(block.parent_id, None);
        assert!(!block.protected);
        assert!(block.data.is_empty());
    }

    #[test]
    fn test_patch_constructors() {
        assert!(BlockPatch::default().is_empty());
        let patch = BlockPatch::position(3.0).with_parent(None);
        assert_eq!(patch.position, Some(3.0));
        assert_eq!(patch.parent_id, Some(None));
        assert!(!patch.is_empty());
    }
}
