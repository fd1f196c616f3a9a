//! # Document Serializer
//!
//! JSON wire shape consumed and produced by storage/export collaborators:
//!
//! ```text
//! { id, title, version, createdAt, updatedAt, author, permissions, metadata,
//!   content: { blocks: [{ id, type, position, parentId, protected, data }] } }
//! ```
//!
//! Loading validates presence only: ids and types must be non-empty, ids
//! unique, positions finite. Payload schemas are not checked.

use crate::{Block, Document, ModelError, Permissions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedDocument {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: u64,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub permissions: Permissions,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default)]
    pub content: SerializedContent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedContent {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl From<&Document> for SerializedDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            version: doc.version,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            author: doc.author.clone(),
            permissions: doc.permissions.clone(),
            metadata: doc.metadata.clone(),
            content: SerializedContent {
                blocks: doc.blocks().to_vec(),
            },
        }
    }
}

impl TryFrom<SerializedDocument> for Document {
    type Error = ModelError;

    fn try_from(serialized: SerializedDocument) -> Result<Self, Self::Error> {
        validate_blocks(&serialized.content.blocks)?;

        let mut doc = Document::new(serialized.id, serialized.title);
        doc.set_blocks(serialized.content.blocks);

        // Restore metadata last so loading does not count as a revision
        doc.version = serialized.version;
        doc.created_at = serialized.created_at;
        doc.updated_at = serialized.updated_at;
        doc.author = serialized.author;
        doc.permissions = serialized.permissions;
        doc.metadata = serialized.metadata;

        Ok(doc)
    }
}

impl Document {
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&SerializedDocument::from(self))?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(&SerializedDocument::from(self))?)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let serialized: SerializedDocument = serde_json::from_str(json)?;
        Document::try_from(serialized)
    }
}

fn validate_blocks(blocks: &[Block]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();

    for block in blocks {
        if block.id.is_empty() {
            return Err(ModelError::MissingBlockId);
        }
        if block.block_type.is_empty() {
            return Err(ModelError::MissingBlockType(block.id.clone()));
        }
        if !block.position.is_finite() {
            return Err(ModelError::InvalidPosition {
                id: block.id.clone(),
                position: block.position,
            });
        }
        if !seen.insert(block.id.as_str()) {
            return Err(ModelError::DuplicateBlockId(block.id.clone()));
        }
    }

    Ok(())
}
