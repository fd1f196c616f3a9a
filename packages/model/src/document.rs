//! # Document
//!
//! Owns the block collection and document-level metadata.
//!
//! Blocks live in a single `Vec` kept sorted by `position` (stable, so equal
//! positions keep insertion order). Every successful mutation bumps
//! `version` and touches `updated_at`. Operations on unknown ids return
//! `false`/`None` and leave the document untouched.

use crate::{Block, BlockData, BlockPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Who may see and edit a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub editors: Vec<String>,

    #[serde(default)]
    pub viewers: Vec<String>,

    #[serde(default)]
    pub public: bool,
}

/// Structured document: metadata plus a position-ordered block collection
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub title: String,

    /// Revision counter (increments on each successful mutation)
    pub version: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: String,
    pub permissions: Permissions,
    pub metadata: Map<String, Value>,

    blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            version: 0,
            created_at: now,
            updated_at: now,
            author: String::new(),
            permissions: Permissions::default(),
            metadata: Map::new(),
            blocks: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        if self.permissions.owner.is_empty() {
            self.permissions.owner = author.clone();
        }
        self.author = author;
        self
    }

    /// Replace the block collection wholesale (used when loading)
    pub(crate) fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.sort_blocks();
    }

    /// All blocks in global position order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.iter().any(|b| b.id == id)
    }

    pub fn get_block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Index of a block in the global order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    /// Append a block, then re-sort the whole collection by position
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
        self.sort_blocks();
        self.touch();
    }

    /// Remove a block, returning its full record
    pub fn remove_block(&mut self, id: &str) -> Option<Block> {
        let index = self.index_of(id)?;
        let removed = self.blocks.remove(index);
        self.touch();
        Some(removed)
    }

    /// Apply a partial update
    ///
    /// `data` is merged shallowly; `position`, `parent_id` and `protected`
    /// are only assigned when present. Returns `false` for unknown ids.
    pub fn update_block(&mut self, id: &str, patch: BlockPatch) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            return false;
        };

        let mut resort = false;

        if let Some(data) = patch.data {
            for (key, value) in data {
                block.data.insert(key, value);
            }
        }

        if let Some(position) = patch.position {
            resort = position != block.position;
            block.position = position;
        }

        if let Some(parent_id) = patch.parent_id {
            block.parent_id = parent_id;
        }

        if let Some(protected) = patch.protected {
            block.protected = protected;
        }

        if resort {
            self.sort_blocks();
        }
        self.touch();
        true
    }

    /// Restore a full record over the block with the same id
    pub fn replace_block(&mut self, block: Block) -> bool {
        let Some(slot) = self.blocks.iter_mut().find(|b| b.id == block.id) else {
            return false;
        };

        let resort = slot.position != block.position;
        *slot = block;

        if resort {
            self.sort_blocks();
        }
        self.touch();
        true
    }

    /// Replace a block's payload entirely
    pub fn set_data(&mut self, id: &str, data: BlockData) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        block.data = data;
        self.touch();
        true
    }

    /// Blocks sharing `parent_id`, in global order
    pub fn siblings(&self, parent_id: Option<&str>) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.parent_id.as_deref() == parent_id)
            .collect()
    }

    /// Blocks with no parent, in global order
    pub fn top_level(&self) -> Vec<&Block> {
        self.siblings(None)
    }

    pub fn top_level_ids(&self) -> Vec<String> {
        self.top_level().into_iter().map(|b| b.id.clone()).collect()
    }

    pub fn children_of(&self, id: &str) -> Vec<&Block> {
        self.siblings(Some(id))
    }

    /// Highest position in the document
    pub fn max_position(&self) -> Option<f64> {
        self.blocks.last().map(|b| b.position)
    }

    /// Parent chain of a block, nearest first
    ///
    /// Stops at the first missing parent or at a repeated id.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id.to_string());

        let mut current = self.get_block(id).and_then(|b| b.parent_id.clone());
        while let Some(parent_id) = current {
            if !seen.insert(parent_id.clone()) {
                break;
            }
            current = self.get_block(&parent_id).and_then(|b| b.parent_id.clone());
            chain.push(parent_id);
        }

        chain
    }

    /// Whether `candidate` sits somewhere below `ancestor`
    pub fn is_descendant(&self, candidate: &str, ancestor: &str) -> bool {
        self.ancestors(candidate).iter().any(|id| id == ancestor)
    }

    fn sort_blocks(&mut self) {
        self.blocks.sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}
