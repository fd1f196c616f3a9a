//! Clipboard payloads exchanged with the host

use crate::EditorError;
use blockpad_model::Block;
use serde::{Deserialize, Serialize};

pub const CLIPBOARD_VERSION: u32 = 1;

/// Serialized block records on the system clipboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    pub version: u32,
    pub blocks: Vec<Block>,
}

impl ClipboardPayload {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            version: CLIPBOARD_VERSION,
            blocks,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        serde_json::to_string(self).map_err(EditorError::InvalidClipboard)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(EditorError::InvalidClipboard)
    }
}

impl Default for ClipboardPayload {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
