//! Error types for the editor

use blockpad_model::ModelError;
use thiserror::Error;

/// A command could not run against the current document state
///
/// These only surface when the history and the document have drifted apart
/// (e.g. undoing a create whose block is already gone). Ordinary misses such
/// as unknown ids are reported by the engine as `false`/`None` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Block already exists: {0}")]
    DuplicateBlockId(String),

    #[error("Block {0} has no text payload")]
    NotText(String),

    #[error("Range {start}..{end} is invalid for block {block_id} (text length {len})")]
    InvalidRange {
        block_id: String,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Malformed payload on block {block_id}: {reason}")]
    MalformedPayload { block_id: String, reason: String },
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Block type must not be empty")]
    EmptyBlockType,

    #[error("Position must be finite, got {0}")]
    InvalidPosition(f64),

    #[error("Invalid drag payload: {0}")]
    InvalidDragPayload(serde_json::Error),

    #[error("Invalid clipboard payload: {0}")]
    InvalidClipboard(serde_json::Error),
}
