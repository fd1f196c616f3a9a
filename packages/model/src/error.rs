//! Error types for the model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Block is missing an id")]
    MissingBlockId,

    #[error("Block {0} is missing a type")]
    MissingBlockType(String),

    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(String),

    #[error("Block {id} has a non-finite position ({position})")]
    InvalidPosition { id: String, position: f64 },
}
