//! # Blockpad Model
//!
//! The block/document data model shared by the editor and its collaborators.
//!
//! ## Layout
//!
//! ```text
//! Document
//!  ├─ metadata (id, title, version, timestamps, author, permissions)
//!  └─ blocks: flat Vec<Block>, sorted by global `position`
//!        Block { id, type, position, parent_id, protected, data }
//! ```
//!
//! The block collection is one flat list ordered by `position` regardless of
//! `parent_id`. Sibling views (top-level blocks, children of a container) are
//! filters over that single order, so `position` is the only source of truth
//! for ordering.
//!
//! ## Usage
//!
//! ```rust
//! use blockpad_model::{Block, BlockPatch, Document};
//!
//! let mut doc = Document::new("doc-1", "Notes");
//! doc.add_block(Block::new("b1", "text", 1.0));
//! doc.add_block(Block::new("b0", "header", 0.0));
//!
//! let order: Vec<_> = doc.blocks().iter().map(|b| b.id.as_str()).collect();
//! assert_eq!(order, ["b0", "b1"]);
//!
//! assert!(doc.update_block("b1", BlockPatch::position(-1.0)));
//! assert_eq!(doc.blocks()[0].id, "b1");
//! ```

mod block;
mod document;
mod error;
pub mod format;
mod id_generator;
mod registry;
mod serializer;

pub use block::{Block, BlockData, BlockPatch, Placement};
pub use document::{Document, Permissions};
pub use error::ModelError;
pub use format::{FormatSpan, InlineFormat};
pub use id_generator::IdGenerator;
pub use registry::{BlockTypeConfig, BlockTypeRegistry};
pub use serializer::{SerializedContent, SerializedDocument};
