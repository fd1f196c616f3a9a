//! # Drag-and-Drop Reordering
//!
//! Turns a drag payload plus a drop target into a new placement
//! (`position`, `parent_id`) for the dragged block.
//!
//! ## Drop targets
//!
//! - **Gap** between siblings at `index` (0 = before the first sibling,
//!   `len` = after the last). The index counts the sibling list as rendered,
//!   i.e. including the dragged block. When the dragged block sits above the
//!   gap in the same group, the index is shifted down by one to compensate
//!   for its removal.
//! - **Block body**: past the vertical midpoint of a container the block is
//!   reparented inside it; anywhere else it is inserted before the target.
//!
//! ## Safety checks (before any position math)
//!
//! - The source must exist and not be protected
//! - No self-drop
//! - The target (or gap parent) must exist and not be protected
//! - The target must not be the dragged block or one of its descendants
//!
//! A rejected drop leaves the document untouched.

use crate::EditorError;
use blockpad_model::{Block, BlockTypeRegistry, Document, Placement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data carried across the drag boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub block_id: String,

    #[serde(rename = "type")]
    pub block_type: String,

    pub position: f64,
}

impl DragPayload {
    pub fn from_block(block: &Block) -> Self {
        Self {
            block_id: block.id.clone(),
            block_type: block.block_type.clone(),
            position: block.position,
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        serde_json::to_string(self).map_err(EditorError::InvalidDragPayload)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(EditorError::InvalidDragPayload)
    }
}

/// In-memory mirror of the active drag
///
/// Hosts that cannot read the serialized transfer data mid-drag fall back to
/// this side channel.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active: Option<DragPayload>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, payload: DragPayload) {
        self.active = Some(payload);
    }

    pub fn active(&self) -> Option<&DragPayload> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Abandon the drag; nothing has been applied yet
    pub fn cancel(&mut self) -> Option<DragPayload> {
        self.active.take()
    }

    /// Payload for a drop: serialized transfer data first, then the mirror
    pub fn resolve_payload(&self, transfer: Option<&str>) -> Option<DragPayload> {
        transfer
            .and_then(|json| DragPayload::from_json(json).ok())
            .or_else(|| self.active.clone())
    }
}

/// Vertical extent of a rendered block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockBounds {
    pub top: f64,
    pub height: f64,
}

impl BlockBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Where the pointer was released
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DropTarget {
    /// Gap indicator between siblings of `parent_id`
    Gap {
        #[serde(default)]
        parent_id: Option<String>,
        index: usize,
    },

    /// Body of an existing block
    Block {
        target_id: String,
        pointer_y: f64,
        bounds: BlockBounds,
    },
}

impl DropTarget {
    pub fn gap(parent_id: Option<&str>, index: usize) -> Self {
        DropTarget::Gap {
            parent_id: parent_id.map(str::to_string),
            index,
        }
    }

    pub fn block(target_id: impl Into<String>, pointer_y: f64, bounds: BlockBounds) -> Self {
        DropTarget::Block {
            target_id: target_id.into(),
            pointer_y,
            bounds,
        }
    }
}

/// Why a drop was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropRejection {
    UnknownSource(String),
    ProtectedSource(String),
    SelfDrop(String),
    UnknownTarget(String),
    ProtectedTarget(String),
    Cycle { dragged: String, target: String },
}

impl fmt::Display for DropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropRejection::UnknownSource(id) => write!(f, "unknown drag source {id}"),
            DropRejection::ProtectedSource(id) => write!(f, "block {id} is protected"),
            DropRejection::SelfDrop(id) => write!(f, "block {id} dropped onto itself"),
            DropRejection::UnknownTarget(id) => write!(f, "unknown drop target {id}"),
            DropRejection::ProtectedTarget(id) => write!(f, "drop target {id} is protected"),
            DropRejection::Cycle { dragged, target } => {
                write!(f, "{target} is inside {dragged}")
            }
        }
    }
}

/// Computes placements for drops against one document state
#[derive(Debug, Clone, Copy)]
pub struct DropResolver<'a> {
    doc: &'a Document,
    registry: &'a BlockTypeRegistry,
    child_offset: f64,
}

impl<'a> DropResolver<'a> {
    pub fn new(doc: &'a Document, registry: &'a BlockTypeRegistry, child_offset: f64) -> Self {
        Self {
            doc,
            registry,
            child_offset,
        }
    }

    /// Resolve `target` for the block named by `payload`
    pub fn resolve(
        &self,
        payload: &DragPayload,
        target: &DropTarget,
    ) -> Result<Placement, DropRejection> {
        let dragged = self.source(&payload.block_id)?;

        match target {
            DropTarget::Gap { parent_id, index } => {
                self.resolve_gap(dragged, parent_id.as_deref(), *index)
            }
            DropTarget::Block {
                target_id,
                pointer_y,
                bounds,
            } => self.resolve_body(dragged, target_id, *pointer_y, bounds),
        }
    }

    fn source(&self, id: &str) -> Result<&'a Block, DropRejection> {
        let block = self
            .doc
            .get_block(id)
            .ok_or_else(|| DropRejection::UnknownSource(id.to_string()))?;

        if block.protected {
            return Err(DropRejection::ProtectedSource(id.to_string()));
        }
        Ok(block)
    }

    /// Existence, protection and cycle checks for a block-valued target
    fn target(&self, dragged: &Block, target_id: &str) -> Result<&'a Block, DropRejection> {
        if dragged.id == target_id {
            return Err(DropRejection::SelfDrop(target_id.to_string()));
        }

        let target = self
            .doc
            .get_block(target_id)
            .ok_or_else(|| DropRejection::UnknownTarget(target_id.to_string()))?;

        if target.protected {
            return Err(DropRejection::ProtectedTarget(target_id.to_string()));
        }

        if self.doc.is_descendant(target_id, &dragged.id) {
            return Err(DropRejection::Cycle {
                dragged: dragged.id.clone(),
                target: target_id.to_string(),
            });
        }

        Ok(target)
    }

    fn resolve_gap(
        &self,
        dragged: &Block,
        parent_id: Option<&str>,
        index: usize,
    ) -> Result<Placement, DropRejection> {
        let parent = match parent_id {
            Some(parent_id) => Some(self.target(dragged, parent_id)?),
            None => None,
        };

        let group = self.doc.siblings(parent_id);
        let mut index = index.min(group.len());

        // Dragging downward: the source vacates a slot above the gap
        if let Some(source_index) = group.iter().position(|b| b.id == dragged.id) {
            if source_index < index {
                index -= 1;
            }
        }

        let neighbours: Vec<&Block> = group.into_iter().filter(|b| b.id != dragged.id).collect();

        let position = if neighbours.is_empty() {
            match parent {
                Some(parent) => parent.position + self.child_offset,
                None => 0.0,
            }
        } else {
            position_at(&neighbours, index)
        };

        Ok(Placement::new(position, parent_id.map(str::to_string)))
    }

    fn resolve_body(
        &self,
        dragged: &Block,
        target_id: &str,
        pointer_y: f64,
        bounds: &BlockBounds,
    ) -> Result<Placement, DropRejection> {
        let target = self.target(dragged, target_id)?;

        if pointer_y > bounds.midpoint() && self.registry.is_container(&target.block_type) {
            return Ok(self.inside(dragged, target));
        }

        // Inserting before a child reparents into the child's parent
        if let Some(parent_id) = target.parent_id.as_deref() {
            if dragged.parent_id.as_deref() != Some(parent_id) {
                self.target(dragged, parent_id)?;
            }
        }

        Ok(self.before(dragged, target))
    }

    /// Append as the last child of a container
    fn inside(&self, dragged: &Block, container: &Block) -> Placement {
        let max_child = self
            .doc
            .children_of(&container.id)
            .into_iter()
            .filter(|b| b.id != dragged.id)
            .map(|b| b.position)
            .reduce(f64::max);

        let position = match max_child {
            Some(max) => max + 1.0,
            None => container.position + self.child_offset,
        };

        Placement::new(position, Some(container.id.clone()))
    }

    /// Insert directly before `target` within its parent group
    fn before(&self, dragged: &Block, target: &Block) -> Placement {
        let neighbours: Vec<&Block> = self
            .doc
            .siblings(target.parent_id.as_deref())
            .into_iter()
            .filter(|b| b.id != dragged.id)
            .collect();

        let index = neighbours
            .iter()
            .position(|b| b.id == target.id)
            .unwrap_or(0);

        Placement::new(position_at(&neighbours, index), target.parent_id.clone())
    }
}

/// Fractional key for inserting at `index` of a non-empty, ordered list
fn position_at(neighbours: &[&Block], index: usize) -> f64 {
    match (index.checked_sub(1).and_then(|i| neighbours.get(i)), neighbours.get(index)) {
        (None, Some(next)) => next.position - 1.0,
        (Some(prev), None) => prev.position + 1.0,
        (Some(prev), Some(next)) => (prev.position + next.position) / 2.0,
        (None, None) => 0.0,
    }
}
