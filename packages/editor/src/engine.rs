//! # Editor
//!
//! Owns a document together with everything needed to edit it: history,
//! selection, block types, id generation, observers, the active drag and
//! the materialized view.
//!
//! ## Flow
//!
//! ```text
//! user intent ─→ Editor method ─→ Command ─→ HistoryManager ─→ Document
//!                                                                  │
//!                       observers ←─ EventBus ←─ refresh (view, selection)
//! ```
//!
//! Lookups that miss (unknown ids) and rejected transitions (no-op moves,
//! cyclic reparenting, invalid drops) return `false`/`None` and leave the
//! document, history and observers untouched.

use crate::{
    ClipboardPayload, Command, CreateBlockCommand, DeleteBlockCommand, DocumentView, DragPayload,
    DragSession, DropResolver, DropTarget, DuplicateBlockCommand, EditorConfig, EditorError,
    EditorEvent, EditorObserver, EventBus, FormatAction, FormatTextCommand, HistoryManager,
    MoveBlockCommand, Selection, UpdateBlockCommand,
};
use blockpad_model::{
    Block, BlockData, BlockPatch, BlockTypeRegistry, Document, IdGenerator, InlineFormat, Placement,
};
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Editor {
    document: Document,
    history: HistoryManager,
    selection: Selection,
    registry: BlockTypeRegistry,
    ids: IdGenerator,
    events: EventBus,
    drag: DragSession,
    view: DocumentView,
    config: EditorConfig,
}

impl Editor {
    /// Edit `document` with the default configuration
    pub fn new(document: Document) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: Document, config: EditorConfig) -> Self {
        let view = DocumentView::build(&document);
        Self {
            history: HistoryManager::with_limit(config.history_limit),
            registry: config.registry(),
            selection: Selection::new(),
            ids: IdGenerator::default(),
            events: EventBus::new(),
            drag: DragSession::new(),
            document,
            view,
            config,
        }
    }

    /// Load a serialized document
    pub fn from_json(json: &str, config: EditorConfig) -> Result<Self, EditorError> {
        let document = Document::from_json(json)?;
        Ok(Self::with_config(document, config))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &DocumentView {
        &self.view
    }

    pub fn registry(&self) -> &BlockTypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    /// Register an observer for change events
    pub fn subscribe(&mut self, observer: Box<dyn EditorObserver>) {
        self.events.subscribe(observer);
    }

    // ------------------------------------------------------------------
    // Block lifecycle
    // ------------------------------------------------------------------

    /// Create a top-level block
    ///
    /// Without a position the block is appended after the last block.
    /// `initial_data` wins over the type's defaults.
    pub fn create_block(
        &mut self,
        block_type: &str,
        position: Option<f64>,
        initial_data: Option<BlockData>,
    ) -> Result<String, EditorError> {
        let position = position.unwrap_or_else(|| self.end_position());
        self.insert(block_type, position, None, initial_data)
    }

    /// Create a block as the last child of `parent_id`
    ///
    /// Returns `Ok(None)` when the parent does not exist.
    pub fn create_child_block(
        &mut self,
        parent_id: &str,
        block_type: &str,
        initial_data: Option<BlockData>,
    ) -> Result<Option<String>, EditorError> {
        let Some(parent) = self.document.get_block(parent_id) else {
            debug!(parent_id, "create child: unknown parent");
            return Ok(None);
        };

        let position = self
            .document
            .children_of(parent_id)
            .into_iter()
            .map(|b| b.position)
            .reduce(f64::max)
            .map_or(parent.position + self.config.child_offset, |max| max + 1.0);

        self.insert(block_type, position, Some(parent_id.to_string()), initial_data)
            .map(Some)
    }

    fn insert(
        &mut self,
        block_type: &str,
        position: f64,
        parent_id: Option<String>,
        initial_data: Option<BlockData>,
    ) -> Result<String, EditorError> {
        if block_type.is_empty() {
            return Err(EditorError::EmptyBlockType);
        }
        if !position.is_finite() {
            return Err(EditorError::InvalidPosition(position));
        }

        let mut data = self.registry.defaults_for(block_type);
        if let Some(initial) = initial_data {
            data.extend(initial);
        }

        let mut block = Block::new(self.next_id(), block_type, position).with_data(data);
        block.parent_id = parent_id;

        self.history
            .execute(Box::new(CreateBlockCommand::new(block.clone())), &mut self.document)?;

        let id = block.id.clone();
        self.refresh();
        self.emit(EditorEvent::BlockCreated { block });
        Ok(id)
    }

    /// Delete a block; children keep their `parent_id`
    pub fn delete_block(&mut self, id: &str) -> bool {
        let Some(command) = DeleteBlockCommand::capture(&self.document, id) else {
            return false;
        };

        if !self.record(Box::new(command)) {
            return false;
        }
        self.refresh();
        self.emit(EditorEvent::BlockDeleted { block_id: id.to_string() });
        true
    }

    /// Reposition a block within its current parent
    pub fn move_block(&mut self, id: &str, to_position: f64) -> bool {
        let Some(parent_id) = self.document.get_block(id).map(|b| b.parent_id.clone()) else {
            return false;
        };
        self.move_block_to(id, to_position, parent_id.as_deref())
    }

    /// Reposition and reparent a block
    pub fn move_block_to(&mut self, id: &str, to_position: f64, to_parent: Option<&str>) -> bool {
        let Some(block) = self.document.get_block(id) else {
            return false;
        };

        if !to_position.is_finite() {
            debug!(block_id = id, to_position, "move rejected: non-finite position");
            return false;
        }

        let from = block.placement();
        let to = Placement::new(to_position, to_parent.map(str::to_string));
        if from == to {
            debug!(block_id = id, "move skipped: placement unchanged");
            return false;
        }

        if let Some(parent_id) = to_parent {
            if parent_id == id || self.document.is_descendant(parent_id, id) {
                debug!(block_id = id, parent_id, "move rejected: cyclic reparent");
                return false;
            }
        }

        let command = MoveBlockCommand::new(id, from.clone(), to.clone());
        if !self.record(Box::new(command)) {
            return false;
        }
        self.refresh();
        self.emit(EditorEvent::BlockMoved {
            block_id: id.to_string(),
            from,
            to,
        });
        true
    }

    /// Merge `data` into a block's payload
    pub fn update_block(&mut self, id: &str, data: BlockData) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        self.apply_patch(id, BlockPatch::data(data))
    }

    /// Toggle drag-and-drop protection
    ///
    /// Returns `false` when the block is unknown or already has `protected`.
    pub fn set_protected(&mut self, id: &str, protected: bool) -> bool {
        let changed = self.document.get_block(id).is_some_and(|b| b.protected != protected);
        if !changed {
            return false;
        }
        self.apply_patch(id, BlockPatch::protected(protected))
    }

    fn apply_patch(&mut self, id: &str, patch: BlockPatch) -> bool {
        if !self.record(Box::new(UpdateBlockCommand::new(id, patch))) {
            return false;
        }
        self.refresh();
        self.emit_updated(id);
        true
    }

    /// Copy a block next to itself under the same parent
    pub fn duplicate_block(&mut self, id: &str) -> Option<String> {
        let source = self.document.get_block(id)?.clone();

        let siblings = self.document.siblings(source.parent_id.as_deref());
        let next = siblings
            .iter()
            .position(|b| b.id == source.id)
            .and_then(|i| siblings.get(i + 1))
            .map(|b| b.position);
        let position = match next {
            Some(next) => (source.position + next) / 2.0,
            None => source.position + 1.0,
        };

        let new_id = self.next_id();
        let command = DuplicateBlockCommand::new(&source, new_id.clone(), position);
        let block = command.copy().clone();

        if !self.record(Box::new(command)) {
            return None;
        }
        self.refresh();
        self.emit(EditorEvent::BlockCreated { block });
        Some(new_id)
    }

    /// Apply or remove an inline format over a character range of a text block
    pub fn format_text(
        &mut self,
        id: &str,
        range: Range<usize>,
        format: InlineFormat,
        action: FormatAction,
    ) -> bool {
        if !self.document.contains(id) {
            return false;
        }

        let command = FormatTextCommand::new(id, range, format, action);
        if let Err(err) = self.history.execute(Box::new(command), &mut self.document) {
            debug!(block_id = id, error = %err, "format rejected");
            return false;
        }
        self.refresh();
        self.emit_updated(id);
        true
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Selected records in document order
    pub fn copy_selection(&self) -> ClipboardPayload {
        self.copy_blocks(self.selection.ids())
    }

    /// Records for `ids` in document order; unknown ids are skipped
    pub fn copy_blocks<S: AsRef<str>>(&self, ids: &[S]) -> ClipboardPayload {
        let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        let blocks = self
            .document
            .blocks()
            .iter()
            .filter(|b| wanted.contains(b.id.as_str()))
            .cloned()
            .collect();
        ClipboardPayload::new(blocks)
    }

    /// Insert copies of `records` at consecutive positions
    ///
    /// Each record becomes its own `create_block`, so undo steps through the
    /// pasted blocks one at a time. Without an anchor the run is appended.
    pub fn paste_blocks(&mut self, records: &[Block], anchor_position: Option<f64>) -> Vec<String> {
        let start = anchor_position.unwrap_or_else(|| self.end_position());

        let mut created = Vec::with_capacity(records.len());
        for (offset, record) in records.iter().enumerate() {
            let position = start + offset as f64;
            match self.create_block(&record.block_type, Some(position), Some(record.data.clone())) {
                Ok(id) => created.push(id),
                Err(err) => debug!(source_id = %record.id, error = %err, "paste skipped record"),
            }
        }

        if !created.is_empty() {
            self.emit(EditorEvent::BlocksPasted {
                block_ids: created.clone(),
            });
        }
        created
    }

    /// Paste so the run ends just before the selection, or at the end
    pub fn paste(&mut self, payload: &ClipboardPayload) -> Vec<String> {
        if payload.is_empty() {
            return Vec::new();
        }

        let anchor = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.document.get_block(id))
            .map(|b| b.position)
            .reduce(f64::min)
            .map(|min| (min - payload.len() as f64).max(0.0));

        self.paste_blocks(&payload.blocks, anchor)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let action = self.history.undo_label().unwrap_or_default();
        match self.history.undo(&mut self.document) {
            Ok(true) => {
                self.refresh();
                self.emit(EditorEvent::HistoryUndo {
                    document_id: self.document.id.clone(),
                    action,
                });
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(error = %err, action = %action, "undo failed");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        let action = self.history.redo_label().unwrap_or_default();
        match self.history.redo(&mut self.document) {
            Ok(true) => {
                self.refresh();
                self.emit(EditorEvent::HistoryRedo {
                    document_id: self.document.id.clone(),
                    action,
                });
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(error = %err, action = %action, "redo failed");
                false
            }
        }
    }

    /// Rebuild the view and drop selected ids that no longer exist
    pub fn refresh(&mut self) {
        let dropped = self.selection.retain_existing(&self.document);
        if dropped > 0 {
            debug!(dropped, "selection re-synced");
        }
        self.view = DocumentView::build(&self.document);
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select(&mut self, id: &str) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        self.selection.select(id);
        true
    }

    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Select the run of top-level siblings between `anchor` and `target`
    pub fn select_range(&mut self, anchor: &str, target: &str) -> bool {
        if !self.document.contains(anchor) || !self.document.contains(target) {
            return false;
        }
        let siblings = self.document.top_level_ids();
        self.selection.select_range(anchor, target, &siblings);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Pick up a block; protected and unknown blocks cannot be dragged
    pub fn begin_drag(&mut self, id: &str) -> Option<DragPayload> {
        let block = self.document.get_block(id)?;
        if block.protected {
            debug!(block_id = id, "drag refused: protected");
            return None;
        }

        let payload = DragPayload::from_block(block);
        self.drag.begin(payload.clone());
        Some(payload)
    }

    /// Abandon the active drag without touching the document
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel().is_some()
    }

    /// Finish a drag over `target`
    ///
    /// `transfer` is the serialized payload, if the host could read it. The
    /// active drag ends whether or not the drop is accepted.
    pub fn drop_on(&mut self, target: &DropTarget, transfer: Option<&str>) -> bool {
        let payload = self.drag.resolve_payload(transfer);
        self.drag.cancel();

        let Some(payload) = payload else {
            debug!("drop ignored: no drag payload");
            return false;
        };

        let resolved = DropResolver::new(&self.document, &self.registry, self.config.child_offset)
            .resolve(&payload, target);

        match resolved {
            Ok(placement) => self.move_block_to(
                &payload.block_id,
                placement.position,
                placement.parent_id.as_deref(),
            ),
            Err(rejection) => {
                debug!(block_id = %payload.block_id, %rejection, "drop rejected");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn record(&mut self, command: Box<dyn Command>) -> bool {
        match self.history.execute(command, &mut self.document) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "command failed");
                false
            }
        }
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.emit(event, &self.document);
    }

    fn emit_updated(&mut self, id: &str) {
        let Some(data) = self.document.get_block(id).map(|b| b.data.clone()) else {
            return;
        };
        self.emit(EditorEvent::BlockUpdated {
            block_id: id.to_string(),
            data,
        });
    }

    /// Position just past the last block, or 0 for an empty document
    fn end_position(&self) -> f64 {
        self.document.max_position().map_or(0.0, |max| max + 1.0)
    }

    fn next_id(&mut self) -> String {
        loop {
            let id = self.ids.new_id();
            if !self.document.contains(&id) {
                return id;
            }
        }
    }
}
