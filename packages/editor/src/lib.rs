//! # Blockpad Editor
//!
//! Structural editing engine for Blockpad documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Block / Document / registry / JSON   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: intent → Command → History          │
//! │  - Reversible commands (create/move/...)    │
//! │  - Bounded undo/redo                        │
//! │  - Drag-and-drop placement resolution       │
//! │  - Selection + clipboard                    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ observers: view refresh, autosave, logging  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Position is the only order**: blocks form one flat list sorted by a
//!    fractional `position`; nesting is a `parent_id` filter over it
//! 2. **Every change is a command**: anything that mutates goes through
//!    `HistoryManager` and can be undone
//! 3. **Misses are not errors**: unknown ids and invalid drops return
//!    `false` and change nothing
//! 4. **Full refresh**: the view is rebuilt after each change
//!
//! ## Usage
//!
//! ```rust
//! use blockpad_editor::{DropTarget, Editor, EventLog};
//! use blockpad_model::{Block, Document};
//!
//! let mut doc = Document::new("doc-1", "Notes");
//! doc.add_block(Block::new("b1", "text", 0.0));
//! doc.add_block(Block::new("b2", "text", 1.0));
//! doc.add_block(Block::new("b3", "text", 2.0));
//!
//! let mut editor = Editor::new(doc);
//! let log = EventLog::new();
//! editor.subscribe(Box::new(log.clone()));
//!
//! // Drag b3 to the top
//! editor.begin_drag("b3").unwrap();
//! assert!(editor.drop_on(&DropTarget::gap(None, 0), None));
//! assert_eq!(editor.document().blocks()[0].id, "b3");
//! assert_eq!(log.names(), vec!["block:moved"]);
//!
//! assert!(editor.undo());
//! assert_eq!(editor.document().get_block("b3").unwrap().position, 2.0);
//! ```

mod autosave;
mod clipboard;
mod command;
mod commands;
mod config;
mod drag_drop;
mod engine;
mod errors;
mod events;
mod history;
mod selection;
mod view;

pub use autosave::AutosaveScheduler;
pub use clipboard::{ClipboardPayload, CLIPBOARD_VERSION};
pub use command::Command;
pub use commands::{
    CreateBlockCommand, DeleteBlockCommand, DuplicateBlockCommand, FormatAction, FormatTextCommand,
    MoveBlockCommand, UpdateBlockCommand,
};
pub use config::{EditorConfig, DEFAULT_AUTOSAVE_DEBOUNCE_MS, DEFAULT_CHILD_OFFSET};
pub use drag_drop::{BlockBounds, DragPayload, DragSession, DropRejection, DropResolver, DropTarget};
pub use engine::Editor;
pub use errors::{CommandError, EditorError};
pub use events::{EditorEvent, EditorObserver, EventBus, EventLog, TracingObserver};
pub use history::{HistoryManager, DEFAULT_HISTORY_LIMIT};
pub use selection::Selection;
pub use view::{DocumentView, TreeNode};
