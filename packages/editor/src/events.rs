//! # Change Events
//!
//! Structural changes are announced to render/autosave/observability
//! collaborators through an explicit [`EventBus::emit`] call.
//!
//! ## Design
//!
//! - Events carry just enough to react without re-reading the document
//! - Observers run synchronously, in registration order, inside the call
//!   that caused the change
//! - Rejected operations (unknown ids, no-op moves, invalid drops) emit
//!   nothing

use blockpad_model::{Block, BlockData, Document, Placement};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Something that changed in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum EditorEvent {
    #[serde(rename = "block:created")]
    BlockCreated { block: Block },

    #[serde(rename = "block:deleted")]
    BlockDeleted { block_id: String },

    #[serde(rename = "block:updated")]
    BlockUpdated { block_id: String, data: BlockData },

    #[serde(rename = "block:moved")]
    BlockMoved {
        block_id: String,
        from: Placement,
        to: Placement,
    },

    #[serde(rename = "blocks:pasted")]
    BlocksPasted { block_ids: Vec<String> },

    #[serde(rename = "history:undo")]
    HistoryUndo { document_id: String, action: String },

    #[serde(rename = "history:redo")]
    HistoryRedo { document_id: String, action: String },
}

impl EditorEvent {
    /// Wire name of the event (`block:created`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            EditorEvent::BlockCreated { .. } => "block:created",
            EditorEvent::BlockDeleted { .. } => "block:deleted",
            EditorEvent::BlockUpdated { .. } => "block:updated",
            EditorEvent::BlockMoved { .. } => "block:moved",
            EditorEvent::BlocksPasted { .. } => "blocks:pasted",
            EditorEvent::HistoryUndo { .. } => "history:undo",
            EditorEvent::HistoryRedo { .. } => "history:redo",
        }
    }
}

/// Receives change events after the document has been updated
pub trait EditorObserver: std::fmt::Debug {
    fn on_event(&mut self, event: &EditorEvent, doc: &Document);
}

/// Fans events out to every registered observer
#[derive(Debug, Default)]
pub struct EventBus {
    observers: Vec<Box<dyn EditorObserver>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    pub fn emit(&mut self, event: EditorEvent, doc: &Document) {
        for observer in &mut self.observers {
            observer.on_event(&event, doc);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

/// Shared, clonable record of every event seen
///
/// Register one clone with the editor and keep another to inspect.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(EditorEvent::name).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EditorObserver for EventLog {
    fn on_event(&mut self, event: &EditorEvent, _doc: &Document) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Logs every event through `tracing`
#[derive(Debug, Default)]
pub struct TracingObserver;

impl EditorObserver for TracingObserver {
    fn on_event(&mut self, event: &EditorEvent, doc: &Document) {
        info!(
            event = event.name(),
            document = %doc.id,
            version = doc.version,
            blocks = doc.len(),
            "document changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let event = EditorEvent::BlockMoved {
            block_id: "b1".into(),
            from: Placement::new(0.0, None),
            to: Placement::new(2.5, Some("s1".into())),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "block:moved",
                "blockId": "b1",
                "from": { "position": 0.0, "parentId": null },
                "to": { "position": 2.5, "parentId": "s1" }
            })
        );
    }

    #[test]
    fn test_bus_delivers_to_all_observers() {
        let doc = Document::new("doc", "Test");
        let first = EventLog::new();
        let second = EventLog::new();

        let mut bus = EventBus::new();
        bus.subscribe(Box::new(first.clone()));
        bus.subscribe(Box::new(second.clone()));
        bus.subscribe(Box::new(TracingObserver));
        assert_eq!(bus.len(), 3);

        bus.emit(EditorEvent::BlockDeleted { block_id: "x".into() }, &doc);

        assert_eq!(first.names(), vec!["block:deleted"]);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_event_log_clear() {
        let log = EventLog::new();
        let mut observer = log.clone();
        observer.on_event(
            &EditorEvent::BlocksPasted { block_ids: vec![] },
            &Document::new("doc", "Test"),
        );
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }
}
