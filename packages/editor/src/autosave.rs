//! Debounced autosave scheduling
//!
//! The scheduler only decides *when* a save is due. Writing the document is
//! left to the host, which polls [`AutosaveScheduler::is_due`] and calls
//! [`AutosaveScheduler::mark_saved`] once the write has been issued.

use crate::{EditorEvent, EditorObserver};
use blockpad_model::Document;
use chrono::{DateTime, Duration, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Default)]
struct AutosaveState {
    dirty: bool,
    last_change: Option<DateTime<Utc>>,
    last_version: u64,
    saves: usize,
}

/// Clonable handle; register one clone with the editor, poll another
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    debounce: Duration,
    state: Rc<RefCell<AutosaveState>>,
}

impl AutosaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            state: Rc::new(RefCell::new(AutosaveState::default())),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().dirty
    }

    pub fn last_change(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().last_change
    }

    /// Document version seen with the latest change
    pub fn last_version(&self) -> u64 {
        self.state.borrow().last_version
    }

    /// Dirty and quiet for at least the debounce interval
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let state = self.state.borrow();
        match state.last_change {
            Some(changed) if state.dirty => now - changed >= self.debounce,
            _ => false,
        }
    }

    pub fn mark_saved(&self) {
        let mut state = self.state.borrow_mut();
        state.dirty = false;
        state.saves += 1;
    }

    /// Number of saves acknowledged so far
    pub fn saves(&self) -> usize {
        self.state.borrow().saves
    }

    /// Record a change at an explicit time
    pub fn note_change(&self, at: DateTime<Utc>, version: u64) {
        let mut state = self.state.borrow_mut();
        state.dirty = true;
        state.last_change = Some(at);
        state.last_version = version;
    }
}

impl EditorObserver for AutosaveScheduler {
    fn on_event(&mut self, event: &EditorEvent, doc: &Document) {
        debug!(event = event.name(), version = doc.version, "autosave scheduled");
        self.note_change(Utc::now(), doc.version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_after_debounce() {
        let scheduler = AutosaveScheduler::new(Duration::milliseconds(2000));
        let t0 = Utc::now();
        assert!(!scheduler.is_due(t0));

        scheduler.note_change(t0, 3);
        assert!(scheduler.is_dirty());
        assert!(!scheduler.is_due(t0 + Duration::milliseconds(1999)));
        assert!(scheduler.is_due(t0 + Duration::milliseconds(2000)));
        assert_eq!(scheduler.last_version(), 3);
    }

    #[test]
    fn test_change_restarts_debounce() {
        let scheduler = AutosaveScheduler::new(Duration::seconds(2));
        let t0 = Utc::now();
        scheduler.note_change(t0, 1);
        scheduler.note_change(t0 + Duration::seconds(1), 2);
        assert!(!scheduler.is_due(t0 + Duration::seconds(2)));
        assert!(scheduler.is_due(t0 + Duration::seconds(3)));
    }

    #[test]
    fn test_mark_saved_clears_dirty() {
        let scheduler = AutosaveScheduler::new(Duration::zero());
        let mut observer = scheduler.clone();
        observer.on_event(
            &EditorEvent::BlockDeleted { block_id: "b".into() },
            &Document::new("doc", "Test"),
        );
        assert!(scheduler.is_dirty());

        scheduler.mark_saved();
        assert!(!scheduler.is_dirty());
        assert!(!scheduler.is_due(Utc::now()));
        assert_eq!(scheduler.saves(), 1);
    }
}
