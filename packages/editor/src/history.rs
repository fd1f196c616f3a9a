//! # Undo/Redo History
//!
//! Tracks executed commands and enables undo/redo.
//!
//! ## Design
//!
//! - `execute` runs a command, pushes it onto the undo stack and clears redo
//!   (linear history: a new action discards the undone branch)
//! - `undo` reverts the newest command and moves it to the redo stack
//! - `redo` re-executes the newest undone command and moves it back
//! - Both stacks are bounded ring buffers; pushing past the limit silently
//!   evicts the oldest entry, counted by [`HistoryManager::evictions`]
//!
//! ## Example
//!
//! ```rust
//! use blockpad_editor::{CreateBlockCommand, HistoryManager};
//! use blockpad_model::{Block, Document};
//!
//! let mut doc = Document::new("doc", "Notes");
//! let mut history = HistoryManager::new();
//!
//! history
//!     .execute(Box::new(CreateBlockCommand::new(Block::new("b1", "text", 0.0))), &mut doc)
//!     .unwrap();
//! assert!(history.undo(&mut doc).unwrap());
//! assert!(doc.is_empty());
//! assert!(history.redo(&mut doc).unwrap());
//! assert!(doc.contains("b1"));
//! ```

use crate::{Command, CommandError};
use blockpad_model::Document;
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Bounded undo/redo stacks of executed commands
#[derive(Debug)]
pub struct HistoryManager {
    /// Applied commands (most recent last)
    undo_stack: VecDeque<Box<dyn Command>>,

    /// Undone commands (most recent last)
    redo_stack: VecDeque<Box<dyn Command>>,

    /// Capacity of each stack (at least 1)
    limit: usize,

    /// Entries dropped off the bottom of either stack
    evictions: usize,
}

impl HistoryManager {
    /// Create a history with the default limit (1000)
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a history with a custom limit (clamped to at least 1)
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(limit.min(64)),
            redo_stack: VecDeque::new(),
            limit,
            evictions: 0,
        }
    }

    /// Execute a command and record it for undo
    ///
    /// A command that fails is not recorded and the redo stack is kept.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        doc: &mut Document,
    ) -> Result<(), CommandError> {
        command.execute(doc)?;
        debug!(command = command.name(), "executed");

        self.redo_stack.clear();
        Self::push_bounded(&mut self.undo_stack, command, self.limit, &mut self.evictions);
        Ok(())
    }

    /// Undo the most recent command
    ///
    /// Returns `Ok(false)` when there is nothing to undo. On error the
    /// command goes back onto the undo stack.
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(err) = command.undo(doc) {
            self.undo_stack.push_back(command);
            return Err(err);
        }
        debug!(command = command.name(), "undone");

        Self::push_bounded(&mut self.redo_stack, command, self.limit, &mut self.evictions);
        Ok(true)
    }

    /// Redo the most recently undone command
    ///
    /// Returns `Ok(false)` when there is nothing to redo. On error the
    /// command goes back onto the redo stack.
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(err) = command.execute(doc) {
            self.redo_stack.push_back(command);
            return Err(err);
        }
        debug!(command = command.name(), "redone");

        Self::push_bounded(&mut self.undo_stack, command, self.limit, &mut self.evictions);
        Ok(true)
    }

    fn push_bounded(
        stack: &mut VecDeque<Box<dyn Command>>,
        command: Box<dyn Command>,
        limit: usize,
        evictions: &mut usize,
    ) {
        if stack.len() >= limit {
            if let Some(evicted) = stack.pop_front() {
                *evictions += 1;
                debug!(
                    command = evicted.name(),
                    limit,
                    "history limit reached, evicting oldest entry"
                );
            }
        }
        stack.push_back(command);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the command the next `undo` would revert
    pub fn undo_label(&self) -> Option<String> {
        self.undo_stack.back().map(|command| command.description())
    }

    /// Label of the command the next `redo` would re-apply
    pub fn redo_label(&self) -> Option<String> {
        self.redo_stack.back().map(|command| command.description())
    }

    /// Names of the undoable commands, oldest first
    pub fn undo_names(&self) -> Vec<&'static str> {
        self.undo_stack.iter().map(|command| command.name()).collect()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Total entries evicted by the capacity bound
    pub fn evictions(&self) -> usize {
        self.evictions
    }

    /// Drop all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
