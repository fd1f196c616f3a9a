use crate::CommandError;
use blockpad_model::Document;
use std::fmt::Debug;

/// Reversible unit of document mutation
///
/// Each command implements both directions symmetrically:
/// - `execute` applies the change (and is called again on redo)
/// - `undo` restores the state captured before `execute`
///
/// A command that returns an error must leave the document untouched.
pub trait Command: Debug {
    /// Apply this command to the document
    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError>;

    /// Revert a previous `execute`
    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError>;

    /// Stable machine-readable name
    fn name(&self) -> &'static str;

    /// Human-readable label for undo/redo menus
    fn description(&self) -> String {
        self.name().to_string()
    }
}
