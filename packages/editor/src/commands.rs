//! # Block Commands
//!
//! Concrete reversible operations on a [`Document`].
//!
//! ## Command Semantics
//!
//! ### Create
//! - Inserts a fully-formed record; undo removes it by id
//! - Redo re-inserts the same record, so the id survives undo/redo
//!
//! ### Delete
//! - Holds a snapshot of the full record taken before deletion
//! - Undo re-inserts the snapshot unchanged
//! - Children are not cascaded; they keep their `parent_id`
//!
//! ### Move
//! - Records both placements (`from`, `to`); execute/undo swap between them
//!
//! ### Update
//! - Applies a `BlockPatch`; undo restores the record captured at execute time
//!
//! ### Duplicate
//! - A `Create` over a cloned record with a fresh id
//!
//! ### Format
//! - Applies or removes an inline format over a character range
//! - Captures the prior `formats` value so undo is exact

use crate::{Command, CommandError};
use blockpad_model::format::{self, FORMATS_KEY};
use blockpad_model::{Block, BlockPatch, Document, InlineFormat, Placement};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Range;

/// Insert a new block
#[derive(Debug, Clone)]
pub struct CreateBlockCommand {
    block: Block,
}

impl CreateBlockCommand {
    pub fn new(block: Block) -> Self {
        Self { block }
    }

    pub fn block(&self) -> &Block {
        &self.block
    }
}

impl Command for CreateBlockCommand {
    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if doc.contains(&self.block.id) {
            return Err(CommandError::DuplicateBlockId(self.block.id.clone()));
        }
        doc.add_block(self.block.clone());
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        doc.remove_block(&self.block.id)
            .map(|_| ())
            .ok_or_else(|| CommandError::BlockNotFound(self.block.id.clone()))
    }

    fn name(&self) -> &'static str {
        "create-block"
    }

    fn description(&self) -> String {
        format!("Create {} block", self.block.block_type)
    }
}

/// Remove a block, keeping its full record for undo
#[derive(Debug, Clone)]
pub struct DeleteBlockCommand {
    snapshot: Block,
}

impl DeleteBlockCommand {
    /// Snapshot the current record of `id`
    pub fn capture(doc: &Document, id: &str) -> Option<Self> {
        doc.get_block(id).map(|block| Self {
            snapshot: block.clone(),
        })
    }

    pub fn snapshot(&self) -> &Block {
        &self.snapshot
    }
}

impl Command for DeleteBlockCommand {
    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        doc.remove_block(&self.snapshot.id)
            .map(|_| ())
            .ok_or_else(|| CommandError::BlockNotFound(self.snapshot.id.clone()))
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if doc.contains(&self.snapshot.id) {
            return Err(CommandError::DuplicateBlockId(self.snapshot.id.clone()));
        }
        doc.add_block(self.snapshot.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "delete-block"
    }

    fn description(&self) -> String {
        format!("Delete {} block", self.snapshot.block_type)
    }
}

/// Reposition and/or reparent a block
#[derive(Debug, Clone)]
pub struct MoveBlockCommand {
    block_id: String,
    from: Placement,
    to: Placement,
}

impl MoveBlockCommand {
    pub fn new(block_id: impl Into<String>, from: Placement, to: Placement) -> Self {
        Self {
            block_id: block_id.into(),
            from,
            to,
        }
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn from(&self) -> &Placement {
        &self.from
    }

    pub fn to(&self) -> &Placement {
        &self.to
    }

    fn place(&self, doc: &mut Document, placement: &Placement) -> Result<(), CommandError> {
        if doc.update_block(&self.block_id, BlockPatch::placement(placement.clone())) {
            Ok(())
        } else {
            Err(CommandError::BlockNotFound(self.block_id.clone()))
        }
    }
}

impl Command for MoveBlockCommand {
    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.place(doc, &self.to.clone())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.place(doc, &self.from.clone())
    }

    fn name(&self) -> &'static str {
        "move-block"
    }

    fn description(&self) -> String {
        "Move block".to_string()
    }
}

/// Apply a partial update; undo restores the whole prior record
#[derive(Debug, Clone)]
pub struct UpdateBlockCommand {
    block_id: String,
    patch: BlockPatch,
    previous: Option<Block>,
}

impl UpdateBlockCommand {
    pub fn new(block_id: impl Into<String>, patch: BlockPatch) -> Self {
        Self {
            block_id: block_id.into(),
            patch,
            previous: None,
        }
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }
}

impl Command for UpdateBlockCommand {
    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        let current = doc
            .get_block(&self.block_id)
            .cloned()
            .ok_or_else(|| CommandError::BlockNotFound(self.block_id.clone()))?;

        self.previous = Some(current);
        doc.update_block(&self.block_id, self.patch.clone());
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        let previous = self
            .previous
            .clone()
            .ok_or_else(|| CommandError::BlockNotFound(self.block_id.clone()))?;

        if doc.replace_block(previous) {
            Ok(())
        } else {
            Err(CommandError::BlockNotFound(self.block_id.clone()))
        }
    }

    fn name(&self) -> &'static str {
        "update-block"
    }

    fn description(&self) -> String {
        if self.patch.protected.is_some() && self.patch.data.is_none() {
            "Change block protection".to_string()
        } else {
            "Edit block".to_string()
        }
    }
}

/// Insert a copy of an existing block
#[derive(Debug, Clone)]
pub struct DuplicateBlockCommand {
    source_id: String,
    create: CreateBlockCommand,
}

impl DuplicateBlockCommand {
    /// Clone `source` under `new_id` at `position`, keeping its parent
    pub fn new(source: &Block, new_id: impl Into<String>, position: f64) -> Self {
        let mut copy = source.clone();
        copy.id = new_id.into();
        copy.position = position;

        Self {
            source_id: source.id.clone(),
            create: CreateBlockCommand::new(copy),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn copy(&self) -> &Block {
        self.create.block()
    }
}

impl Command for DuplicateBlockCommand {
    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.create.execute(doc)
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.create.undo(doc)
    }

    fn name(&self) -> &'static str {
        "duplicate-block"
    }

    fn description(&self) -> String {
        format!("Duplicate {} block", self.copy().block_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatAction {
    Apply,
    Remove,
}

/// Apply or remove an inline format over a character range of a text block
#[derive(Debug, Clone)]
pub struct FormatTextCommand {
    block_id: String,
    range: Range<usize>,
    format: InlineFormat,
    action: FormatAction,

    /// Prior `formats` value; inner `None` means the key was absent
    previous: Option<Option<Value>>,
}

impl FormatTextCommand {
    pub fn new(
        block_id: impl Into<String>,
        range: Range<usize>,
        format: InlineFormat,
        action: FormatAction,
    ) -> Self {
        Self {
            block_id: block_id.into(),
            range,
            format,
            action,
            previous: None,
        }
    }

    fn malformed(&self, reason: impl ToString) -> CommandError {
        CommandError::MalformedPayload {
            block_id: self.block_id.clone(),
            reason: reason.to_string(),
        }
    }
}

impl Command for FormatTextCommand {
    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        let block = doc
            .get_block(&self.block_id)
            .ok_or_else(|| CommandError::BlockNotFound(self.block_id.clone()))?;

        let len = format::text_len(&block.data)
            .ok_or_else(|| CommandError::NotText(self.block_id.clone()))?;
        if self.range.start >= self.range.end || self.range.end > len {
            return Err(CommandError::InvalidRange {
                block_id: self.block_id.clone(),
                start: self.range.start,
                end: self.range.end,
                len,
            });
        }

        let spans = format::read_spans(&block.data).map_err(|e| self.malformed(e))?;
        let updated = match self.action {
            FormatAction::Apply => format::apply_format(&spans, self.range.clone(), &self.format),
            FormatAction::Remove => format::remove_format(&spans, self.range.clone(), &self.format),
        };

        let mut data = block.data.clone();
        let previous = data.get(FORMATS_KEY).cloned();
        if updated.is_empty() {
            data.remove(FORMATS_KEY);
        } else {
            let value = serde_json::to_value(&updated).map_err(|e| self.malformed(e))?;
            data.insert(FORMATS_KEY.to_string(), value);
        }

        self.previous = Some(previous);
        doc.set_data(&self.block_id, data);
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        let not_found = || CommandError::BlockNotFound(self.block_id.clone());
        let previous = self.previous.clone().ok_or_else(not_found)?;
        let mut data = doc.get_block(&self.block_id).ok_or_else(not_found)?.data.clone();

        match previous {
            Some(value) => {
                data.insert(FORMATS_KEY.to_string(), value);
            }
            None => {
                data.remove(FORMATS_KEY);
            }
        }

        doc.set_data(&self.block_id, data);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "format-text"
    }

    fn description(&self) -> String {
        match self.action {
            FormatAction::Apply => "Apply formatting".to_string(),
            FormatAction::Remove => "Remove formatting".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpad_model::BlockData;
    use serde_json::json;

    fn doc_with_text(text: &str) -> Document {
        let mut data = BlockData::new();
        data.insert("text".into(), json!(text));
        let mut doc = Document::new("doc", "Test");
        doc.add_block(Block::new("t", "text", 0.0).with_data(data));
        doc
    }

    #[test]
    fn test_create_then_undo() {
        let mut doc = Document::new("doc", "Test");
        let mut cmd = CreateBlockCommand::new(Block::new("b1", "text", 0.0));

        cmd.execute(&mut doc).unwrap();
        assert!(doc.contains("b1"));
        assert_eq!(
            cmd.execute(&mut doc),
            Err(CommandError::DuplicateBlockId("b1".into()))
        );

        cmd.undo(&mut doc).unwrap();
        assert!(doc.is_empty());
        assert_eq!(cmd.undo(&mut doc), Err(CommandError::BlockNotFound("b1".into())));
    }

    #[test]
    fn test_delete_restores_exact_record() {
        let mut doc = doc_with_text("hello");
        doc.update_block("t", BlockPatch::protected(true));
        let before = doc.get_block("t").unwrap().clone();

        let mut cmd = DeleteBlockCommand::capture(&doc, "t").unwrap();
        cmd.execute(&mut doc).unwrap();
        assert!(doc.is_empty());

        cmd.undo(&mut doc).unwrap();
        assert_eq!(doc.get_block("t"), Some(&before));
    }

    #[test]
    fn test_delete_capture_unknown() {
        let doc = Document::new("doc", "Test");
        assert!(DeleteBlockCommand::capture(&doc, "nope").is_none());
    }

    #[test]
    fn test_move_swaps_placements() {
        let mut doc = doc_with_text("x");
        doc.add_block(Block::new("s", "section", 5.0));

        let mut cmd = MoveBlockCommand::new(
            "t",
            Placement::new(0.0, None),
            Placement::new(5.1, Some("s".into())),
        );
        cmd.execute(&mut doc).unwrap();
        assert_eq!(doc.get_block("t").unwrap().placement(), Placement::new(5.1, Some("s".into())));

        cmd.undo(&mut doc).unwrap();
        assert_eq!(doc.get_block("t").unwrap().placement(), Placement::new(0.0, None));
    }

    #[test]
    fn test_update_undo_restores_previous_record() {
        let mut doc = doc_with_text("old");
        let before = doc.get_block("t").unwrap().clone();

        let mut data = BlockData::new();
        data.insert("text".into(), json!("new"));
        data.insert("extra".into(), json!(true));
        let mut cmd = UpdateBlockCommand::new("t", BlockPatch::data(data));

        cmd.execute(&mut doc).unwrap();
        assert_eq!(doc.get_block("t").unwrap().data["text"], json!("new"));

        cmd.undo(&mut doc).unwrap();
        assert_eq!(doc.get_block("t"), Some(&before));
    }

    #[test]
    fn test_duplicate_creates_copy() {
        let mut doc = doc_with_text("copy me");
        let source = doc.get_block("t").unwrap().clone();

        let mut cmd = DuplicateBlockCommand::new(&source, "t2", 1.0);
        cmd.execute(&mut doc).unwrap();

        let copy = doc.get_block("t2").unwrap();
        assert_eq!(copy.data, source.data);
        assert_eq!(copy.block_type, "text");
        assert_eq!(cmd.source_id(), "t");

        cmd.undo(&mut doc).unwrap();
        assert!(!doc.contains("t2"));
    }

    #[test]
    fn test_format_apply_and_undo() {
        let mut doc = doc_with_text("hello world");
        let before = doc.get_block("t").unwrap().data.clone();

        let mut cmd = FormatTextCommand::new("t", 0..5, InlineFormat::Bold, FormatAction::Apply);
        cmd.execute(&mut doc).unwrap();

        let spans = format::read_spans(&doc.get_block("t").unwrap().data).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (0, 5));

        cmd.undo(&mut doc).unwrap();
        assert_eq!(doc.get_block("t").unwrap().data, before);
    }

    #[test]
    fn test_format_remove_restores_prior_spans_on_undo() {
        let mut doc = doc_with_text("hello world");
        let mut apply =
            FormatTextCommand::new("t", 0..11, InlineFormat::Italic, FormatAction::Apply);
        apply.execute(&mut doc).unwrap();
        let formatted = doc.get_block("t").unwrap().data.clone();

        let mut remove =
            FormatTextCommand::new("t", 0..11, InlineFormat::Italic, FormatAction::Remove);
        remove.execute(&mut doc).unwrap();
        assert!(!doc.get_block("t").unwrap().data.contains_key(FORMATS_KEY));

        remove.undo(&mut doc).unwrap();
        assert_eq!(doc.get_block("t").unwrap().data, formatted);
    }

    #[test]
    fn test_format_rejects_bad_input() {
        let mut doc = doc_with_text("abc");
        doc.add_block(Block::new("d", "divider", 1.0));

        let mut out_of_range =
            FormatTextCommand::new("t", 1..9, InlineFormat::Bold, FormatAction::Apply);
        assert!(matches!(
            out_of_range.execute(&mut doc),
            Err(CommandError::InvalidRange { len: 3, .. })
        ));

        let mut empty = FormatTextCommand::new("t", 2..2, InlineFormat::Bold, FormatAction::Apply);
        assert!(empty.execute(&mut doc).is_err());

        let mut no_text =
            FormatTextCommand::new("d", 0..1, InlineFormat::Bold, FormatAction::Apply);
        assert_eq!(no_text.execute(&mut doc), Err(CommandError::NotText("d".into())));
    }
}
