//! Scripted edit sessions
//!
//! A script is a JSON array of operations tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "create", "type": "section", "as": "intro" },
//!   { "op": "createChild", "parent": "intro", "type": "text", "data": { "text": "hi" } },
//!   { "op": "drag", "id": "intro" },
//!   { "op": "drop", "target": { "kind": "gap", "index": 0 } },
//!   { "op": "undo" }
//! ]
//! ```
//!
//! Creating operations may name their result with `as`; later operations can
//! use that alias anywhere an id is expected.

use blockpad_editor::{ClipboardPayload, DropTarget, Editor, EditorError, FormatAction};
use blockpad_model::{BlockData, InlineFormat};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptOp {
    Create {
        #[serde(rename = "type")]
        block_type: String,
        #[serde(default)]
        position: Option<f64>,
        #[serde(default)]
        data: Option<BlockData>,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    CreateChild {
        parent: String,
        #[serde(rename = "type")]
        block_type: String,
        #[serde(default)]
        data: Option<BlockData>,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Omitting `parent` keeps the current one; `null` moves to the root
    Move {
        id: String,
        position: f64,
        #[serde(default, deserialize_with = "present")]
        parent: Option<Option<String>>,
    },
    Update {
        id: String,
        data: BlockData,
    },
    Protect {
        id: String,
        #[serde(default = "enabled")]
        protected: bool,
    },
    Duplicate {
        id: String,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
    Format {
        id: String,
        start: usize,
        end: usize,
        format: InlineFormat,
        #[serde(default = "apply_action")]
        action: FormatAction,
    },
    Select {
        id: String,
    },
    Toggle {
        id: String,
    },
    SelectRange {
        anchor: String,
        target: String,
    },
    ClearSelection,
    /// Copy `ids`, or the selection when absent
    Copy {
        #[serde(default)]
        ids: Option<Vec<String>>,
    },
    /// Paste at `position`, or by the selection anchor rule when absent
    Paste {
        #[serde(default)]
        position: Option<f64>,
    },
    Drag {
        id: String,
    },
    CancelDrag,
    /// `serialized: false` drops through the in-memory side channel only
    Drop {
        target: DropTarget,
        #[serde(default = "enabled")]
        serialized: bool,
    },
    Undo,
    Redo,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn enabled() -> bool {
    true
}

fn apply_action() -> FormatAction {
    FormatAction::Apply
}

impl ScriptOp {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptOp::Create { .. } => "create",
            ScriptOp::CreateChild { .. } => "createChild",
            ScriptOp::Delete { .. } => "delete",
            ScriptOp::Move { .. } => "move",
            ScriptOp::Update { .. } => "update",
            ScriptOp::Protect { .. } => "protect",
            ScriptOp::Duplicate { .. } => "duplicate",
            ScriptOp::Format { .. } => "format",
            ScriptOp::Select { .. } => "select",
            ScriptOp::Toggle { .. } => "toggle",
            ScriptOp::SelectRange { .. } => "selectRange",
            ScriptOp::ClearSelection => "clearSelection",
            ScriptOp::Copy { .. } => "copy",
            ScriptOp::Paste { .. } => "paste",
            ScriptOp::Drag { .. } => "drag",
            ScriptOp::CancelDrag => "cancelDrag",
            ScriptOp::Drop { .. } => "drop",
            ScriptOp::Undo => "undo",
            ScriptOp::Redo => "redo",
        }
    }
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptOp>, serde_json::Error> {
    serde_json::from_str(json)
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Step {step} ({op}): {source}")]
    Editor {
        step: usize,
        op: &'static str,
        #[source]
        source: EditorError,
    },

    #[error("Step {step} (paste): clipboard is empty")]
    EmptyClipboard { step: usize },
}

/// What one operation did
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub op: &'static str,

    /// Whether the editor accepted the operation
    pub applied: bool,

    /// Ids created by the operation
    pub created: Vec<String>,
}

/// Runs script operations against an editor, tracking aliases and the clipboard
#[derive(Debug)]
pub struct ScriptSession {
    editor: Editor,
    aliases: HashMap<String, String>,
    clipboard: Option<ClipboardPayload>,
    transfer: Option<String>,
    steps: usize,
}

impl ScriptSession {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            aliases: HashMap::new(),
            clipboard: None,
            transfer: None,
            steps: 0,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn into_editor(self) -> Editor {
        self.editor
    }

    pub fn run_all(&mut self, ops: Vec<ScriptOp>) -> Result<Vec<StepOutcome>, ScriptError> {
        ops.into_iter().map(|op| self.run(op)).collect()
    }

    pub fn run(&mut self, op: ScriptOp) -> Result<StepOutcome, ScriptError> {
        self.steps += 1;
        let step = self.steps;
        let name = op.name();
        let editor_error = |source| ScriptError::Editor { step, op: name, source };

        let mut created = Vec::new();
        let applied = match op {
            ScriptOp::Create {
                block_type,
                position,
                data,
                alias,
            } => {
                let id = self
                    .editor
                    .create_block(&block_type, position, data)
                    .map_err(editor_error)?;
                self.bind(alias, &id);
                created.push(id);
                true
            }
            ScriptOp::CreateChild {
                parent,
                block_type,
                data,
                alias,
            } => {
                let parent = self.resolve(&parent);
                match self
                    .editor
                    .create_child_block(&parent, &block_type, data)
                    .map_err(editor_error)?
                {
                    Some(id) => {
                        self.bind(alias, &id);
                        created.push(id);
                        true
                    }
                    None => false,
                }
            }
            ScriptOp::Delete { id } => {
                let id = self.resolve(&id);
                self.editor.delete_block(&id)
            }
            ScriptOp::Move { id, position, parent } => {
                let id = self.resolve(&id);
                match parent {
                    None => self.editor.move_block(&id, position),
                    Some(parent) => {
                        let parent = parent.map(|p| self.resolve(&p));
                        self.editor.move_block_to(&id, position, parent.as_deref())
                    }
                }
            }
            ScriptOp::Update { id, data } => {
                let id = self.resolve(&id);
                self.editor.update_block(&id, data)
            }
            ScriptOp::Protect { id, protected } => {
                let id = self.resolve(&id);
                self.editor.set_protected(&id, protected)
            }
            ScriptOp::Duplicate { id, alias } => {
                let id = self.resolve(&id);
                match self.editor.duplicate_block(&id) {
                    Some(copy) => {
                        self.bind(alias, &copy);
                        created.push(copy);
                        true
                    }
                    None => false,
                }
            }
            ScriptOp::Format {
                id,
                start,
                end,
                format,
                action,
            } => {
                let id = self.resolve(&id);
                self.editor.format_text(&id, start..end, format, action)
            }
            ScriptOp::Select { id } => {
                let id = self.resolve(&id);
                self.editor.select(&id)
            }
            ScriptOp::Toggle { id } => {
                let id = self.resolve(&id);
                self.editor.toggle_selection(&id)
            }
            ScriptOp::SelectRange { anchor, target } => {
                let anchor = self.resolve(&anchor);
                let target = self.resolve(&target);
                self.editor.select_range(&anchor, &target)
            }
            ScriptOp::ClearSelection => {
                self.editor.clear_selection();
                true
            }
            ScriptOp::Copy { ids } => {
                let payload = match ids {
                    Some(ids) => {
                        let ids: Vec<String> = ids.iter().map(|id| self.resolve(id)).collect();
                        self.editor.copy_blocks(&ids)
                    }
                    None => self.editor.copy_selection(),
                };
                let copied = !payload.is_empty();
                self.clipboard = Some(payload);
                copied
            }
            ScriptOp::Paste { position } => {
                let payload = match &self.clipboard {
                    Some(payload) if !payload.is_empty() => payload.clone(),
                    _ => return Err(ScriptError::EmptyClipboard { step }),
                };
                created = match position {
                    Some(position) => self.editor.paste_blocks(&payload.blocks, Some(position)),
                    None => self.editor.paste(&payload),
                };
                !created.is_empty()
            }
            ScriptOp::Drag { id } => {
                let id = self.resolve(&id);
                match self.editor.begin_drag(&id) {
                    Some(payload) => {
                        self.transfer = Some(payload.to_json().map_err(editor_error)?);
                        true
                    }
                    None => false,
                }
            }
            ScriptOp::CancelDrag => {
                self.transfer = None;
                self.editor.cancel_drag()
            }
            ScriptOp::Drop { target, serialized } => {
                let target = self.resolve_target(target);
                let transfer = self.transfer.take();
                let transfer = if serialized { transfer } else { None };
                self.editor.drop_on(&target, transfer.as_deref())
            }
            ScriptOp::Undo => self.editor.undo(),
            ScriptOp::Redo => self.editor.redo(),
        };

        debug!(step, op = name, applied, "script step");
        Ok(StepOutcome {
            op: name,
            applied,
            created,
        })
    }

    fn resolve(&self, id: &str) -> String {
        self.aliases.get(id).cloned().unwrap_or_else(|| id.to_string())
    }

    fn resolve_target(&self, target: DropTarget) -> DropTarget {
        match target {
            DropTarget::Gap { parent_id, index } => DropTarget::Gap {
                parent_id: parent_id.map(|p| self.resolve(&p)),
                index,
            },
            DropTarget::Block {
                target_id,
                pointer_y,
                bounds,
            } => DropTarget::Block {
                target_id: self.resolve(&target_id),
                pointer_y,
                bounds,
            },
        }
    }

    fn bind(&mut self, alias: Option<String>, id: &str) {
        if let Some(alias) = alias {
            self.aliases.insert(alias, id.to_string());
        }
    }
}
