//! End-to-end tests of the editor against whole documents
//!
//! This tests:
//! - Create/undo/redo round-trips
//! - Drag-and-drop placement and rejection
//! - Selection, clipboard and paste placement
//! - History bound and observers

use blockpad_editor::{
    AutosaveScheduler, BlockBounds, DropTarget, Editor, EditorConfig, EditorEvent, EventLog,
    TracingObserver,
};
use blockpad_model::{Block, Document, Placement};
use std::collections::HashSet;

fn three_blocks() -> Editor {
    let mut doc = Document::new("doc-1", "Three");
    doc.add_block(Block::new("b1", "text", 0.0));
    doc.add_block(Block::new("b2", "text", 1.0));
    doc.add_block(Block::new("b3", "text", 2.0));
    Editor::new(doc)
}

fn order(editor: &Editor) -> Vec<String> {
    editor.document().blocks().iter().map(|b| b.id.clone()).collect()
}

fn position(editor: &Editor, id: &str) -> f64 {
    editor.document().get_block(id).unwrap().position
}

#[test]
fn test_create_undo_redo_round_trip() {
    let mut editor = three_blocks();
    let before = order(&editor);

    let id = editor.create_block("code", Some(1.5), None).unwrap();
    assert_eq!(order(&editor), vec!["b1", "b2", id.as_str(), "b3"]);

    assert!(editor.undo());
    assert_eq!(order(&editor), before);

    assert!(editor.redo());
    assert_eq!(order(&editor), vec!["b1", "b2", id.as_str(), "b3"]);
    assert_eq!(editor.document().get_block(&id).unwrap().data["language"], "plaintext");
}

#[test]
fn test_drag_to_top_and_undo() {
    let mut editor = three_blocks();

    editor.begin_drag("b3").unwrap();
    assert!(editor.drop_on(&DropTarget::gap(None, 0), None));

    assert_eq!(position(&editor, "b3"), -1.0);
    assert_eq!(order(&editor), vec!["b3", "b1", "b2"]);

    assert!(editor.undo());
    assert_eq!(order(&editor), vec!["b1", "b2", "b3"]);
    assert_eq!(position(&editor, "b3"), 2.0);
}

#[test]
fn test_drag_downward_lands_between_neighbours() {
    let mut editor = three_blocks();

    editor.begin_drag("b1").unwrap();
    assert!(editor.drop_on(&DropTarget::gap(None, 2), None));

    assert_eq!(order(&editor), vec!["b2", "b1", "b3"]);
    assert_eq!(position(&editor, "b1"), 1.5);
}

#[test]
fn test_noop_drop_produces_nothing() {
    let mut editor = three_blocks();
    let log = EventLog::new();
    editor.subscribe(Box::new(log.clone()));

    // Gap directly below b2 is where b2 already sits
    editor.begin_drag("b2").unwrap();
    assert!(!editor.drop_on(&DropTarget::gap(None, 2), None));

    assert_eq!(editor.history().undo_levels(), 0);
    assert!(log.is_empty());
    assert!(!editor.drag_session().is_active());
}

#[test]
fn test_cyclic_drop_leaves_document_identical() {
    let mut editor = Editor::new(Document::new("doc", "Cycle"));
    let a = editor.create_block("section", None, None).unwrap();
    let b = editor.create_child_block(&a, "section", None).unwrap().unwrap();
    let c = editor.create_child_block(&b, "text", None).unwrap().unwrap();

    let before = editor.document().to_json().unwrap();
    let levels = editor.history().undo_levels();
    let bounds = BlockBounds::new(0.0, 30.0);

    for target in [
        DropTarget::block(b.clone(), 25.0, bounds),
        DropTarget::block(c.clone(), 5.0, bounds),
        DropTarget::block(a.clone(), 25.0, bounds),
        DropTarget::gap(Some(b.as_str()), 0),
        DropTarget::gap(Some(c.as_str()), 0),
    ] {
        editor.begin_drag(&a).unwrap();
        assert!(!editor.drop_on(&target, None));
    }

    assert_eq!(editor.document().to_json().unwrap(), before);
    assert_eq!(editor.history().undo_levels(), levels);
}

#[test]
fn test_drop_inside_container_then_view_nests() {
    let mut editor = three_blocks();
    let section = editor.create_block("section", Some(0.5), None).unwrap();

    editor.begin_drag("b3").unwrap();
    let target = DropTarget::block(section.clone(), 35.0, BlockBounds::new(20.0, 20.0));
    assert!(editor.drop_on(&target, None));

    let placement = editor.document().get_block("b3").unwrap().placement();
    assert_eq!(placement, Placement::new(0.6, Some(section.clone())));

    let node = editor.view().find(&section).unwrap();
    assert_eq!(node.children.len(), 1);
    assert_eq!(node.children[0].id, "b3");
    assert_eq!(node.children[0].depth, 1);
}

#[test]
fn test_protected_blocks_only_guard_drag_and_drop() {
    let mut editor = three_blocks();
    assert!(editor.set_protected("b2", true));

    // Drag and drop refuses it as source and target
    assert!(editor.begin_drag("b2").is_none());
    editor.begin_drag("b1").unwrap();
    assert!(!editor.drop_on(&DropTarget::block("b2", 0.0, BlockBounds::new(0.0, 10.0)), None));

    // Programmatic edits still apply
    assert!(editor.move_block("b2", 10.0));
    assert!(editor.delete_block("b2"));
    assert!(!editor.document().contains("b2"));
}

#[test]
fn test_range_selection_symmetry() {
    let mut editor = three_blocks();
    editor.create_block("text", None, None).unwrap();

    assert!(editor.select_range("b1", "b3"));
    let forward: HashSet<String> = editor.selection().ids().iter().cloned().collect();

    assert!(editor.select_range("b3", "b1"));
    let backward: HashSet<String> = editor.selection().ids().iter().cloned().collect();

    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 3);
    assert_eq!(editor.selection().anchor(), Some("b3"));
}

#[test]
fn test_paste_lands_before_selection() {
    let mut doc = Document::new("doc", "Paste");
    doc.add_block(Block::new("x", "text", 5.0));
    doc.add_block(Block::new("y", "text", 6.0));
    let mut editor = Editor::new(doc);

    editor.select_range("x", "y");
    let clipboard = editor.copy_selection();
    editor.select("y");

    let pasted = editor.paste(&clipboard);
    assert_eq!(pasted.len(), 2);
    assert_eq!(position(&editor, &pasted[0]), 4.0);
    assert_eq!(position(&editor, &pasted[1]), 5.0);
    assert!(position(&editor, &pasted[1]) < position(&editor, "y"));

    // Undo is per pasted block
    assert!(editor.undo());
    assert!(editor.document().contains(&pasted[0]));
    assert!(!editor.document().contains(&pasted[1]));
}

#[test]
fn test_clipboard_json_round_trip_through_paste() -> anyhow::Result<()> {
    let mut editor = three_blocks();
    let json = editor.copy_blocks(&["b1", "b2"]).to_json()?;

    let payload = blockpad_editor::ClipboardPayload::from_json(&json)?;
    let pasted = editor.paste(&payload);

    assert_eq!(pasted.len(), 2);
    assert_eq!(position(&editor, &pasted[0]), 3.0);
    Ok(())
}

#[test]
fn test_history_bound_through_editor() {
    let config = EditorConfig {
        history_limit: 2,
        ..EditorConfig::default()
    };
    let mut editor = Editor::with_config(Document::new("doc", "Bound"), config);

    let a = editor.create_block("text", None, None).unwrap();
    let b = editor.create_block("text", None, None).unwrap();
    let c = editor.create_block("text", None, None).unwrap();

    assert_eq!(editor.history().undo_levels(), 2);
    assert_eq!(editor.history().evictions(), 1);

    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());

    assert!(editor.document().contains(&a));
    assert!(!editor.document().contains(&b));
    assert!(!editor.document().contains(&c));
}

#[test]
fn test_observers_see_every_structural_change() {
    let mut editor = three_blocks();
    let log = EventLog::new();
    let autosave = AutosaveScheduler::new(editor.config().autosave_debounce());
    editor.subscribe(Box::new(log.clone()));
    editor.subscribe(Box::new(autosave.clone()));
    editor.subscribe(Box::new(TracingObserver));

    let id = editor.create_block("text", None, None).unwrap();
    editor.move_block(&id, -5.0);
    editor.delete_block(&id);
    editor.undo();
    editor.redo();

    assert_eq!(
        log.names(),
        vec!["block:created", "block:moved", "block:deleted", "history:undo", "history:redo"]
    );
    assert!(autosave.is_dirty());
    assert_eq!(autosave.last_version(), editor.document().version);

    match &log.events()[2] {
        EditorEvent::BlockDeleted { block_id } => assert_eq!(block_id, &id),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_editor_loads_serialized_document() -> anyhow::Result<()> {
    let json = three_blocks().document().to_json()?;
    let mut editor = Editor::from_json(&json, EditorConfig::default())?;

    assert_eq!(order(&editor), vec!["b1", "b2", "b3"]);
    assert!(editor.move_block("b1", 9.0));
    assert_eq!(editor.view().tree.last().map(|n| n.id.as_str()), Some("b1"));
    Ok(())
}
