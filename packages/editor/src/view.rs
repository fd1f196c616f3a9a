//! # Document View
//!
//! The materialized, render-ready projection of a document: the nested block
//! tree plus the ids registered for drag-and-drop.
//!
//! The view is rebuilt from scratch after every structural change rather than
//! patched incrementally. Blocks whose parent is missing are shown at the
//! root so nothing becomes unreachable after a non-cascading delete. A loaded
//! document with a parent cycle is shown the same way: the first cycle member
//! in document order becomes a root.

use blockpad_model::{Block, Document};
use serde::Serialize;
use std::collections::HashSet;

/// One rendered block and its children
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,

    #[serde(rename = "type")]
    pub block_type: String,

    pub position: f64,
    pub depth: usize,
    pub protected: bool,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub tree: Vec<TreeNode>,

    /// Blocks that may be picked up
    pub draggable: Vec<String>,

    /// Blocks that accept drops on their body
    pub drop_targets: Vec<String>,
}

impl DocumentView {
    pub fn build(doc: &Document) -> Self {
        let roots: Vec<&Block> = doc
            .blocks()
            .iter()
            .filter(|b| match &b.parent_id {
                None => true,
                Some(parent_id) => !doc.contains(parent_id),
            })
            .collect();

        let mut visited = HashSet::new();
        let mut tree: Vec<TreeNode> = roots
            .into_iter()
            .filter_map(|block| node(doc, block, 0, &mut visited))
            .collect();

        // Blocks caught in a parent cycle are never reached from a root
        for block in doc.blocks() {
            if !visited.contains(&block.id) {
                tree.extend(node(doc, block, 0, &mut visited));
            }
        }

        let registered: Vec<String> = doc
            .blocks()
            .iter()
            .filter(|b| !b.protected)
            .map(|b| b.id.clone())
            .collect();

        Self {
            tree,
            draggable: registered.clone(),
            drop_targets: registered,
        }
    }

    /// Total nodes reachable from the roots
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[TreeNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.tree)
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        fn find_in<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
            nodes
                .iter()
                .find_map(|n| if n.id == id { Some(n) } else { find_in(&n.children, id) })
        }
        find_in(&self.tree, id)
    }

    pub fn is_draggable(&self, id: &str) -> bool {
        self.draggable.iter().any(|d| d == id)
    }

    /// Depth-first walk of the tree
    pub fn flatten(&self) -> Vec<&TreeNode> {
        fn walk<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a TreeNode>) {
            for n in nodes {
                out.push(n);
                walk(&n.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.tree, &mut out);
        out
    }
}

fn node(
    doc: &Document,
    block: &Block,
    depth: usize,
    visited: &mut HashSet<String>,
) -> Option<TreeNode> {
    // Parent cycles would recurse forever
    if !visited.insert(block.id.clone()) {
        return None;
    }

    let children = doc
        .children_of(&block.id)
        .into_iter()
        .filter_map(|child| node(doc, child, depth + 1, visited))
        .collect();

    Some(TreeNode {
        id: block.id.clone(),
        block_type: block.block_type.clone(),
        position: block.position,
        depth,
        protected: block.protected,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_nested_tree() {
        let mut doc = Document::new("doc", "Test");
        doc.add_block(Block::new("h", "header", 0.0));
        doc.add_block(Block::new("t1", "text", 0.1).with_parent("h"));
        doc.add_block(Block::new("s", "section", 1.0));
        doc.add_block(Block::new("t2", "text", 0.05).with_parent("s"));

        let view = DocumentView::build(&doc);
        let roots: Vec<_> = view.tree.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["h", "s"]);
        assert_eq!(view.find("t2").unwrap().depth, 1);
        assert_eq!(view.node_count(), 4);
    }

    #[test]
    fn test_protected_blocks_are_not_registered() {
        let mut doc = Document::new("doc", "Test");
        doc.add_block(Block::new("a", "text", 0.0));
        doc.add_block(Block::new("p", "header", 1.0).with_protected(true));

        let view = DocumentView::build(&doc);
        assert_eq!(view.draggable, vec!["a"]);
        assert_eq!(view.drop_targets, vec!["a"]);
        assert!(view.find("p").unwrap().protected);
    }

    #[test]
    fn test_orphans_render_at_root() {
        let mut doc = Document::new("doc", "Test");
        doc.add_block(Block::new("o", "text", 0.0).with_parent("gone"));

        let view = DocumentView::build(&doc);
        assert_eq!(view.tree[0].id, "o");
        assert_eq!(view.tree[0].depth, 0);
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let mut doc = Document::new("doc", "Test");
        doc.add_block(Block::new("a", "section", 0.0).with_parent("b"));
        doc.add_block(Block::new("b", "section", 1.0).with_parent("a"));
        doc.add_block(Block::new("r", "text", 2.0));

        let view = DocumentView::build(&doc);
        assert_eq!(view.node_count(), 3);

        let a = view.find("a").unwrap();
        assert_eq!(a.depth, 0);
        assert_eq!(a.children.len(), 1);
        assert_eq!(a.children[0].id, "b");
        assert_eq!(a.children[0].depth, 1);
        assert!(a.children[0].children.is_empty());
        assert!(view.find("r").is_some());
    }
}
