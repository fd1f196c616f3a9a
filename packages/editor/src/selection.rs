//! # Selection
//!
//! Tracks which blocks are selected and the anchor used for range selection.
//!
//! Selected ids keep the order they were selected in. Range selection works
//! over the top-level sibling list only; nested endpoints fall back to
//! selecting just the two ids.

use blockpad_model::Document;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Vec<String>,
    anchor: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `id` and make it the anchor
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.selected = vec![id.clone()];
        self.anchor = Some(id);
    }

    /// Add or remove `id`
    ///
    /// The anchor only changes when the selection was empty beforehand.
    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();

        if let Some(index) = self.selected.iter().position(|selected| *selected == id) {
            self.selected.remove(index);
            return;
        }

        if self.selected.is_empty() {
            self.anchor = Some(id.clone());
        }
        self.selected.push(id);
    }

    /// Select the inclusive run between `anchor` and `target`
    ///
    /// `siblings` is the ordered top-level id list. Either direction yields
    /// the same set. If an endpoint is not a top-level sibling, only the two
    /// ids are selected.
    pub fn select_range(&mut self, anchor: &str, target: &str, siblings: &[String]) {
        let anchor_index = siblings.iter().position(|id| id == anchor);
        let target_index = siblings.iter().position(|id| id == target);

        self.selected = match (anchor_index, target_index) {
            (Some(a), Some(t)) => {
                let (start, end) = if a <= t { (a, t) } else { (t, a) };
                siblings[start..=end].to_vec()
            }
            _ if anchor == target => vec![anchor.to_string()],
            _ => vec![anchor.to_string(), target.to_string()],
        };
        self.anchor = Some(anchor.to_string());
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Drop ids (and the anchor) that no longer resolve to a block
    ///
    /// Returns the number of ids removed.
    pub fn retain_existing(&mut self, doc: &Document) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| doc.contains(id));

        if self.anchor.as_deref().is_some_and(|anchor| !doc.contains(anchor)) {
            self.anchor = None;
        }

        before - self.selected.len()
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> &[String] {
        &self.selected
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpad_model::Block;
    use std::collections::HashSet;

    fn siblings() -> Vec<String> {
        ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect()
    }

    fn set(selection: &Selection) -> HashSet<String> {
        selection.ids().iter().cloned().collect()
    }

    #[test]
    fn test_select_replaces_and_sets_anchor() {
        let mut selection = Selection::new();
        selection.select("a");
        selection.select("b");
        assert_eq!(selection.ids(), ["b"]);
        assert_eq!(selection.anchor(), Some("b"));
    }

    #[test]
    fn test_toggle_sets_anchor_only_when_empty() {
        let mut selection = Selection::new();
        selection.toggle("a");
        assert_eq!(selection.anchor(), Some("a"));

        selection.toggle("b");
        assert_eq!(selection.anchor(), Some("a"));
        assert_eq!(selection.ids(), ["a", "b"]);

        selection.toggle("a");
        assert_eq!(selection.ids(), ["b"]);
        assert_eq!(selection.anchor(), Some("a"));
    }

    #[test]
    fn test_range_is_symmetric() {
        let mut forward = Selection::new();
        forward.select_range("b", "d", &siblings());

        let mut backward = Selection::new();
        backward.select_range("d", "b", &siblings());

        assert_eq!(set(&forward), set(&backward));
        assert_eq!(forward.ids(), ["b", "c", "d"]);
        assert_eq!(backward.anchor(), Some("d"));
    }

    #[test]
    fn test_range_falls_back_for_nested_ids() {
        let mut selection = Selection::new();
        selection.select_range("a", "nested", &siblings());
        assert_eq!(selection.ids(), ["a", "nested"]);

        selection.select_range("x", "x", &siblings());
        assert_eq!(selection.ids(), ["x"]);
    }

    #[test]
    fn test_retain_existing() {
        let mut doc = Document::new("doc", "Test");
        doc.add_block(Block::new("a", "text", 0.0));

        let mut selection = Selection::new();
        selection.select("gone");
        selection.toggle("a");

        assert_eq!(selection.retain_existing(&doc), 1);
        assert_eq!(selection.ids(), ["a"]);
        assert_eq!(selection.anchor(), None);
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.select("a");
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.anchor(), None);
    }
}
