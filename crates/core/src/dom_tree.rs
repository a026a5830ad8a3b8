use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::{ElementRef, Node};
use scraper::node::Element;

/// A pruned view over the content root.
///
/// The parsed tree itself is never mutated. Pruning records the ids of
/// removed subtree roots; every traversal through this view skips them, so a
/// removed node's descendants are unreachable too. Because the underlying
/// tree is untouched, passes that need the full tree (image extraction) can
/// run before or after pruning with the same result.
#[derive(Debug, Clone)]
pub struct PrunedTree<'a> {
    root: ElementRef<'a>,
    removed: HashSet<NodeId>,
}

impl<'a> PrunedTree<'a> {
    /// Create a view with nothing removed
    pub fn new(root: ElementRef<'a>) -> Self {
        Self { root, removed: HashSet::new() }
    }

    /// The content root this view starts at
    pub fn root(&self) -> ElementRef<'a> {
        self.root
    }

    /// Mark a subtree as removed. The root itself cannot be removed.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node == self.root.id() {
            return false;
        }
        self.removed.insert(node)
    }

    /// Whether a node was removed as a subtree root
    pub fn is_removed(&self, node: NodeId) -> bool {
        self.removed.contains(&node)
    }

    /// Number of removed subtree roots
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Surviving child nodes of an element, in document order
    pub fn children(&self, element: ElementRef<'a>) -> impl Iterator<Item = ego_tree::NodeRef<'a, Node>> + '_ {
        element.children().filter(move |child| !self.removed.contains(&child.id()))
    }

    /// Surviving child elements of an element, in document order
    pub fn child_elements(&self, element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        self.children(element).filter_map(ElementRef::wrap)
    }

    /// Surviving descendant elements (excluding `element`), depth-first
    pub fn descendant_elements(&self, element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut found = Vec::new();
        self.collect_descendants(element, &mut found);
        found
    }

    fn collect_descendants(&self, element: ElementRef<'a>, found: &mut Vec<ElementRef<'a>>) {
        for child in self.child_elements(element) {
            found.push(child);
            self.collect_descendants(child, found);
        }
    }

    /// Concatenated text of surviving descendants
    pub fn text(&self, element: ElementRef<'a>) -> String {
        let mut out = String::new();
        self.collect_text(element, &mut out);
        out
    }

    fn collect_text(&self, element: ElementRef<'a>, out: &mut String) {
        for child in self.children(element) {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        self.collect_text(el, out);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Whether an element carries the given class
pub fn has_class(element: &Element, class: &str) -> bool {
    element.classes().any(|c| c == class)
}
