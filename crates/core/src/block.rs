//! Block structure rendering.
//!
//! Walks the pruned content root in document order and emits one minimal
//! HTML block per paragraph, heading, list, definition entry or quote.
//! Generic containers are transparent; unknown tags are skipped.

use scraper::ElementRef;

use crate::article::Preferences;
use crate::dom_tree::{PrunedTree, has_class};
use crate::inline::InlineRenderer;
use crate::postprocess::clean_text;

/// Class marking a `div` that wraps a section heading.
const HEADING_WRAPPER_CLASS: &str = "mw-heading";

/// Block element kinds the renderer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    List { ordered: bool },
    DefinitionList,
    Quote,
    HeadingWrapper,
    Container,
    Unrecognized,
}

impl BlockKind {
    pub fn of(element: ElementRef<'_>) -> Self {
        let el = element.value();
        match el.name() {
            "p" => Self::Paragraph,
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "ul" => Self::List { ordered: false },
            "ol" => Self::List { ordered: true },
            "dl" => Self::DefinitionList,
            "blockquote" => Self::Quote,
            "div" if has_class(el, HEADING_WRAPPER_CLASS) => Self::HeadingWrapper,
            "div" | "section" => Self::Container,
            _ => Self::Unrecognized,
        }
    }
}

/// Renders the block sequence of a pruned content root.
pub struct BlockRenderer<'t, 'a> {
    tree: &'t PrunedTree<'a>,
    inline: InlineRenderer<'t, 'a>,
}

impl<'t, 'a> BlockRenderer<'t, 'a> {
    pub fn new(tree: &'t PrunedTree<'a>, prefs: &'t Preferences) -> Self {
        Self { tree, inline: InlineRenderer::new(tree, prefs) }
    }

    /// Render every block under the content root, in document order.
    pub fn render(&self) -> Vec<String> {
        let mut blocks = Vec::new();
        self.render_children(self.tree.root(), &mut blocks);
        blocks
    }

    fn render_children(&self, element: ElementRef<'a>, blocks: &mut Vec<String>) {
        for child in self.tree.child_elements(element) {
            self.render_block(child, blocks);
        }
    }

    fn render_block(&self, element: ElementRef<'a>, blocks: &mut Vec<String>) {
        match BlockKind::of(element) {
            BlockKind::Paragraph => {
                let html = self.inline.render(element);
                if !html.is_empty() {
                    blocks.push(format!("<p>{html}</p>"));
                }
            }
            BlockKind::Heading(level) => {
                if let Some(heading) = self.heading(element, level) {
                    blocks.push(heading);
                }
            }
            BlockKind::List { ordered } => {
                if let Some(list) = self.list(element, ordered) {
                    blocks.push(list);
                }
            }
            BlockKind::DefinitionList => self.definition_list(element, blocks),
            BlockKind::Quote => {
                let text = clean_text(&self.tree.text(element));
                if !text.is_empty() {
                    blocks.push(format!("<blockquote>{text}</blockquote>"));
                }
            }
            BlockKind::HeadingWrapper => {
                for nested in self.tree.descendant_elements(element) {
                    if let BlockKind::Heading(level) = BlockKind::of(nested)
                        && let Some(heading) = self.heading(nested, level)
                    {
                        blocks.push(heading);
                    }
                }
            }
            BlockKind::Container => self.render_children(element, blocks),
            BlockKind::Unrecognized => {}
        }
    }

    fn heading(&self, element: ElementRef<'a>, level: u8) -> Option<String> {
        let text = clean_text(&self.tree.text(element));
        (!text.is_empty()).then(|| format!("<h{level}>{text}</h{level}>"))
    }

    fn list(&self, element: ElementRef<'a>, ordered: bool) -> Option<String> {
        let items: Vec<String> = self
            .tree
            .child_elements(element)
            .filter(|child| child.value().name() == "li")
            .map(|li| self.inline.render(li))
            .filter(|html| !html.is_empty())
            .map(|html| format!("<li>{html}</li>"))
            .collect();

        if items.is_empty() {
            return None;
        }

        let tag = if ordered { "ol" } else { "ul" };
        Some(format!("<{tag}>\n{}\n</{tag}>", items.join("\n")))
    }

    fn definition_list(&self, element: ElementRef<'a>, blocks: &mut Vec<String>) {
        for child in self.tree.child_elements(element) {
            match child.value().name() {
                "dt" => {
                    let term = clean_text(&self.tree.text(child));
                    if !term.is_empty() {
                        blocks.push(format!("<p><b>{term}</b></p>"));
                    }
                }
                "dd" => {
                    let html = self.inline.render(child);
                    if !html.is_empty() {
                        blocks.push(format!("<p>{html}</p>"));
                    }
                }
                _ => {}
            }
        }
    }
}
