//! Structural noise removal for the article body.
//!
//! Navigation boxes, infoboxes, reference lists, edit links and everything
//! else a vintage browser cannot lay out is pruned here before rendering.

use scraper::{ElementRef, Selector};

use crate::Result;
use crate::dom_tree::PrunedTree;
use crate::parse::parse_selector;

/// Structural rules pruned from every article, applied in order.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "script",
    "style",
    "img",
    "figure",
    "table",
    ".infobox",
    ".navbox",
    ".sidebar",
    ".mw-editsection",
    ".reference",
    ".reflist",
    ".thumb",
    ".mw-empty-elt",
    ".noprint",
    ".mw-jump-link",
    ".toc",
    "#coordinates",
    ".hatnote",
    ".shortdescription",
    ".mbox-small",
];

/// Citation markers removed in the final pass.
pub const CITATION_MARKER: &str = "sup.reference";

/// Compiled denylist.
#[derive(Debug, Clone)]
pub struct SelectorFilter {
    rules: Vec<Selector>,
    citation_marker: Selector,
}

impl SelectorFilter {
    /// Compile the default denylist.
    pub fn new() -> Result<Self> {
        Self::with_rules(DEFAULT_DENYLIST)
    }

    /// Compile a custom rule list; the citation-marker pass always runs last.
    pub fn with_rules(rules: &[&str]) -> Result<Self> {
        let rules = rules.iter().map(|rule| parse_selector(rule)).collect::<Result<Vec<_>>>()?;
        Ok(Self { rules, citation_marker: parse_selector(CITATION_MARKER)? })
    }

    /// Prune every subtree matched by a rule.
    ///
    /// Removal is recorded against node ids, so overlapping matches and rule
    /// order do not change the result. A rule matching nothing is a no-op.
    pub fn prune<'a>(&self, root: ElementRef<'a>) -> PrunedTree<'a> {
        let mut tree = PrunedTree::new(root);

        for rule in self.rules.iter().chain(std::iter::once(&self.citation_marker)) {
            for matched in root.select(rule) {
                tree.remove(matched.id());
            }
        }

        tree
    }
}
