//! Inline markup flattening.
//!
//! Turns an inline subtree (text, links, emphasis, spans, line breaks) into
//! one escaped HTML string made only of `<a>`, `<b>`, `<i>` and `<br>`.

use scraper::{ElementRef, Node};

use crate::article::{Preferences, Skin};
use crate::dom_tree::PrunedTree;
use crate::postprocess::{collapse_whitespace, escape_attr, escape_text, strip_markers};

/// Inline element kinds the renderer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    Link,
    Bold,
    Italic,
    LineBreak,
    /// Formatting dropped, children rendered in place.
    Transparent,
    /// Anything else: reduced to its text.
    Other,
}

impl InlineKind {
    pub fn of(tag: &str) -> Self {
        match tag {
            "a" => Self::Link,
            "b" | "strong" => Self::Bold,
            "i" | "em" => Self::Italic,
            "br" => Self::LineBreak,
            "span" | "small" | "sup" | "sub" => Self::Transparent,
            _ => Self::Other,
        }
    }
}

/// Renders inline content against a pruned tree.
pub struct InlineRenderer<'t, 'a> {
    tree: &'t PrunedTree<'a>,
    prefs: &'t Preferences,
}

impl<'t, 'a> InlineRenderer<'t, 'a> {
    pub fn new(tree: &'t PrunedTree<'a>, prefs: &'t Preferences) -> Self {
        Self { tree, prefs }
    }

    /// Render the children of `element` as a single HTML string.
    ///
    /// Edit and citation markers are removed and the result is trimmed; an
    /// empty string means there is nothing to emit.
    pub fn render(&self, element: ElementRef<'a>) -> String {
        let mut out = String::new();
        self.render_children(element, &mut out);
        strip_markers(&out)
    }

    fn render_children(&self, element: ElementRef<'a>, out: &mut String) {
        for child in self.tree.children(element) {
            match child.value() {
                Node::Text(text) => out.push_str(&escape_text(&collapse_whitespace(text))),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        self.render_element(el, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn render_element(&self, element: ElementRef<'a>, out: &mut String) {
        match InlineKind::of(element.value().name()) {
            InlineKind::Link => self.render_link(element, out),
            InlineKind::Bold => match self.prefs.skin {
                Skin::Standard => self.wrap("b", element, out),
                Skin::Plain => self.render_children(element, out),
            },
            InlineKind::Italic => self.wrap("i", element, out),
            InlineKind::LineBreak => out.push_str("<br>"),
            InlineKind::Transparent => self.render_children(element, out),
            InlineKind::Other => out.push_str(&escape_text(&collapse_whitespace(&self.tree.text(element)))),
        }
    }

    fn wrap(&self, tag: &str, element: ElementRef<'a>, out: &mut String) {
        let mut inner = String::new();
        self.render_children(element, &mut inner);
        if inner.trim().is_empty() {
            out.push_str(&inner);
        } else {
            out.push_str(&format!("<{tag}>{inner}</{tag}>"));
        }
    }

    fn render_link(&self, element: ElementRef<'a>, out: &mut String) {
        let text = collapse_whitespace(&self.tree.text(element));
        if text.trim().is_empty() {
            return;
        }

        match element.value().attr("href").filter(|href| is_article_link(href)) {
            Some(href) => {
                let href = decorate_href(href, self.prefs.query.as_deref());
                out.push_str(&format!("<a href=\"{}\">{}</a>", escape_attr(&href), escape_text(&text)));
            }
            None => out.push_str(&escape_text(&text)),
        }
    }
}

/// Whether `href` points at an encyclopedia article (`/wiki/<title>`, no namespace).
pub fn is_article_link(href: &str) -> bool {
    let Some(rest) = href.strip_prefix("/wiki/") else {
        return false;
    };
    let title = rest.split(['#', '?']).next().unwrap_or_default();
    !title.is_empty() && !title.contains(':')
}

/// Append the preference string as a query, ahead of any fragment.
pub fn decorate_href(href: &str, query: Option<&str>) -> String {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return href.to_string();
    };

    let (base, fragment) = match href.find('#') {
        Some(idx) => href.split_at(idx),
        None => (href, ""),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}{fragment}")
}
