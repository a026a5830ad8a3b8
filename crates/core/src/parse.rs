//! HTML parsing and article-body location.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! upstream HTML and locating the article body (the content root).
//!
//! # Example
//!
//! ```rust
//! use httpedia_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1 id="firstHeading">Computer</h1>
//!             <div class="mw-parser-output"><p>A machine.</p></div>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.display_title("Computer"), "Computer");
//! assert!(doc.content_root().is_ok());
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::{HttpediaError, Result};

/// Selector for candidate article bodies.
const CONTENT_ROOT_SELECTOR: &str = "div.mw-parser-output";

/// Selector for the rendered page heading.
const TITLE_SELECTOR: &str = "h1#firstHeading";

/// Represents a parsed upstream document.
///
/// The tree is built once per request and dropped with the request.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML after the raw pre-pass strips scripts, styles and comments.
    pub fn parse(html: &str) -> Result<Self> {
        Self::parse_with_config(html, &PreprocessConfig::default())
    }

    /// Parses HTML with a custom pre-pass configuration.
    pub fn parse_with_config(html: &str, config: &PreprocessConfig) -> Result<Self> {
        let cleaned = preprocess_html(html, config);
        Ok(Self { html: Html::parse_document(&cleaned) })
    }

    /// Parses HTML verbatim, skipping the pre-pass.
    pub fn parse_raw(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html) })
    }

    /// Gets the underlying `scraper::Html` instance.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`HttpediaError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|element| Element { element }).collect())
    }

    /// Locates the article body.
    ///
    /// Upstream sometimes emits more than one `mw-parser-output` container
    /// (for instance an empty one inside an indicator). The candidate with
    /// the most direct element children wins; on a tie the first in document
    /// order is kept.
    ///
    /// # Errors
    ///
    /// Returns [`HttpediaError::NoContent`] when no candidate exists.
    pub fn content_root(&'_ self) -> Result<ElementRef<'_>> {
        let sel = parse_selector(CONTENT_ROOT_SELECTOR)?;
        let mut best: Option<(usize, ElementRef<'_>)> = None;

        for candidate in self.html.select(&sel) {
            let size = candidate.children().filter(|child| child.value().is_element()).count();
            match best {
                Some((best_size, _)) if best_size >= size => {}
                _ => best = Some((size, candidate)),
            }
        }

        best.map(|(_, element)| element).ok_or(HttpediaError::NoContent)
    }

    /// Gets the human-readable article title.
    ///
    /// Falls back to the requested title with underscores turned into spaces
    /// when the page has no `firstHeading`.
    pub fn display_title(&self, requested: &str) -> String {
        let heading = parse_selector(TITLE_SELECTOR).ok().and_then(|sel| {
            self.html
                .select(&sel)
                .next()
                .map(|el| el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" "))
        });

        match heading {
            Some(text) if !text.is_empty() => text,
            _ => requested.replace('_', " ").trim().to_string(),
        }
    }
}

/// A wrapper around scraper's ElementRef for attribute and text access.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Gets the wrapped scraper element.
    pub fn element_ref(&self) -> ElementRef<'a> {
        self.element
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HttpediaError::HtmlParseError(format!("Invalid selector: {}", e)))
}
