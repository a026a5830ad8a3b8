//! Rendered article output and per-request display preferences.
//!
//! This module defines [`RenderedArticle`], the result of running an upstream
//! page through the pipeline, and [`Preferences`], the opaque display choices
//! the routing layer hands to the renderer.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::images::ImageRef;

/// How bold markup is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    /// Bold and strong become `<b>`.
    #[default]
    Standard,
    /// Bold and strong are flattened to plain text.
    Plain,
}

impl FromStr for Skin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "s" => Ok(Self::Standard),
            "plain" | "p" => Ok(Self::Plain),
            _ => Err(format!("Invalid skin: {}. Valid options: standard, plain", s)),
        }
    }
}

impl fmt::Display for Skin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Plain => f.write_str("plain"),
        }
    }
}

/// How many images an article may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// No images at all.
    None,
    /// At most the lead image.
    #[default]
    First,
    /// Lead image plus a gallery, bounded by the configured maximum.
    All,
}

impl FromStr for ImageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" | "n" => Ok(Self::None),
            "first" | "f" => Ok(Self::First),
            "all" | "a" => Ok(Self::All),
            _ => Err(format!("Invalid image mode: {}. Valid options: none, first, all", s)),
        }
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::First => f.write_str("first"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Display preferences for one request.
///
/// `query` is the caller's encoded preference string. It is appended to every
/// kept article link so navigation preserves the reader's choices; the
/// renderer never looks inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub skin: Skin,
    pub images: ImageMode,
    pub query: Option<String>,
}

impl Preferences {
    pub fn new(skin: Skin, images: ImageMode) -> Self {
        Self { skin, images, query: None }
    }

    /// Sets the preference string appended to article links.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }
}

/// The complete result of rendering an upstream article.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedArticle {
    /// Human-readable title.
    pub title: String,

    /// Minimal HTML body, one block per line.
    pub body_html: String,

    /// Upstream URL of the article.
    pub canonical_url: String,

    /// Lead image, if one survived selection.
    pub hero: Option<ImageRef>,

    /// Remaining images, only populated in [`ImageMode::All`].
    pub gallery: Vec<ImageRef>,

    /// Number of emitted blocks, images excluded.
    pub block_count: usize,
}

impl RenderedArticle {
    /// Gets the body as JSON alongside its metadata.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "canonical_url": self.canonical_url,
            "body_html": self.body_html,
            "hero": self.hero,
            "gallery": self.gallery,
            "block_count": self.block_count,
        })
    }
}
