//! Article rendering API.
//!
//! This module ties the pipeline together. [`Renderer`] parses upstream HTML,
//! locates the content root, selects images, prunes the tree and renders the
//! remaining blocks into a [`RenderedArticle`].
//!
//! # Example
//!
//! ```rust
//! use httpedia_core::{Preferences, Renderer};
//!
//! let html = r#"<h1 id="firstHeading">Computer</h1>
//!     <div class="mw-parser-output"><p>A <b>machine</b>.[1]</p></div>"#;
//! let article = Renderer::new().unwrap().render_article(html, "Computer", &Preferences::default()).unwrap();
//! assert_eq!(article.title, "Computer");
//! assert_eq!(article.body_html, "<p>A <b>machine</b>.</p>");
//! ```

use crate::article::{Preferences, RenderedArticle};
use crate::block::BlockRenderer;
use crate::fetch::{DEFAULT_WIKI_BASE, FetchConfig, Fetcher, HttpFetcher, article_url};
use crate::filter::SelectorFilter;
use crate::images::{DEFAULT_UPLOAD_HOST, ExtractedImages, ImageExtractor, ImageRef};
use crate::parse::Document;
use crate::postprocess::escape_attr;
use crate::Result;

/// Configuration for article rendering.
///
/// # Example
///
/// ```rust
/// use httpedia_core::RenderConfig;
///
/// let config = RenderConfig::builder().max_images(4).min_image_dimension(80).build();
/// assert_eq!(config.max_images, 4);
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Upper bound on images in [`crate::ImageMode::All`] (default: 10).
    pub max_images: usize,

    /// Declared width or height below which an image is decorative (default: 50).
    pub min_image_dimension: u32,

    /// Host image sources must resolve to (default: `upload.wikimedia.org`).
    pub upload_host: String,

    /// Base URL articles are fetched from and canonical URLs point at.
    pub wiki_base: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_images: 10,
            min_image_dimension: 50,
            upload_host: DEFAULT_UPLOAD_HOST.to_string(),
            wiki_base: DEFAULT_WIKI_BASE.to_string(),
        }
    }
}

impl RenderConfig {
    /// Creates a new builder for RenderConfig.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }
}

/// Builder for RenderConfig.
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: RenderConfig::default() }
    }

    /// Sets the maximum number of images per article.
    pub fn max_images(mut self, value: usize) -> Self {
        self.config.max_images = value;
        self
    }

    /// Sets the decorative image threshold.
    pub fn min_image_dimension(mut self, value: u32) -> Self {
        self.config.min_image_dimension = value;
        self
    }

    /// Sets the image upload host.
    pub fn upload_host(mut self, value: impl Into<String>) -> Self {
        self.config.upload_host = value.into();
        self
    }

    /// Sets the wiki base URL.
    pub fn wiki_base(mut self, value: impl Into<String>) -> Self {
        self.config.wiki_base = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> RenderConfig {
        self.config
    }
}

impl Default for RenderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main entry point for article rendering.
///
/// Holds no per-article state; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    filter: SelectorFilter,
    extractor: ImageExtractor,
}

impl Renderer {
    /// Creates a renderer with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(RenderConfig::default())
    }

    /// Creates a renderer with a custom configuration.
    pub fn with_config(config: RenderConfig) -> Result<Self> {
        let filter = SelectorFilter::new()?;
        let extractor = ImageExtractor::new(&config.upload_host, config.min_image_dimension, config.max_images);
        Ok(Self { config, filter, extractor })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render raw upstream HTML into a minimal article.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HttpediaError::NoContent`] when the page has no
    /// article body, and [`crate::HttpediaError::InvalidUrl`] when
    /// `requested_title` cannot form an article URL.
    pub fn render_article(&self, raw_html: &str, requested_title: &str, prefs: &Preferences) -> Result<RenderedArticle> {
        let canonical_url = article_url(&self.config.wiki_base, requested_title)?.to_string();

        let doc = Document::parse(raw_html)?;
        let root = doc.content_root()?;
        let title = doc.display_title(requested_title);

        let images = self.extractor.extract(root, &title, prefs.images);

        let tree = self.filter.prune(root);
        let blocks = BlockRenderer::new(&tree, prefs).render();

        Ok(RenderedArticle {
            body_html: assemble_body(&blocks, &images),
            title,
            canonical_url,
            block_count: blocks.len(),
            hero: images.hero,
            gallery: images.gallery,
        })
    }

    /// Fetch an article by title and render it.
    pub async fn fetch_and_render(
        &self, fetcher: &dyn Fetcher, title: &str, prefs: &Preferences,
    ) -> Result<RenderedArticle> {
        let url = article_url(&self.config.wiki_base, title)?;
        let bytes = fetcher.fetch(&url, None).await?;
        let html = String::from_utf8_lossy(&bytes);
        self.render_article(&html, title, prefs)
    }
}

fn img_tag(image: &ImageRef) -> String {
    format!("<img src=\"{}\" alt=\"{}\">", escape_attr(&image.proxy_src()), escape_attr(&image.alt))
}

/// Lay out the hero, the blocks and the gallery, one element per line.
fn assemble_body(blocks: &[String], images: &ExtractedImages) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len() + images.len() + 2);

    if let Some(hero) = &images.hero {
        lines.push(format!("<center>{}</center>", img_tag(hero)));
    }

    lines.extend(blocks.iter().cloned());

    if !images.gallery.is_empty() {
        lines.push("<hr>".to_string());
        lines.push("<h2>Images</h2>".to_string());
        lines.extend(images.gallery.iter().map(|image| format!("<p>{}</p>", img_tag(image))));
    }

    lines.join("\n")
}

/// Convenience function: render with default configuration.
///
/// # Example
///
/// ```rust
/// use httpedia_core::{Preferences, render_article};
///
/// let html = r#"<div class="mw-parser-output"><p>Hello</p></div>"#;
/// let article = render_article(html, "Hello_world", &Preferences::default()).unwrap();
/// assert_eq!(article.title, "Hello world");
/// ```
pub fn render_article(raw_html: &str, requested_title: &str, prefs: &Preferences) -> Result<RenderedArticle> {
    Renderer::new()?.render_article(raw_html, requested_title, prefs)
}

/// Convenience function: fetch over HTTP and render with default settings.
///
/// # Example
///
/// ```no_run
/// use httpedia_core::{Preferences, fetch_and_render};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let article = fetch_and_render("Computer", &Preferences::default()).await?;
///     println!("{}", article.body_html);
///     Ok(())
/// }
/// ```
pub async fn fetch_and_render(title: &str, prefs: &Preferences) -> Result<RenderedArticle> {
    let fetcher = HttpFetcher::new(&FetchConfig::default())?;
    Renderer::new()?.fetch_and_render(&fetcher, title, prefs).await
}
