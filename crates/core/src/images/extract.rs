use scraper::ElementRef;
use serde::Serialize;
use url::Url;

use crate::article::ImageMode;
use crate::parse::parse_selector;
use crate::{HttpediaError, Result};

/// Host every accepted image must be served from.
pub const DEFAULT_UPLOAD_HOST: &str = "upload.wikimedia.org";

/// Route prefix images are proxied under.
pub const IMAGE_ROUTE_PREFIX: &str = "/img/";

/// An image selected for an article, copied out of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    /// Path on the upload host, without a leading slash.
    pub path: String,
    /// Alt text, falling back to the article title.
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRef {
    /// Local URL serving the transcoded image.
    pub fn proxy_src(&self) -> String {
        format!("{IMAGE_ROUTE_PREFIX}{}", self.path)
    }
}

/// Images chosen for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedImages {
    pub hero: Option<ImageRef>,
    pub gallery: Vec<ImageRef>,
}

impl ExtractedImages {
    pub fn len(&self) -> usize {
        usize::from(self.hero.is_some()) + self.gallery.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hero.is_none()
    }
}

/// Selects, filters and deduplicates article images.
#[derive(Debug, Clone)]
pub struct ImageExtractor {
    upload_host: String,
    min_dimension: u32,
    max_images: usize,
}

impl ImageExtractor {
    pub fn new(upload_host: impl Into<String>, min_dimension: u32, max_images: usize) -> Self {
        Self { upload_host: upload_host.into(), min_dimension, max_images }
    }

    fn limit(&self, mode: ImageMode) -> usize {
        match mode {
            ImageMode::None => 0,
            ImageMode::First => 1.min(self.max_images),
            ImageMode::All => self.max_images,
        }
    }

    /// Scan `root` for images in document order.
    ///
    /// Sources off the upload host, unsafe paths and declared sizes below the
    /// minimum dimension are skipped silently, as are repeats of an already
    /// selected path. The tree is only read.
    pub fn extract(&self, root: ElementRef<'_>, title: &str, mode: ImageMode) -> ExtractedImages {
        let limit = self.limit(mode);
        let mut selected: Vec<ImageRef> = Vec::new();
        if limit == 0 {
            return ExtractedImages::default();
        }

        let Ok(selector) = parse_selector("img") else {
            return ExtractedImages::default();
        };

        for img in root.select(&selector) {
            if selected.len() >= limit {
                break;
            }

            let el = img.value();
            let Some(src) = el.attr("src").or_else(|| el.attr("data-src")) else {
                continue;
            };
            let Ok(path) = resolve_image_src(src, &self.upload_host) else {
                continue;
            };

            let width = parse_dimension(el.attr("width"));
            let height = parse_dimension(el.attr("height"));
            if width.is_some_and(|w| w < self.min_dimension) || height.is_some_and(|h| h < self.min_dimension) {
                continue;
            }

            if selected.iter().any(|existing| existing.path == path) {
                continue;
            }

            let alt = match el.attr("alt").map(str::trim) {
                Some(alt) if !alt.is_empty() => alt.to_string(),
                _ => title.to_string(),
            };

            selected.push(ImageRef { path, alt, width, height });
        }

        let mut selected = selected.into_iter();
        let hero = selected.next();
        ExtractedImages { hero, gallery: selected.collect() }
    }
}

fn parse_dimension(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().trim_end_matches("px").parse().ok())
}

/// Resolve an `img` source to a path on the upload host.
///
/// Accepts protocol-relative and absolute http(s) sources only. The raw
/// source is checked for `..` before URL normalization could hide it.
pub fn resolve_image_src(src: &str, upload_host: &str) -> Result<String> {
    let src = src.trim();
    if src.contains("..") || has_escaped_dot(src) {
        return Err(HttpediaError::InvalidResourcePath(src.to_string()));
    }

    let absolute = if let Some(rest) = src.strip_prefix("//") {
        format!("https://{rest}")
    } else if src.starts_with("https://") || src.starts_with("http://") {
        src.to_string()
    } else {
        return Err(HttpediaError::InvalidResourcePath(src.to_string()));
    };

    let url = Url::parse(&absolute).map_err(|_| HttpediaError::InvalidResourcePath(src.to_string()))?;
    if url.host_str() != Some(upload_host) {
        return Err(HttpediaError::InvalidResourcePath(src.to_string()));
    }

    let path = url.path().trim_start_matches('/');
    validate_path(path)?;
    Ok(path.to_string())
}

/// Build the upstream URL for a proxied image path.
///
/// Runs the same safety checks as extraction, so a hand-crafted `/img/` path
/// is refused before anything is fetched.
pub fn image_url_for_path(path: &str, upload_host: &str) -> Result<Url> {
    validate_path(path)?;
    let url = Url::parse(&format!("https://{upload_host}/{path}"))
        .map_err(|_| HttpediaError::InvalidResourcePath(path.to_string()))?;

    if url.path().strip_prefix('/') != Some(path) {
        return Err(HttpediaError::InvalidResourcePath(path.to_string()));
    }
    Ok(url)
}

/// `%2e` is a dot to URL normalization, so `%2e%2e` walks up a segment.
fn has_escaped_dot(text: &str) -> bool {
    text.to_ascii_lowercase().contains("%2e")
}

fn validate_path(path: &str) -> Result<()> {
    let safe = !path.is_empty()
        && !path.contains("..")
        && !has_escaped_dot(path)
        && !path.contains("//")
        && !path.starts_with('/')
        && path.chars().all(is_safe_path_char);

    if safe { Ok(()) } else { Err(HttpediaError::InvalidResourcePath(path.to_string())) }
}

fn is_safe_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '%' | '(' | ')' | ',' | '~' | '+')
}
