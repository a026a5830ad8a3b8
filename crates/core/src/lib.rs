pub mod article;
pub mod block;
pub mod dom_tree;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod images;
pub mod inline;
pub mod parse;
pub mod postprocess;
pub mod preprocess;
pub mod render;

pub use article::{ImageMode, Preferences, RenderedArticle, Skin};
#[doc(hidden)]
pub use block::{BlockKind, BlockRenderer};
#[doc(hidden)]
pub use dom_tree::PrunedTree;
pub use error::{ErrorCategory, HttpediaError, Result};
pub use fetch::{DEFAULT_WIKI_BASE, FetchConfig, Fetcher, HttpFetcher, article_url, fetch_file, fetch_stdin};
pub use filter::{DEFAULT_DENYLIST, SelectorFilter};
pub use images::{
    CacheStore, DiskCache, ImageConfig, ImageRef, ImageService, PLACEHOLDER_GIF, cache_key, image_url_for_path,
    resolve_image_src, transcode_to_gif,
};
#[doc(hidden)]
pub use inline::{InlineKind, InlineRenderer};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::{PreprocessConfig, preprocess_html};
pub use render::{RenderConfig, RenderConfigBuilder, Renderer, fetch_and_render, render_article};
