//! Article images: selection, transcoding and caching.
//!
//! Extraction picks which images an article shows and rewrites them to
//! `/img/<path>` URLs. Serving such a URL goes through [`ImageService`],
//! which fetches the original from the upload host, shrinks it to a small
//! palette GIF and stores the result in a content-addressed [`CacheStore`].

pub mod cache;
pub mod extract;
pub mod service;
pub mod transcode;

pub use cache::{CacheStore, DiskCache, cache_key, default_cache_dir};
pub use extract::{
    DEFAULT_UPLOAD_HOST, ExtractedImages, IMAGE_ROUTE_PREFIX, ImageExtractor, ImageRef, image_url_for_path,
    resolve_image_src,
};
pub use service::{ImageConfig, ImageService};
pub use transcode::{PLACEHOLDER_GIF, transcode_to_gif};
