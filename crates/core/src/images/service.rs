use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use url::Url;

use super::cache::{CacheStore, cache_key};
use super::extract::{DEFAULT_UPLOAD_HOST, image_url_for_path};
use super::transcode::transcode_to_gif;
use crate::fetch::Fetcher;
use crate::{HttpediaError, Result};

/// Limits applied when producing proxied images.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Output width ceiling in pixels.
    pub max_width: u32,
    /// Largest source payload accepted, in bytes.
    pub max_bytes: u64,
    /// Only host images are fetched from.
    pub upload_host: String,
    /// Largest source width or height the decoder will accept.
    pub max_source_dimension: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 320,
            max_bytes: 5 * 1024 * 1024,
            upload_host: DEFAULT_UPLOAD_HOST.to_string(),
            max_source_dimension: 8192,
        }
    }
}

/// Fetches, transcodes and caches article images.
///
/// The cache is keyed on the source URL alone, so one service should keep a
/// single output width for the lifetime of its cache.
#[derive(Clone)]
pub struct ImageService {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<dyn CacheStore>,
    config: ImageConfig,
}

impl ImageService {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: Arc<dyn CacheStore>, config: ImageConfig) -> Self {
        Self { fetcher, cache, config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// GIF bytes for an upload-host path, served under `/img/<path>`.
    ///
    /// Unsafe paths are refused with [`HttpediaError::InvalidResourcePath`]
    /// before any fetch. `Ok(None)` means the image could not be produced.
    pub async fn gif_for_path(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let url = image_url_for_path(path, &self.config.upload_host)?;
        Ok(self.extract_and_cache_image(&url, self.config.max_width).await)
    }

    /// Return the transcoded GIF for `url`, from cache when possible.
    ///
    /// A miss fetches the source under the byte ceiling, transcodes it off
    /// the async runtime and stores the result. Failures of any kind yield
    /// `None` and leave the cache untouched; a failed cache write still
    /// returns the fresh bytes.
    pub async fn extract_and_cache_image(&self, url: &Url, max_width: u32) -> Option<Vec<u8>> {
        let started_at = Instant::now();
        let key = cache_key(url);

        if let Some(bytes) = self.cache.get(&key).await {
            return Some(bytes);
        }

        let gif = match self.fetch_and_transcode(url, max_width).await {
            Ok(gif) => gif,
            Err(err) => {
                warn!(
                    target = "httpedia::images",
                    op = "images::extract_and_cache_image",
                    result = "error",
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    url = %url,
                    error = %err,
                    "Failed to produce image"
                );
                return None;
            }
        };

        if let Err(err) = self.cache.put(&key, &gif).await {
            warn!(
                target = "httpedia::images",
                op = "images::extract_and_cache_image",
                result = "cache_write_error",
                url = %url,
                error = %err,
                "Failed to store transcoded image; serving uncached"
            );
        }

        info!(
            target = "httpedia::images",
            op = "images::extract_and_cache_image",
            result = "cache_miss",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            url = %url,
            gif_bytes = gif.len(),
            "Image fetched and transcoded"
        );

        Some(gif)
    }

    async fn fetch_and_transcode(&self, url: &Url, max_width: u32) -> Result<Vec<u8>> {
        let limit = self.config.max_bytes;
        let source = self.fetcher.fetch(url, Some(limit)).await?;
        if source.len() as u64 > limit {
            return Err(HttpediaError::PayloadTooLarge { limit });
        }

        let max_dimension = self.config.max_source_dimension;
        tokio::task::spawn_blocking(move || transcode_to_gif(&source, max_width, max_dimension))
            .await
            .map_err(|err| HttpediaError::Transcode(err.to_string()))?
    }
}
