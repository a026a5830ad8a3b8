use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use url::Url;

use crate::{HttpediaError, Result};

/// Keyed store for transcoded images.
///
/// Reads that fail for any reason are misses. Writes replace the whole entry,
/// so a reader never observes a partially written value.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Derive the cache key for a source URL: lowercase hex SHA-256 of the URL text.
pub fn cache_key(url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Default cache directory, `<user cache dir>/httpedia/img` or `cache/img`.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("httpedia").join("img"))
        .unwrap_or_else(|| PathBuf::from("cache").join("img"))
}

/// One file per key under a flat directory, named `<key>.gif`.
///
/// Entries are written to a temporary file in the same directory and renamed
/// into place. There is no eviction.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for `key`; `None` unless the key is plain hex.
    pub fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_hexdigit());
        valid.then(|| self.root.join(format!("{key}.gif")))
    }
}

#[async_trait]
impl CacheStore for DiskCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key)?;
        let started_at = Instant::now();
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                info!(
                    target = "httpedia::images::cache",
                    op = "cache::get",
                    result = "cache_hit",
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    cache_path = %path.display(),
                    gif_bytes = bytes.len(),
                    "Image served from cache"
                );
                Some(bytes)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!(
                    target = "httpedia::images::cache",
                    op = "cache::get",
                    result = "cache_read_error",
                    cache_path = %path.display(),
                    error = %err,
                    "Failed to read cached image; treating as a miss"
                );
                None
            }
        }
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self
            .entry_path(key)
            .ok_or_else(|| HttpediaError::InvalidResourcePath(key.to_string()))?;
        let root = self.root.clone();
        let bytes = bytes.to_vec();

        tokio::task::spawn_blocking(move || write_entry(&root, &path, &bytes))
            .await
            .map_err(|err| HttpediaError::WriteError(io::Error::other(err)))?
    }
}

fn write_entry(root: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".tmp").tempfile_in(root)?;
    file.write_all(bytes)?;
    file.flush()?;

    match file.persist(path) {
        Ok(_) => Ok(()),
        // A concurrent writer stored identical content for the same key.
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(HttpediaError::WriteError(err.error)),
    }
}
