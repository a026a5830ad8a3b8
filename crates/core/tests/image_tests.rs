//! Image service integration tests, driven through test doubles.
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httpedia_core::*;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use url::Url;

/// Serves a fixed body and records every request.
struct CountingFetcher {
    body: Vec<u8>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Option<u64>)>>,
}

impl CountingFetcher {
    fn new(body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self { body, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, url: &Url, limit: Option<u64>) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((url.to_string(), limit));
        Ok(self.body.clone())
    }
}

struct FailingFetcher;

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, _url: &Url, _limit: Option<u64>) -> Result<Vec<u8>> {
        Err(HttpediaError::UpstreamStatus { status: 503 })
    }
}

#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([30, 90, 160, 255])));
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

fn source_url() -> Url {
    Url::parse("https://upload.wikimedia.org/wikipedia/commons/a/ab/Example.png").unwrap()
}

fn service(fetcher: Arc<dyn Fetcher>, cache: Arc<dyn CacheStore>) -> ImageService {
    ImageService::new(fetcher, cache, ImageConfig::default())
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let fetcher = CountingFetcher::new(png(640, 480));
    let cache = Arc::new(MemoryCache::default());
    let images = service(fetcher.clone(), cache.clone());

    let first = images.extract_and_cache_image(&source_url(), 320).await.expect("first transcode");
    let second = images.extract_and_cache_image(&source_url(), 320).await.expect("cached copy");

    assert_eq!(first, second);
    assert_eq!(fetcher.calls(), 1);
    assert!(first.starts_with(b"GIF89a"));
    assert!(cache.entries.lock().unwrap().contains_key(&cache_key(&source_url())));

    let decoded = image::load_from_memory(&first).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (320, 240));
}

#[tokio::test]
async fn test_fetch_uses_byte_ceiling() {
    let fetcher = CountingFetcher::new(png(8, 8));
    let images = service(fetcher.clone(), Arc::new(MemoryCache::default()));

    images.extract_and_cache_image(&source_url(), 320).await.unwrap();

    let seen = fetcher.seen.lock().unwrap();
    assert_eq!(seen[0].1, Some(ImageConfig::default().max_bytes));
}

#[tokio::test]
async fn test_oversized_body_never_reaches_decoder() {
    let mut body = png(8, 8);
    body.resize(2048, 0);
    let fetcher = CountingFetcher::new(body);
    let cache = Arc::new(MemoryCache::default());
    let config = ImageConfig { max_bytes: 1024, ..Default::default() };
    let images = ImageService::new(fetcher.clone(), cache.clone(), config);

    assert!(images.extract_and_cache_image(&source_url(), 320).await.is_none());
    assert!(cache.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let fetcher = CountingFetcher::new(b"<html>Not an image</html>".to_vec());
    let cache = Arc::new(MemoryCache::default());
    let images = service(fetcher.clone(), cache.clone());

    assert!(images.extract_and_cache_image(&source_url(), 320).await.is_none());
    assert!(images.extract_and_cache_image(&source_url(), 320).await.is_none());

    assert_eq!(fetcher.calls(), 2);
    assert!(cache.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_unavailable() {
    let images = service(Arc::new(FailingFetcher), Arc::new(MemoryCache::default()));
    assert!(images.extract_and_cache_image(&source_url(), 320).await.is_none());
}

#[tokio::test]
async fn test_unsafe_paths_are_rejected_before_fetch() {
    let fetcher = CountingFetcher::new(png(8, 8));
    let images = service(fetcher.clone(), Arc::new(MemoryCache::default()));

    for path in ["../etc/passwd", "wikipedia/../../secret.png", "a b.png", "a<script>.png", ""] {
        let err = images.gif_for_path(path).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidResourcePath, "{path:?}");
    }

    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_gif_for_path_fetches_from_upload_host() {
    let fetcher = CountingFetcher::new(png(100, 50));
    let images = service(fetcher.clone(), Arc::new(MemoryCache::default()));

    let gif = images
        .gif_for_path("wikipedia/commons/thumb/a/ab/Example.png/220px-Example.png")
        .await
        .unwrap()
        .expect("gif");

    assert!(gif.starts_with(b"GIF89a"));
    assert_eq!(
        fetcher.seen.lock().unwrap()[0].0,
        "https://upload.wikimedia.org/wikipedia/commons/thumb/a/ab/Example.png/220px-Example.png"
    );
}

#[tokio::test]
async fn test_disk_cache_survives_service_restart() {
    let dir = TempDir::new().unwrap();

    let fetcher = CountingFetcher::new(png(64, 64));
    let first = service(fetcher.clone(), Arc::new(DiskCache::new(dir.path()).unwrap()));
    let original = first.extract_and_cache_image(&source_url(), 320).await.unwrap();

    let path = dir.path().join(format!("{}.gif", cache_key(&source_url())));
    assert_eq!(std::fs::read(&path).unwrap(), original);

    let offline = service(Arc::new(FailingFetcher), Arc::new(DiskCache::new(dir.path()).unwrap()));
    let cached = offline.extract_and_cache_image(&source_url(), 320).await.unwrap();

    assert_eq!(cached, original);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_misses_store_identical_bytes() {
    let dir = TempDir::new().unwrap();
    let fetcher = CountingFetcher::new(png(400, 100));
    let images = Arc::new(service(fetcher.clone(), Arc::new(DiskCache::new(dir.path()).unwrap())));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let images = images.clone();
            tokio::spawn(async move { images.extract_and_cache_image(&source_url(), 320).await })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap().unwrap());
    }

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    let stored = std::fs::read(dir.path().join(format!("{}.gif", cache_key(&source_url())))).unwrap();
    assert_eq!(stored, results[0]);
}

#[test]
fn test_placeholder_gif() {
    assert_eq!(PLACEHOLDER_GIF.len(), 43);
    assert!(PLACEHOLDER_GIF.starts_with(b"GIF89a"));
}
