//! Router tests, driven in-process with a fake upstream.
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use httpedia_core::{
    CacheStore, Fetcher, HttpediaError, ImageConfig, ImageService, PLACEHOLDER_GIF, RenderConfig, Renderer, Result,
};
use httpedia_server::{AppState, ImageFallback, build_router};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tower::ServiceExt;
use url::Url;

struct FakeUpstream {
    article: Vec<u8>,
    png: Vec<u8>,
    calls: AtomicUsize,
}

impl FakeUpstream {
    fn new() -> Arc<Self> {
        let article = std::fs::read("../../tests/fixtures/article.html").unwrap();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(480, 240, Rgba([200, 40, 40, 255])));
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();
        Arc::new(Self { article, png, calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeUpstream {
    async fn fetch(&self, url: &Url, _limit: Option<u64>) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match (url.host_str(), url.path()) {
            (Some("en.wikipedia.org"), "/wiki/Rust_(programming_language)") => Ok(self.article.clone()),
            (Some("en.wikipedia.org"), "/wiki/Blank") => Ok(b"<html><body><p>No body</p></body></html>".to_vec()),
            (Some("upload.wikimedia.org"), path) if path.ends_with("Broken.png") => Ok(b"not a png".to_vec()),
            (Some("upload.wikimedia.org"), _) => Ok(self.png.clone()),
            _ => Err(HttpediaError::UpstreamStatus { status: 404 }),
        }
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

fn app(upstream: Arc<FakeUpstream>, fallback: ImageFallback) -> Router {
    let images = ImageService::new(upstream.clone(), Arc::new(MemoryCache::default()), ImageConfig::default());
    let renderer = Renderer::with_config(RenderConfig::default()).unwrap();
    build_router(AppState::new(renderer, upstream, images, fallback))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let (status, _, body) = get(app, uri).await;
    (status, String::from_utf8(body).unwrap())
}

#[tokio::test]
async fn test_index_page() {
    let app = app(FakeUpstream::new(), ImageFallback::Placeholder);
    let (status, body) = get_text(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 2.0//EN\">"));
    assert!(body.contains("<form action=\"/search\" method=\"get\">"));
    assert!(!body.contains("type=\"hidden\""));
}

#[tokio::test]
async fn test_index_keeps_preferences_in_form() {
    let app = app(FakeUpstream::new(), ImageFallback::Placeholder);
    let (_, body) = get_text(&app, "/?skin=plain&img=all").await;

    assert!(body.contains("<input type=\"hidden\" name=\"skin\" value=\"plain\">"));
    assert!(body.contains("<input type=\"hidden\" name=\"img\" value=\"all\">"));
    assert!(body.contains("<b>plain</b>"));
}

#[tokio::test]
async fn test_search_redirects() {
    let app = app(FakeUpstream::new(), ImageFallback::Placeholder);

    let (status, headers, _) = get(&app, "/search?q=Rust+(programming+language)&img=all").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers[header::LOCATION], "/wiki/Rust_%28programming_language%29?img=all");

    let (status, headers, _) = get(&app, "/search?q=++").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers[header::LOCATION], "/");
}

#[tokio::test]
async fn test_article_page() {
    let app = app(FakeUpstream::new(), ImageFallback::Placeholder);
    let (status, headers, body) = get(&app, "/wiki/Rust_(programming_language)").await;
    let body = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(body.starts_with("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 2.0//EN\">"));
    assert!(body.contains("<title>Rust (programming language) - HTTPedia</title>"));
    assert!(body.contains("<center>\n<h2>Rust (programming language)</h2>\n</center>"));
    assert!(body.contains("<h2>History</h2>"));
    assert!(body.contains("<a href=\"/wiki/Mozilla\">Mozilla</a>"));
    assert!(body.contains("<img src=\"/img/wikipedia/commons/thumb/d/d5/"));
    assert!(body.contains("href=\"https://en.wikipedia.org/wiki/Rust_(programming_language)\""));
    assert!(!body.contains("<script"));
}

#[tokio::test]
async fn test_article_links_carry_preferences() {
    let app = app(FakeUpstream::new(), ImageFallback::Placeholder);
    let (_, body) = get_text(&app, "/wiki/Rust_(programming_language)?skin=plain&img=none").await;

    assert!(body.contains("<a href=\"/wiki/Mozilla?skin=plain&amp;img=none\">Mozilla</a>"));
    assert!(!body.contains("<img"));
    assert!(body.contains("<h1><a href=\"/?skin=plain&#38;img=none\">HTTPedia</a></h1>"));
}

#[tokio::test]
async fn test_article_errors() {
    let app = app(FakeUpstream::new(), ImageFallback::Placeholder);

    let (status, body) = get_text(&app, "/wiki/Missing_page").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("<p>Could not fetch article</p>"));
    assert!(body.contains("<a href=\"/\">Home</a>"));

    let (status, body) = get_text(&app, "/wiki/Blank").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("<p>Could not parse article</p>"));
}

#[tokio::test]
async fn test_image_route_serves_cached_gif() {
    let upstream = FakeUpstream::new();
    let app = app(upstream.clone(), ImageFallback::Placeholder);
    let uri = "/img/wikipedia/commons/thumb/8/8e/Graydon_Hoare.jpg/220px-Graydon_Hoare.jpg";

    let (status, headers, first) = get(&app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/gif");
    assert!(headers[header::CACHE_CONTROL].to_str().unwrap().contains("max-age"));
    assert!(first.starts_with(b"GIF89a"));

    let decoded = image::load_from_memory(&first).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (320, 160));

    let (_, _, second) = get(&app, uri).await;
    assert_eq!(first, second);
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_image_failure_policies() {
    let uri = "/img/wikipedia/commons/a/ab/Broken.png";

    let placeholder = app(FakeUpstream::new(), ImageFallback::Placeholder);
    let (status, headers, body) = get(&placeholder, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/gif");
    assert_eq!(body, PLACEHOLDER_GIF);

    let not_found = app(FakeUpstream::new(), ImageFallback::NotFound);
    let (status, _, _) = get(&not_found, uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_path_traversal_is_rejected() {
    let upstream = FakeUpstream::new();
    let app = app(upstream.clone(), ImageFallback::Placeholder);

    for uri in [
        "/img/a/../../etc/passwd",
        "/img/..%2F..%2Fsecret",
        "/img/a;b.png",
        "/img/wikipedia/commons/%2e%2e/%2E%2E/secret.png",
    ] {
        let (status, _, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    assert_eq!(upstream.calls(), 0);
}
