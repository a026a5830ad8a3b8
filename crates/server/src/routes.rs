use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::Router;
use axum::routing::get;
use httpedia_core::{
    DiskCache, ErrorCategory, Fetcher, HttpFetcher, HttpediaError, ImageMode, ImageService, PLACEHOLDER_GIF,
    Renderer, Skin,
};
use serde::Deserialize;
use tower_http::compression::CompressionLayer;
use tracing::{info, warn};

use crate::config::{ImageFallback, Settings};
use crate::prefs::{PrefsQuery, settings_links, with_query};
use crate::templates::{ErrorTemplate, HiddenField, IndexTemplate, PageTemplate, render};

const GIF_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<Renderer>,
    pub fetcher: Arc<dyn Fetcher>,
    pub images: Arc<ImageService>,
    pub image_fallback: ImageFallback,
}

impl AppState {
    pub fn new(
        renderer: Renderer, fetcher: Arc<dyn Fetcher>, images: ImageService, image_fallback: ImageFallback,
    ) -> Self {
        Self { renderer: Arc::new(renderer), fetcher, images: Arc::new(images), image_fallback }
    }

    /// Production wiring: HTTP fetcher, on-disk image cache.
    pub fn from_settings(settings: &Settings) -> httpedia_core::Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&settings.fetch_config())?);
        let cache = Arc::new(DiskCache::new(settings.cache_dir())?);
        let images = ImageService::new(fetcher.clone(), cache, settings.image_config());
        let renderer = Renderer::with_config(settings.render_config())?;
        Ok(Self::new(renderer, fetcher, images, settings.image_fallback))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", get(search))
        .route("/wiki/{*title}", get(wiki))
        .route("/img/{*path}", get(image))
        .layer(CompressionLayer::new())
        .with_state(state)
}

async fn index(Query(query): Query<PrefsQuery>) -> Response {
    let prefs = query.to_preferences();
    let (skins, modes) = settings_links(prefs.skin, prefs.images);

    let mut hidden = Vec::new();
    if prefs.skin != Skin::default() {
        hidden.push(HiddenField { name: "skin", value: prefs.skin.to_string() });
    }
    if prefs.images != ImageMode::default() {
        hidden.push(HiddenField { name: "img", value: prefs.images.to_string() });
    }

    let template = IndexTemplate { home_href: with_query("/", prefs.query.as_deref()), hidden, skins, modes };
    render(template, StatusCode::OK)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    skin: Option<String>,
    img: Option<String>,
}

/// Jump straight to the article named by `q`.
///
/// Answers with a plain 302, the redirect every HTTP/1.0 client follows.
async fn search(Query(query): Query<SearchQuery>) -> Response {
    let prefs = PrefsQuery { skin: query.skin, img: query.img }.to_preferences();
    let title = query.q.split_whitespace().collect::<Vec<_>>().join("_");

    let target = if title.is_empty() {
        with_query("/", prefs.query.as_deref())
    } else {
        with_query(&format!("/wiki/{}", urlencoding::encode(&title)), prefs.query.as_deref())
    };

    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

async fn wiki(State(state): State<AppState>, Path(title): Path<String>, Query(query): Query<PrefsQuery>) -> Response {
    let started_at = Instant::now();
    let prefs = query.to_preferences();
    let home_href = with_query("/", prefs.query.as_deref());

    match state.renderer.fetch_and_render(state.fetcher.as_ref(), &title, &prefs).await {
        Ok(article) => {
            info!(
                target = "httpedia::server",
                op = "routes::wiki",
                result = "ok",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                title = %title,
                blocks = article.block_count,
                images = usize::from(article.hero.is_some()) + article.gallery.len(),
                "Article rendered"
            );
            let template = PageTemplate {
                title: article.title,
                body: article.body_html,
                canonical_url: article.canonical_url,
                home_href,
            };
            render(template, StatusCode::OK)
        }
        Err(err) => {
            warn!(
                target = "httpedia::server",
                op = "routes::wiki",
                result = "error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                title = %title,
                error = %err,
                "Article unavailable"
            );
            render(ErrorTemplate { message: article_error_message(&err), home_href }, StatusCode::BAD_GATEWAY)
        }
    }
}

fn article_error_message(err: &HttpediaError) -> &'static str {
    match err.category() {
        ErrorCategory::UnparsableDocument => "Could not parse article",
        _ => "Could not fetch article",
    }
}

/// Serve a transcoded image.
///
/// The path is read from the raw URI so percent escapes reach validation
/// exactly as they appear in the upload URL.
async fn image(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path().strip_prefix("/img/").unwrap_or_default();

    match state.images.gif_for_path(path).await {
        Ok(Some(gif)) => {
            ([(header::CONTENT_TYPE, "image/gif"), (header::CACHE_CONTROL, GIF_CACHE_CONTROL)], gif).into_response()
        }
        Ok(None) => match state.image_fallback {
            ImageFallback::Placeholder => {
                ([(header::CONTENT_TYPE, "image/gif"), (header::CACHE_CONTROL, "no-store")], PLACEHOLDER_GIF)
                    .into_response()
            }
            ImageFallback::NotFound => StatusCode::NOT_FOUND.into_response(),
        },
        Err(err) => {
            warn!(
                target = "httpedia::server",
                op = "routes::image",
                result = "rejected",
                path = %path,
                error = %err,
                "Image path rejected"
            );
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
