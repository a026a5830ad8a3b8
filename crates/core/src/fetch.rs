//! Content fetching from Wikipedia, files, and stdin.
//!
//! The pipeline never talks to the network directly; it goes through the
//! [`Fetcher`] capability so tests can substitute a double and count calls.
//! [`HttpFetcher`] is the production implementation.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{HttpediaError, Result};

/// Wikipedia host articles are fetched from.
pub const DEFAULT_WIKI_BASE: &str = "https://en.wikipedia.org";

/// HTTP client configuration for upstream requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Identifying User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            user_agent: "HTTPedia/1.0 (minimal Wikipedia proxy for vintage browsers)".to_string(),
        }
    }
}

/// Retrieves raw bytes from an upstream URL.
///
/// Any non-success status, timeout or transport error is a failure. When
/// `limit` is set, implementations must refuse bodies larger than `limit`
/// bytes.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, limit: Option<u64>) -> Result<Vec<u8>>;
}

/// [`Fetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: u64,
}

impl HttpFetcher {
    /// Builds a client with the configured timeout and User-Agent.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(HttpediaError::HttpError)?;

        Ok(Self { client, timeout: config.timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> HttpediaError {
        if err.is_timeout() { HttpediaError::Timeout { timeout: self.timeout } } else { HttpediaError::HttpError(err) }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, limit: Option<u64>) -> Result<Vec<u8>> {
        let mut response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html,image/*;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpediaError::UpstreamStatus { status: status.as_u16() });
        }

        let mut body = ByteLimit::new(limit);
        body.check_declared(response.content_length())?;

        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            body.push(&chunk)?;
        }

        Ok(body.into_inner())
    }
}

/// Body accumulator enforcing an optional byte ceiling.
///
/// The declared length is checked up front so an honest oversize response
/// is rejected before its body is read; the running count catches missing or
/// lying `Content-Length` headers.
#[derive(Debug, Default)]
pub struct ByteLimit {
    limit: Option<u64>,
    buf: Vec<u8>,
}

impl ByteLimit {
    pub fn new(limit: Option<u64>) -> Self {
        Self { limit, buf: Vec::new() }
    }

    /// Rejects a declared content length above the ceiling.
    pub fn check_declared(&self, declared: Option<u64>) -> Result<()> {
        match (self.limit, declared) {
            (Some(limit), Some(len)) if len > limit => Err(HttpediaError::PayloadTooLarge { limit }),
            _ => Ok(()),
        }
    }

    /// Appends a chunk, failing as soon as the total passes the ceiling.
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        if let Some(limit) = self.limit
            && (self.buf.len() + chunk.len()) as u64 > limit
        {
            return Err(HttpediaError::PayloadTooLarge { limit });
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Builds the upstream URL for an article title.
///
/// The title is taken as a single path component under `/wiki/`; traversal
/// sequences are refused instead of being normalized away.
pub fn article_url(wiki_base: &str, title: &str) -> Result<Url> {
    let title = title.trim();
    let traverses = title.split('/').any(|segment| matches!(segment, "." | ".."));
    if title.is_empty() || traverses || title.starts_with('/') {
        return Err(HttpediaError::InvalidUrl(format!("invalid article title: {title:?}")));
    }

    let base = Url::parse(wiki_base).map_err(|e| HttpediaError::InvalidUrl(e.to_string()))?;
    let segment = title.replace(' ', "_").replace('%', "%25").replace('?', "%3F").replace('#', "%23");
    base.join(&format!("/wiki/{segment}"))
        .map_err(|e| HttpediaError::InvalidUrl(e.to_string()))
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(HttpediaError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(HttpediaError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(HttpediaError::from)?;

    Ok(buffer)
}
