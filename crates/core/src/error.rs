//! Error types for HTTPedia operations.
//!
//! This module defines the main error type [`HttpediaError`] which represents
//! every failure the article and image pipelines can hit. Callers at the
//! edge of the system are expected to collapse these into a neutral fallback
//! (an error page or a missing image), never a crash.
//!
//! # Example
//!
//! ```rust
//! use httpedia_core::{ErrorCategory, HttpediaError};
//!
//! let err = HttpediaError::NoContent;
//! assert_eq!(err.category(), ErrorCategory::UnparsableDocument);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for article rendering and image transcoding.
#[derive(Error, Debug)]
pub enum HttpediaError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, and connection issues.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Upstream answered with a non-success status.
    #[error("Upstream responded with status {status}")]
    UpstreamStatus { status: u16 },

    /// Invalid URL or article title.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// No article body could be located in the document.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// A payload exceeded the configured byte ceiling.
    #[error("Payload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    /// Image decoding or encoding failed.
    #[error("Image processing failed: {0}")]
    ImageError(#[from] image::ImageError),

    /// The transcoding task could not complete.
    #[error("Transcoding failed: {0}")]
    Transcode(String),

    /// An image path failed the allow-set or contained traversal sequences.
    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Coarse grouping of [`HttpediaError`] variants.
///
/// Route handlers pick their fallback (error page, placeholder image) from
/// the category alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network failure, timeout or non-2xx status while talking to upstream.
    UpstreamFetchFailure,
    /// The document had no recognizable article body.
    UnparsableDocument,
    /// Undecodable, unencodable, or oversized image payload.
    UnsupportedImageFormat,
    /// Image path rejected before any fetch.
    InvalidResourcePath,
    /// Local file or cache I/O.
    Storage,
}

impl HttpediaError {
    /// Maps the error onto its [`ErrorCategory`].
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::Timeout { .. } | Self::UpstreamStatus { .. } | Self::InvalidUrl(_) => {
                ErrorCategory::UpstreamFetchFailure
            }
            Self::HtmlParseError(_) | Self::NoContent => ErrorCategory::UnparsableDocument,
            Self::PayloadTooLarge { .. } | Self::ImageError(_) | Self::Transcode(_) => {
                ErrorCategory::UnsupportedImageFormat
            }
            Self::InvalidResourcePath(_) => ErrorCategory::InvalidResourcePath,
            Self::FileNotFound(_) | Self::WriteError(_) => ErrorCategory::Storage,
        }
    }
}

/// Result type alias for HttpediaError.
pub type Result<T> = std::result::Result<T, HttpediaError>;
