//! Server settings, parsed from flags with environment fallbacks.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use httpedia_core::images::default_cache_dir;
use httpedia_core::{DEFAULT_WIKI_BASE, FetchConfig, ImageConfig, RenderConfig};
use tracing::level_filters::LevelFilter;

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Command-line arguments for the HTTPedia server.
#[derive(Debug, Clone, Parser)]
#[command(name = "httpedia-server", version, about = "Minimal Wikipedia proxy for vintage browsers")]
pub struct Settings {
    /// Address to listen on.
    #[arg(long, env = "HTTPEDIA_BIND", default_value = DEFAULT_BIND, value_name = "ADDR")]
    pub bind: SocketAddr,

    /// Directory for transcoded images [default: user cache dir]/httpedia/img.
    #[arg(long = "cache-dir", env = "HTTPEDIA_CACHE_DIR", value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Widest image served, in pixels.
    #[arg(long = "image-max-width", env = "HTTPEDIA_IMAGE_MAX_WIDTH", default_value_t = 320)]
    pub image_max_width: u32,

    /// Largest upstream image accepted, in bytes.
    #[arg(long = "image-max-bytes", env = "HTTPEDIA_IMAGE_MAX_BYTES", default_value_t = 5 * 1024 * 1024)]
    pub image_max_bytes: u64,

    /// Most images shown on one article with `img=all`.
    #[arg(long = "max-images", env = "HTTPEDIA_MAX_IMAGES", default_value_t = 10)]
    pub max_images: usize,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "HTTPEDIA_TIMEOUT", default_value_t = 10, value_name = "SECONDS")]
    pub timeout: u64,

    /// Wikipedia base URL.
    #[arg(long = "wiki-base", env = "HTTPEDIA_WIKI_BASE", default_value = DEFAULT_WIKI_BASE, value_name = "URL")]
    pub wiki_base: String,

    /// Response to an image that cannot be produced.
    #[arg(long = "image-fallback", env = "HTTPEDIA_IMAGE_FALLBACK", value_enum, default_value_t = ImageFallback::Placeholder)]
    pub image_fallback: ImageFallback,

    /// Base log level (trace|debug|info|warn|error); RUST_LOG takes precedence.
    #[arg(long = "log-level", env = "HTTPEDIA_LOG_LEVEL", default_value = "info", value_name = "LEVEL")]
    pub log_level: LevelFilter,

    /// Log output format.
    #[arg(long = "log-format", env = "HTTPEDIA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// What `/img/` answers when transcoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFallback {
    /// A 1x1 transparent GIF, keeping page layout intact.
    Placeholder,
    /// A plain 404.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Compact,
}

impl Settings {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig { timeout: self.timeout, ..Default::default() }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::builder().max_images(self.max_images).wiki_base(&self.wiki_base).build()
    }

    pub fn image_config(&self) -> ImageConfig {
        ImageConfig { max_width: self.image_max_width, max_bytes: self.image_max_bytes, ..Default::default() }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["httpedia-server"]).unwrap();
        assert_eq!(settings.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(settings.image_max_width, 320);
        assert_eq!(settings.image_fallback, ImageFallback::Placeholder);
        assert_eq!(settings.log_level, LevelFilter::INFO);
        assert_eq!(settings.render_config().max_images, 10);
        assert_eq!(settings.fetch_config().timeout, 10);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::try_parse_from([
            "httpedia-server",
            "--bind",
            "127.0.0.1:9000",
            "--cache-dir",
            "/tmp/httpedia",
            "--image-max-width",
            "200",
            "--max-images",
            "3",
            "--image-fallback",
            "not-found",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(settings.bind.port(), 9000);
        assert_eq!(settings.cache_dir(), PathBuf::from("/tmp/httpedia"));
        assert_eq!(settings.image_config().max_width, 200);
        assert_eq!(settings.render_config().max_images, 3);
        assert_eq!(settings.image_fallback, ImageFallback::NotFound);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_bad_log_level() {
        assert!(Settings::try_parse_from(["httpedia-server", "--log-level", "loud"]).is_err());
    }
}
