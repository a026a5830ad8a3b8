//! HTTP front end for the HTTPedia renderer.
//!
//! Serves the home page, search redirects, rendered articles under
//! `/wiki/<title>` and transcoded images under `/img/<path>`.

pub mod config;
pub mod prefs;
pub mod routes;
pub mod telemetry;
mod templates;

pub use config::{ImageFallback, LogFormat, Settings};
pub use routes::{AppState, build_router};
