use clap::Parser;
use httpedia_server::{AppState, Settings, build_router, telemetry};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::parse();
    telemetry::init(settings.log_level, settings.log_format)?;

    let state = AppState::from_settings(&settings)?;
    let listener = TcpListener::bind(settings.bind).await?;

    info!(
        target = "httpedia::server",
        op = "main",
        addr = %settings.bind,
        cache_dir = %settings.cache_dir().display(),
        wiki_base = %settings.wiki_base,
        "HTTPedia listening"
    );

    axum::serve(listener, build_router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(target = "httpedia::server", op = "main", "Shutting down");
    }
}
