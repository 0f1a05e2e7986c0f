//! Server entry point.

use std::sync::Mutex;

use anyhow::Context;
use patent_search::{
    config::SearchConfig,
    error_log::RotatingFile,
    server_extra::{AppState, build_router},
};
use tracing::info;
use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SearchConfig::from_env().context("failed to load configuration")?;

    let console = tracing_subscriber::fmt::layer().with_filter(LevelFilter::from_level(config.log_level));
    let error_file = match &config.error_log {
        Some(error_log) => {
            let file = RotatingFile::open(error_log.clone())
                .with_context(|| format!("failed to open error log {}", error_log.path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::ERROR),
            )
        }
        None => None,
    };
    tracing_subscriber::registry().with(console).with(error_file).init();

    info!("Search engine: {}", config.solr_select_url());
    info!(
        "last_10_years range: {} TO {}",
        config.last_10_years.from, config.last_10_years.to
    );

    let app = build_router(AppState::new(&config));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server stopped")?;
    Ok(())
}
