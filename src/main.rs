//! sauna-site server entry point.
//!
//! Loads configuration, picks the store, wires the services and serves the
//! Axum app.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use sauna_site::app_state::AppState;
use sauna_site::build_app;
use sauna_site::config::SiteConfig;
use sauna_site::integrations::Integrations;
use sauna_site::persistence::{MemoryStore, PgStore, SiteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = SiteConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting sauna-site");

    // Build persistence layer
    let store: Arc<dyn SiteStore> = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .context("connecting to PostgreSQL")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        tracing::info!("database ready");
        Arc::new(PgStore::new(pool))
    } else {
        tracing::warn!("persistence disabled, using in-memory store");
        Arc::new(MemoryStore::new())
    };

    // Build integrations
    let integrations = Integrations::from_config(&config).context("building integrations")?;
    tracing::info!(
        smtp = config.smtp.is_some(),
        ai = config.ai.is_some(),
        search_console = config.search_console.is_some(),
        "integrations configured"
    );

    // Build application state and router
    let listen_addr = config.listen_addr;
    let app = build_app(AppState::new(config, store, integrations));

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("binding {listen_addr}"))?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
