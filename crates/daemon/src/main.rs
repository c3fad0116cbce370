//! Waitline - Server Entry Point
//!
//! Composition root: settings, logging, SQLite, queue service and HTTP server.

mod settings;

use anyhow::{Context, Result};
use settings::{LogFormat, Settings};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use waitline_api_http::{AppState, HttpServer, StaticKeyGate};
use waitline_core::application::QueueService;
use waitline_core::port::time_provider::SystemTimeProvider;
use waitline_infra_sqlite::{create_pool, run_migrations, SqliteEntryRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the parent directory of a file-backed database
fn ensure_db_dir(database_url: &str) -> Result<()> {
    if database_url.contains(":memory:") {
        return Ok(());
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("waitline=info,tower_http=info"))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received. Exiting gracefully...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration and initialize logging
    let settings = Settings::load()?;
    init_logging(settings.log.format()?)?;

    info!("Waitline v{} starting...", VERSION);

    settings.validate().context("Invalid configuration")?;

    // 2. Initialize database
    info!(database_url = %settings.database_url, "Initializing database...");

    ensure_db_dir(&settings.database_url)?;
    let pool = create_pool(&settings.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let entry_repo = Arc::new(SqliteEntryRepository::new(pool.clone()));
    let service = Arc::new(QueueService::new(
        entry_repo.clone(),
        entry_repo,
        time_provider,
    ));
    let gate = Arc::new(StaticKeyGate::new(settings.api_key.clone()));

    // 4. Start HTTP server
    let server = HttpServer::bind(&settings.http_config(), AppState::new(service, gate))
        .await
        .context("HTTP server start failed")?;

    info!(addr = %server.local_addr()?, "System ready. Press Ctrl+C to shutdown");

    server
        .serve(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    pool.close().await;
    info!("Shutdown complete.");

    Ok(())
}
