use std::time::{Duration, Instant};

use anyhow::Context;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use invoice_api_rust::config;
use invoice_api_rust::database::{DatabaseManager, PgInvoiceRepository};
use invoice_api_rust::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DB_*, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config().clone();
    tracing::info!("Starting invoice API in {:?} mode", config.environment);

    anyhow::ensure!(
        !config.security.jwt_secret.is_empty(),
        "JWT_SECRET env variable not defined"
    );

    let pool = DatabaseManager::connect(&config.database, &config.database.name)
        .await
        .with_context(|| format!("failed to connect to database {}", config.database.name))?;
    DatabaseManager::migrate(&pool).await.context("failed to migrate database")?;
    DatabaseManager::health_check(&pool).await.context("database is not answering")?;

    if config.server.heartbeat_interval_secs > 0 {
        spawn_heartbeat(pool.clone(), Duration::from_secs(config.server.heartbeat_interval_secs));
    }

    let port = config.server.port;
    let state = AppState::new(config, PgInvoiceRepository::new(pool.clone()))?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening to requests on port={}", port);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    Ok(())
}

/// Periodic liveness line with uptime and pool usage.
fn spawn_heartbeat(pool: PgPool, every: Duration) {
    tokio::spawn(async move {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tracing::info!(
                uptime_secs = started.elapsed().as_secs(),
                pool_size = pool.size(),
                pool_idle = pool.num_idle(),
                "heart beat"
            );
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
