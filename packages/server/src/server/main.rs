// Main entry point for the catalog API server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use catalog_scraper::{Crawler, FirecrawlClient};
use server_core::{build_app, kernel::ServerDeps, kernel::StreamHub, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often abandoned change-feed topics are dropped.
const STREAM_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server_core=debug,catalog_scraper=debug,sqlx=warn".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting supplier catalog API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let crawler: Option<Arc<dyn Crawler>> = match &config.firecrawl_api_key {
        Some(key) => {
            let client = FirecrawlClient::with_options(
                key.as_str(),
                config.firecrawl_api_url.as_str(),
                config.scraper_timeout,
            )
            .context("Failed to create Firecrawl client")?;
            tracing::info!(endpoint = %config.firecrawl_api_url, "Firecrawl client configured");
            Some(Arc::new(client) as Arc<dyn Crawler>)
        }
        None => {
            tracing::warn!("FIRECRAWL_API_KEY not set; catalog imports will be rejected");
            None
        }
    };

    let stream_hub = StreamHub::new();
    spawn_stream_cleanup(stream_hub.clone());

    let deps = ServerDeps::new(pool, crawler, stream_hub);
    let app = build_app(deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn spawn_stream_cleanup(hub: StreamHub) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STREAM_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = hub.cleanup().await;
            if removed > 0 {
                tracing::debug!(removed, "Dropped idle stream topics");
            }
        }
    });
}
