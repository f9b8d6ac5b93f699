use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use catalog_scraper::FIRECRAWL_API_URL;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    /// Missing key is not fatal at startup; imports fail with a configuration error instead.
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_api_url: String,
    pub scraper_timeout: Duration,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            firecrawl_api_key: env::var("FIRECRAWL_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            firecrawl_api_url: env::var("FIRECRAWL_API_URL")
                .unwrap_or_else(|_| FIRECRAWL_API_URL.to_string()),
            scraper_timeout: Duration::from_secs(
                env::var("SCRAPER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()
                    .context("SCRAPER_TIMEOUT_SECS must be a valid number")?,
            ),
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
