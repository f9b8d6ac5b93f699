//! Server dependencies (using traits for testability)
//!
//! Central container handed to the import pipeline and HTTP handlers.
//! External services sit behind trait objects so tests can swap them.

use sqlx::PgPool;
use std::sync::Arc;

use catalog_scraper::Crawler;

use crate::kernel::{stream_hub::StreamHub, BaseCatalogStore, PgCatalogStore};

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Remote crawling service. `None` when no credentials are configured;
    /// imports then fail fast with a configuration error.
    pub crawler: Option<Arc<dyn Crawler>>,
    pub catalog_store: Arc<dyn BaseCatalogStore>,
    /// In-process pub/sub hub for the import change feed
    pub stream_hub: StreamHub,
}

impl ServerDeps {
    /// Production wiring: Postgres-backed store over the given pool.
    pub fn new(db_pool: PgPool, crawler: Option<Arc<dyn Crawler>>, stream_hub: StreamHub) -> Self {
        let catalog_store = Arc::new(PgCatalogStore::new(db_pool.clone()));
        Self {
            db_pool,
            crawler,
            catalog_store,
            stream_hub,
        }
    }
}
