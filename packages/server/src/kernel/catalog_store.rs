//! Postgres-backed [`BaseCatalogStore`]. Delegates to the model queries.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::BaseCatalogStore;
use crate::common::{ScrapeJobId, SupplierId};
use crate::domains::catalog::models::{CatalogItem, CatalogItemUpsert};
use crate::domains::imports::models::{ScrapeJob, ScrapeJobUpdate};
use crate::domains::suppliers::models::Supplier;

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCatalogStore for PgCatalogStore {
    async fn find_supplier(&self, id: SupplierId) -> Result<Option<Supplier>> {
        Supplier::find_by_id(id, &self.pool).await
    }

    async fn create_scrape_job(&self, supplier_id: SupplierId) -> Result<ScrapeJob> {
        ScrapeJob::create(supplier_id, &self.pool).await
    }

    async fn find_scrape_job(&self, id: ScrapeJobId) -> Result<Option<ScrapeJob>> {
        ScrapeJob::find_by_id(id, &self.pool).await
    }

    async fn update_scrape_job(
        &self,
        id: ScrapeJobId,
        update: &ScrapeJobUpdate,
    ) -> Result<Option<ScrapeJob>> {
        ScrapeJob::apply_update(id, update, &self.pool).await
    }

    async fn upsert_catalog_item(&self, item: &CatalogItemUpsert) -> Result<CatalogItem> {
        CatalogItem::upsert_scraped(item, &self.pool).await
    }
}
