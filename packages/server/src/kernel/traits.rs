// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The import pipeline lives in domains/imports and talks to storage through these.
//
// Naming convention: Base* for trait names (e.g., BaseCatalogStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{ScrapeJobId, SupplierId};
use crate::domains::catalog::models::{CatalogItem, CatalogItemUpsert};
use crate::domains::imports::models::{ScrapeJob, ScrapeJobUpdate};
use crate::domains::suppliers::models::Supplier;

// =============================================================================
// Catalog Store Trait (Infrastructure - rows touched by an import)
// =============================================================================

#[async_trait]
pub trait BaseCatalogStore: Send + Sync {
    async fn find_supplier(&self, id: SupplierId) -> Result<Option<Supplier>>;

    /// Insert a new job in `starting`.
    async fn create_scrape_job(&self, supplier_id: SupplierId) -> Result<ScrapeJob>;

    async fn find_scrape_job(&self, id: ScrapeJobId) -> Result<Option<ScrapeJob>>;

    /// Apply a partial update. `None` when the job is missing or terminal.
    async fn update_scrape_job(
        &self,
        id: ScrapeJobId,
        update: &ScrapeJobUpdate,
    ) -> Result<Option<ScrapeJob>>;

    /// Insert-or-overwrite on `(supplier_id, name)`.
    async fn upsert_catalog_item(&self, item: &CatalogItemUpsert) -> Result<CatalogItem>;
}
