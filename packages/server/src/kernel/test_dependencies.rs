// TestDependencies - in-memory implementations for testing
//
// Lets the import pipeline run without Postgres. Records every call so tests
// can assert on how many writes were attempted.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::BaseCatalogStore;
use crate::common::{CatalogItemId, ScrapeJobId, SupplierId};
use crate::domains::catalog::models::{CatalogItem, CatalogItemUpsert};
use crate::domains::imports::models::{ScrapeJob, ScrapeJobUpdate};
use crate::domains::suppliers::models::{Supplier, SupplierCategory};

// =============================================================================
// Memory Catalog Store
// =============================================================================

#[derive(Default)]
struct StoreState {
    suppliers: HashMap<SupplierId, Supplier>,
    jobs: HashMap<ScrapeJobId, ScrapeJob>,
    items: Vec<CatalogItem>,
    upsert_attempts: Vec<CatalogItemUpsert>,
    failing_names: HashSet<String>,
}

/// In-memory [`BaseCatalogStore`] with the same conflict and terminal-state
/// rules as the Postgres tables.
#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active supplier and return it.
    pub fn add_supplier(&self, name: &str) -> Supplier {
        let now = Utc::now();
        let supplier = Supplier {
            id: SupplierId::new(),
            slug: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            logo_url: None,
            website_url: None,
            scrape_config: None,
            is_active: true,
            category: Some(SupplierCategory::BenchTop),
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .suppliers
            .insert(supplier.id, supplier.clone());
        supplier
    }

    /// Make upserts of the named item fail.
    pub fn fail_upserts_for(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_names
            .insert(name.to_string());
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        self.state.lock().unwrap().items.clone()
    }

    pub fn items_for(&self, supplier_id: SupplierId) -> Vec<CatalogItem> {
        self.items()
            .into_iter()
            .filter(|i| i.supplier_id == Some(supplier_id))
            .collect()
    }

    /// Every upsert call, including ones that failed.
    pub fn upsert_attempts(&self) -> Vec<CatalogItemUpsert> {
        self.state.lock().unwrap().upsert_attempts.clone()
    }

    pub fn job(&self, id: ScrapeJobId) -> Option<ScrapeJob> {
        self.state.lock().unwrap().jobs.get(&id).cloned()
    }

    pub fn jobs(&self) -> Vec<ScrapeJob> {
        self.state.lock().unwrap().jobs.values().cloned().collect()
    }
}

#[async_trait]
impl BaseCatalogStore for MemoryCatalogStore {
    async fn find_supplier(&self, id: SupplierId) -> Result<Option<Supplier>> {
        Ok(self.state.lock().unwrap().suppliers.get(&id).cloned())
    }

    async fn create_scrape_job(&self, supplier_id: SupplierId) -> Result<ScrapeJob> {
        let job = ScrapeJob::new(supplier_id);
        self.state.lock().unwrap().jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_scrape_job(&self, id: ScrapeJobId) -> Result<Option<ScrapeJob>> {
        Ok(self.job(id))
    }

    async fn update_scrape_job(
        &self,
        id: ScrapeJobId,
        update: &ScrapeJobUpdate,
    ) -> Result<Option<ScrapeJob>> {
        let mut state = self.state.lock().unwrap();
        let Some(job) = state.jobs.get_mut(&id) else {
            return Ok(None);
        };
        if update.apply_to(job, Utc::now()) {
            Ok(Some(job.clone()))
        } else {
            Ok(None)
        }
    }

    async fn upsert_catalog_item(&self, item: &CatalogItemUpsert) -> Result<CatalogItem> {
        let mut state = self.state.lock().unwrap();
        state.upsert_attempts.push(item.clone());

        if state.failing_names.contains(&item.name) {
            bail!("simulated write failure for '{}'", item.name);
        }

        let now = Utc::now();
        if let Some(existing) = state
            .items
            .iter_mut()
            .find(|i| i.supplier_id == Some(item.supplier_id) && i.name == item.name)
        {
            existing.image_url = Some(item.image_url.clone());
            existing.thumbnail_url = Some(item.image_url.clone());
            existing.source_url = Some(item.source_url.clone());
            existing.is_active = true;
            existing.last_synced_at = Some(now);
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = CatalogItem {
            id: CatalogItemId::new(),
            supplier_id: Some(item.supplier_id),
            category_id: None,
            range_id: None,
            name: item.name.clone(),
            description: None,
            material: None,
            color: None,
            hex_color: None,
            brand: None,
            price: None,
            sku: None,
            finish_type: None,
            dimensions: None,
            thumbnail_url: Some(item.image_url.clone()),
            image_url: Some(item.image_url.clone()),
            source_url: Some(item.source_url.clone()),
            is_active: true,
            last_synced_at: Some(now),
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        };
        state.items.push(row.clone());
        Ok(row)
    }
}
