//! Job tracker - persists scrape job progress and fans it out to observers.
//!
//! Every applied update publishes the full job row on two topics:
//! `scrape_job:{job_id}` and `supplier_imports:{supplier_id}`. The second lets
//! a UI subscribe before it knows the job id. A terminal row is the signal to
//! unsubscribe.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::common::{ScrapeJobId, SupplierId};
use crate::domains::imports::models::{ScrapeJob, ScrapeJobUpdate};
use crate::kernel::{BaseCatalogStore, ServerDeps, StreamHub};

/// SSE event name for job rows.
pub const JOB_EVENT_TYPE: &str = "scrape_job";

pub fn job_topic(job_id: ScrapeJobId) -> String {
    format!("scrape_job:{}", job_id)
}

pub fn supplier_topic(supplier_id: SupplierId) -> String {
    format!("supplier_imports:{}", supplier_id)
}

#[derive(Clone)]
pub struct JobTracker {
    store: Arc<dyn BaseCatalogStore>,
    hub: StreamHub,
}

impl JobTracker {
    pub fn new(store: Arc<dyn BaseCatalogStore>, hub: StreamHub) -> Self {
        Self { store, hub }
    }

    pub fn from_deps(deps: &ServerDeps) -> Self {
        Self::new(deps.catalog_store.clone(), deps.stream_hub.clone())
    }

    pub fn store(&self) -> &dyn BaseCatalogStore {
        self.store.as_ref()
    }

    pub async fn create(&self, supplier_id: SupplierId) -> Result<ScrapeJob> {
        let job = self.store.create_scrape_job(supplier_id).await?;
        debug!(job_id = %job.id, supplier_id = %supplier_id, "Created scrape job");
        self.publish(&job).await;
        Ok(job)
    }

    /// Apply `update` and publish the new row.
    ///
    /// Updates to a terminal job are ignored: the stored row comes back
    /// unchanged and nothing is published.
    pub async fn update(&self, job_id: ScrapeJobId, update: ScrapeJobUpdate) -> Result<ScrapeJob> {
        if let Some(job) = self.store.update_scrape_job(job_id, &update).await? {
            self.publish(&job).await;
            return Ok(job);
        }

        let job = self
            .store
            .find_scrape_job(job_id)
            .await?
            .ok_or_else(|| anyhow!("Scrape job {} not found", job_id))?;
        debug!(job_id = %job_id, status = %job.status, "Ignoring update to terminal scrape job");
        Ok(job)
    }

    /// Mark the job failed with `message`.
    pub async fn fail(&self, job_id: ScrapeJobId, message: impl Into<String>) -> Result<ScrapeJob> {
        self.update(job_id, ScrapeJobUpdate::failed(message)).await
    }

    pub async fn subscribe(&self, job_id: ScrapeJobId) -> broadcast::Receiver<serde_json::Value> {
        self.hub.subscribe(&job_topic(job_id)).await
    }

    pub async fn subscribe_supplier(
        &self,
        supplier_id: SupplierId,
    ) -> broadcast::Receiver<serde_json::Value> {
        self.hub.subscribe(&supplier_topic(supplier_id)).await
    }

    async fn publish(&self, job: &ScrapeJob) {
        let payload = match job_event(job) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(job_id = %job.id, error = %e, "Failed to serialize scrape job event");
                return;
            }
        };

        self.hub.publish(&job_topic(job.id), payload.clone()).await;
        self.hub
            .publish(&supplier_topic(job.supplier_id), payload)
            .await;
    }
}

/// The job row as a JSON object tagged with [`JOB_EVENT_TYPE`].
pub fn job_event(job: &ScrapeJob) -> serde_json::Result<serde_json::Value> {
    let mut value = serde_json::to_value(job)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("type".to_string(), JOB_EVENT_TYPE.into());
    }
    Ok(value)
}
