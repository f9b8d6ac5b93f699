//! Scrape job - progress record for one catalog import.
//!
//! Field names and status values are consumed verbatim by the progress UI.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

use crate::common::{ScrapeJobId, SupplierId};

/// Import job status.
///
/// `starting → mapping → scraping → inserting → completed | failed`.
/// Not every state is visited; `failed` can follow any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "scrape_job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScrapeJobStatus {
    #[default]
    Starting,
    Mapping,
    Scraping,
    Inserting,
    Completed,
    Failed,
}

impl ScrapeJobStatus {
    /// Terminal jobs never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScrapeJobStatus::Completed | ScrapeJobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeJobStatus::Starting => "starting",
            ScrapeJobStatus::Mapping => "mapping",
            ScrapeJobStatus::Scraping => "scraping",
            ScrapeJobStatus::Inserting => "inserting",
            ScrapeJobStatus::Completed => "completed",
            ScrapeJobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ScrapeJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScrapeJob {
    pub id: ScrapeJobId,
    pub supplier_id: SupplierId,
    pub status: ScrapeJobStatus,
    pub urls_mapped: i32,
    pub urls_to_scrape: i32,
    pub pages_scraped: i32,
    pub pages_failed: i32,
    pub products_found: i32,
    pub products_inserted: i32,
    pub current_url: Option<String>,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Partial update. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeJobUpdate {
    pub status: Option<ScrapeJobStatus>,
    pub urls_mapped: Option<i32>,
    pub urls_to_scrape: Option<i32>,
    pub pages_scraped: Option<i32>,
    pub pages_failed: Option<i32>,
    pub products_found: Option<i32>,
    pub products_inserted: Option<i32>,
    pub current_url: Option<String>,
    pub error_message: Option<String>,
}

impl ScrapeJobUpdate {
    pub fn status(status: ScrapeJobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            status: Some(ScrapeJobStatus::Failed),
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }

    pub fn with_current_url(mut self, url: impl Into<String>) -> Self {
        self.current_url = Some(url.into());
        self
    }

    pub fn with_urls_mapped(mut self, count: usize) -> Self {
        self.urls_mapped = Some(clamp_count(count));
        self
    }

    pub fn with_urls_to_scrape(mut self, count: usize) -> Self {
        self.urls_to_scrape = Some(clamp_count(count));
        self
    }

    pub fn with_pages(mut self, scraped: usize, failed: usize) -> Self {
        self.pages_scraped = Some(clamp_count(scraped));
        self.pages_failed = Some(clamp_count(failed));
        self
    }

    pub fn with_products_found(mut self, count: usize) -> Self {
        self.products_found = Some(clamp_count(count));
        self
    }

    pub fn with_products_inserted(mut self, count: usize) -> Self {
        self.products_inserted = Some(clamp_count(count));
        self
    }

    /// Apply to an in-memory row. Returns `false` (and leaves the row alone)
    /// when the job is already terminal.
    ///
    /// Mirrors the guard in [`ScrapeJob::apply_update`].
    pub fn apply_to(&self, job: &mut ScrapeJob, now: DateTime<Utc>) -> bool {
        if job.status.is_terminal() {
            return false;
        }

        if let Some(status) = self.status {
            job.status = status;
            if status.is_terminal() {
                job.completed_at = Some(now);
            }
        }
        if let Some(v) = self.urls_mapped {
            job.urls_mapped = v;
        }
        if let Some(v) = self.urls_to_scrape {
            job.urls_to_scrape = v;
        }
        if let Some(v) = self.pages_scraped {
            job.pages_scraped = v;
        }
        if let Some(v) = self.pages_failed {
            job.pages_failed = v;
        }
        if let Some(v) = self.products_found {
            job.products_found = v;
        }
        if let Some(v) = self.products_inserted {
            job.products_inserted = v;
        }
        if let Some(url) = &self.current_url {
            job.current_url = Some(url.clone());
        }
        if let Some(message) = &self.error_message {
            job.error_message = Some(message.clone());
        }
        true
    }
}

fn clamp_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl ScrapeJob {
    /// A fresh job row in `starting`, for the current moment.
    pub fn new(supplier_id: SupplierId) -> Self {
        Self {
            id: ScrapeJobId::new(),
            supplier_id,
            status: ScrapeJobStatus::Starting,
            urls_mapped: 0,
            urls_to_scrape: 0,
            pages_scraped: 0,
            pages_failed: 0,
            products_found: 0,
            products_inserted: 0,
            current_url: None,
            error_message: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub async fn create(supplier_id: SupplierId, pool: &PgPool) -> Result<Self> {
        let job = sqlx::query_as::<_, ScrapeJob>(
            r#"
            INSERT INTO scrape_jobs (id, supplier_id, status)
            VALUES ($1, $2, 'starting')
            RETURNING *
            "#,
        )
        .bind(ScrapeJobId::new())
        .bind(supplier_id)
        .fetch_one(pool)
        .await
        .context("Failed to create scrape job")?;
        Ok(job)
    }

    pub async fn find_by_id(id: ScrapeJobId, pool: &PgPool) -> Result<Option<Self>> {
        let job = sqlx::query_as::<_, ScrapeJob>("SELECT * FROM scrape_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(job)
    }

    pub async fn find_latest_for_supplier(
        supplier_id: SupplierId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let job = sqlx::query_as::<_, ScrapeJob>(
            r#"
            SELECT * FROM scrape_jobs
            WHERE supplier_id = $1
            ORDER BY started_at DESC
            LIMIT 1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(pool)
        .await?;
        Ok(job)
    }

    /// Apply a partial update unless the job is terminal.
    ///
    /// Returns `None` when the job does not exist or is already
    /// `completed`/`failed`; the stored row is untouched in both cases.
    pub async fn apply_update(
        id: ScrapeJobId,
        update: &ScrapeJobUpdate,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let job = sqlx::query_as::<_, ScrapeJob>(
            r#"
            UPDATE scrape_jobs
            SET status = COALESCE($2, status),
                urls_mapped = COALESCE($3, urls_mapped),
                urls_to_scrape = COALESCE($4, urls_to_scrape),
                pages_scraped = COALESCE($5, pages_scraped),
                pages_failed = COALESCE($6, pages_failed),
                products_found = COALESCE($7, products_found),
                products_inserted = COALESCE($8, products_inserted),
                current_url = COALESCE($9, current_url),
                error_message = COALESCE($10, error_message),
                completed_at = CASE
                    WHEN $2::scrape_job_status IN ('completed', 'failed') THEN NOW()
                    ELSE completed_at
                END
            WHERE id = $1
              AND status NOT IN ('completed', 'failed')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.status)
        .bind(update.urls_mapped)
        .bind(update.urls_to_scrape)
        .bind(update.pages_scraped)
        .bind(update.pages_failed)
        .bind(update.products_found)
        .bind(update.products_inserted)
        .bind(&update.current_url)
        .bind(&update.error_message)
        .fetch_optional(pool)
        .await
        .context("Failed to update scrape job")?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let names: Vec<String> = [
            ScrapeJobStatus::Starting,
            ScrapeJobStatus::Mapping,
            ScrapeJobStatus::Scraping,
            ScrapeJobStatus::Inserting,
            ScrapeJobStatus::Completed,
            ScrapeJobStatus::Failed,
        ]
        .iter()
        .map(|s| serde_json::to_value(s).unwrap().as_str().unwrap().to_string())
        .collect();

        assert_eq!(
            names,
            vec!["starting", "mapping", "scraping", "inserting", "completed", "failed"]
        );
    }

    #[test]
    fn test_row_serializes_contract_fields() {
        let job = ScrapeJob::new(SupplierId::new());
        let json = serde_json::to_value(&job).unwrap();

        for field in [
            "id",
            "supplier_id",
            "status",
            "urls_mapped",
            "urls_to_scrape",
            "pages_scraped",
            "pages_failed",
            "products_found",
            "products_inserted",
            "current_url",
            "error_message",
            "started_at",
            "completed_at",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn test_apply_partial_update() {
        let mut job = ScrapeJob::new(SupplierId::new());
        let update = ScrapeJobUpdate::status(ScrapeJobStatus::Mapping)
            .with_current_url("https://supplier.example")
            .with_urls_mapped(12);

        assert!(update.apply_to(&mut job, Utc::now()));
        assert_eq!(job.status, ScrapeJobStatus::Mapping);
        assert_eq!(job.urls_mapped, 12);
        assert_eq!(job.current_url.as_deref(), Some("https://supplier.example"));
        assert_eq!(job.products_found, 0);
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut job = ScrapeJob::new(SupplierId::new());
        assert!(ScrapeJobUpdate::failed("Supplier not found.").apply_to(&mut job, Utc::now()));
        let completed_at = job.completed_at;
        assert!(completed_at.is_some());

        let snapshot = job.clone();
        let later = ScrapeJobUpdate::status(ScrapeJobStatus::Completed).with_products_inserted(5);
        assert!(!later.apply_to(&mut job, Utc::now()));
        assert_eq!(job, snapshot);
    }
}
