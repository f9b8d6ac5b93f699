//! Import orchestrator
//!
//! Drives one supplier import end to end:
//! `starting → mapping → scraping → inserting → completed | failed`.
//!
//! Stages run sequentially; there is no retry and no cancellation. The first
//! stage error fails the job with that error's text and is returned to the
//! caller. [`spawn_import`] detaches the run from its caller, so a dropped
//! request still leaves the job `completed` or `failed`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use catalog_scraper::{
    extract_candidates, Crawler, MapRequest, PageFetcher, ProductCandidate, SiteMapper,
    DEFAULT_MAP_LIMIT,
};

use crate::common::{ScrapeJobId, SupplierId};
use crate::domains::catalog::actions::upsert_candidates;
use crate::domains::catalog::models::{CatalogItem, CatalogItemUpsert};
use crate::domains::imports::error::ImportError;
use crate::domains::imports::models::{ScrapeJob, ScrapeJobStatus, ScrapeJobUpdate};
use crate::domains::imports::tracker::JobTracker;

/// Pages fetched when `maxPages` is not given: the seed only.
pub const DEFAULT_MAX_PAGES: usize = 1;

/// Inserted rows echoed back in the summary.
pub const SUMMARY_PRODUCT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// Keyword filter passed to the site mapper
    #[serde(default)]
    pub search: Option<String>,
    /// Maximum links the mapper returns
    #[serde(default)]
    pub limit: Option<usize>,
    /// Pages to fetch: the seed plus up to `max_pages - 1` mapped URLs
    #[serde(default)]
    pub max_pages: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub supplier_id: SupplierId,
    pub url: String,
    #[serde(default)]
    pub options: ImportOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub job_id: ScrapeJobId,
    /// Supplier display name
    pub supplier: String,
    pub urls_found: usize,
    pub products_extracted: usize,
    pub products_inserted: usize,
    /// First few inserted rows
    pub products: Vec<CatalogItem>,
}

/// Run an import.
///
/// Fails with [`ImportError::Configuration`] before any job exists when no
/// crawler is available.
pub async fn import_catalog(
    request: &ImportRequest,
    crawler: Option<&dyn Crawler>,
    tracker: &JobTracker,
) -> Result<ImportSummary, ImportError> {
    let crawler = crawler.ok_or_else(|| {
        ImportError::Configuration("FIRECRAWL_API_KEY is not set".to_string())
    })?;
    validate_seed_url(&request.url)?;

    let job = tracker.create(request.supplier_id).await?;
    info!(
        job_id = %job.id,
        supplier_id = %request.supplier_id,
        url = %request.url,
        "Starting catalog import"
    );

    match run_stages(&job, request, crawler, tracker).await {
        Ok(summary) => {
            info!(
                job_id = %job.id,
                urls_found = summary.urls_found,
                products_extracted = summary.products_extracted,
                products_inserted = summary.products_inserted,
                "Catalog import completed"
            );
            Ok(summary)
        }
        Err(e) => {
            warn!(job_id = %job.id, error = %e, "Catalog import failed");
            if let Err(update_err) = tracker.fail(job.id, e.to_string()).await {
                warn!(job_id = %job.id, error = %update_err, "Failed to mark scrape job failed");
            }
            Err(e)
        }
    }
}

/// Run an import on its own task.
///
/// The returned handle may be dropped; the import still runs to a terminal
/// state.
pub fn spawn_import(
    request: ImportRequest,
    crawler: Option<Arc<dyn Crawler>>,
    tracker: JobTracker,
) -> JoinHandle<Result<ImportSummary, ImportError>> {
    tokio::spawn(async move { import_catalog(&request, crawler.as_deref(), &tracker).await })
}

async fn run_stages(
    job: &ScrapeJob,
    request: &ImportRequest,
    crawler: &dyn Crawler,
    tracker: &JobTracker,
) -> Result<ImportSummary, ImportError> {
    let seed = request.url.as_str();
    let options = &request.options;

    let supplier = tracker
        .store()
        .find_supplier(request.supplier_id)
        .await?
        .ok_or(ImportError::SupplierNotFound(request.supplier_id))?;

    // Mapping
    tracker
        .update(
            job.id,
            ScrapeJobUpdate::status(ScrapeJobStatus::Mapping).with_current_url(seed),
        )
        .await?;

    let mut map_request =
        MapRequest::new(seed).with_limit(options.limit.unwrap_or(DEFAULT_MAP_LIMIT));
    if let Some(search) = &options.search {
        map_request = map_request.with_search(search.as_str());
    }
    let links = crawler.map_site(&map_request).await?;

    let plan = scrape_plan(
        seed,
        &links,
        options.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
    );

    // Scraping
    tracker
        .update(
            job.id,
            ScrapeJobUpdate::status(ScrapeJobStatus::Scraping)
                .with_urls_mapped(links.len())
                .with_urls_to_scrape(plan.len()),
        )
        .await?;

    let mut rows: Vec<CatalogItemUpsert> = Vec::new();
    let mut pages_scraped = 0;
    let mut pages_failed = 0;

    for (index, page_url) in plan.iter().enumerate() {
        tracker
            .update(
                job.id,
                ScrapeJobUpdate::default()
                    .with_current_url(page_url.as_str())
                    .with_pages(pages_scraped, pages_failed),
            )
            .await?;

        let candidates = match fetch_candidates(crawler, page_url).await {
            Ok(candidates) => candidates,
            Err(e) if index == 0 => return Err(e),
            Err(e) => {
                warn!(job_id = %job.id, url = %page_url, error = %e, "Skipping page");
                pages_failed += 1;
                continue;
            }
        };

        pages_scraped += 1;
        rows.extend(
            candidates
                .iter()
                .map(|c| CatalogItemUpsert::from_candidate(supplier.id, c, page_url.as_str())),
        );
    }

    // Inserting
    tracker
        .update(
            job.id,
            ScrapeJobUpdate::status(ScrapeJobStatus::Inserting)
                .with_pages(pages_scraped, pages_failed)
                .with_products_found(rows.len()),
        )
        .await?;

    let outcome = upsert_candidates(&rows, tracker.store()).await;

    tracker
        .update(
            job.id,
            ScrapeJobUpdate::status(ScrapeJobStatus::Completed)
                .with_products_inserted(outcome.written_count()),
        )
        .await?;

    let products_inserted = outcome.written_count();
    let mut products = outcome.written;
    products.truncate(SUMMARY_PRODUCT_LIMIT);

    Ok(ImportSummary {
        job_id: job.id,
        supplier: supplier.name,
        urls_found: links.len(),
        products_extracted: rows.len(),
        products_inserted,
        products,
    })
}

/// Fetch one page and extract its candidates.
///
/// The parsed document never crosses an await point.
async fn fetch_candidates(
    crawler: &dyn Crawler,
    url: &str,
) -> Result<Vec<ProductCandidate>, ImportError> {
    let page = crawler.fetch_page(url).await?;
    extract_candidates(&page.html, url)
        .map_err(|e| ImportError::InvalidRequest(e.to_string()))
}

/// Seed first, then distinct mapped URLs, `max_pages` in total (at least 1).
pub fn scrape_plan(seed: &str, links: &[String], max_pages: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    seen.insert(seed);

    let mut plan = vec![seed.to_string()];
    for link in links {
        if plan.len() >= max_pages.max(1) {
            break;
        }
        if seen.insert(link.as_str()) {
            plan.push(link.clone());
        }
    }
    plan
}

fn validate_seed_url(raw: &str) -> Result<(), ImportError> {
    let url = Url::parse(raw)
        .map_err(|e| ImportError::InvalidRequest(format!("url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ImportError::InvalidRequest(format!(
            "url '{}': unsupported scheme '{}'",
            raw, scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MemoryCatalogStore, StreamHub};
    use async_trait::async_trait;
    use catalog_scraper::{CrawlResult, FetchedPage, MockCrawler};
    use std::time::Duration;

    const SEED: &str = "https://supplier.example/colours";

    const CASHMERE_PAGE: &str = r#"
        <html><body>
          <img src="/images/logo.png" alt="Brand Logo">
          <img src="/products/cashmere-oak.jpg" alt="Cashmere Oak">
        </body></html>
    "#;

    struct Harness {
        store: MemoryCatalogStore,
        tracker: JobTracker,
        supplier_id: SupplierId,
    }

    fn harness() -> Harness {
        let store = MemoryCatalogStore::new();
        let supplier = store.add_supplier("Polytec");
        let tracker = JobTracker::new(Arc::new(store.clone()), StreamHub::new());
        Harness {
            store,
            tracker,
            supplier_id: supplier.id,
        }
    }

    fn request(supplier_id: SupplierId) -> ImportRequest {
        ImportRequest {
            supplier_id,
            url: SEED.to_string(),
            options: ImportOptions::default(),
        }
    }

    fn gallery(count: usize) -> String {
        let imgs: String = (0..count)
            .map(|i| format!(r#"<img src="/swatch/{i}.jpg" alt="Finish {i}">"#))
            .collect();
        format!("<html><body>{imgs}</body></html>")
    }

    #[tokio::test]
    async fn test_cashmere_oak_import_completes() {
        let h = harness();
        let crawler = MockCrawler::new()
            .with_links(vec![SEED.to_string(), format!("{SEED}/oak")])
            .with_page(FetchedPage::new(SEED, CASHMERE_PAGE));

        let summary = import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap();

        assert_eq!(summary.supplier, "Polytec");
        assert_eq!(summary.urls_found, 2);
        assert_eq!(summary.products_extracted, 1);
        assert_eq!(summary.products_inserted, 1);
        assert_eq!(summary.products[0].name, "Cashmere Oak");
        assert_eq!(
            summary.products[0].image_url.as_deref(),
            Some("https://supplier.example/products/cashmere-oak.jpg")
        );

        let job = h.store.job(summary.job_id).unwrap();
        assert_eq!(job.status, ScrapeJobStatus::Completed);
        assert_eq!(job.urls_mapped, 2);
        assert_eq!(job.urls_to_scrape, 1);
        assert_eq!(job.pages_scraped, 1);
        assert_eq!(job.products_found, 1);
        assert_eq!(job.products_inserted, 1);
        assert!(job.completed_at.is_some());
        assert!(job.error_message.is_none());
    }

    #[tokio::test]
    async fn test_zero_mapped_links_still_scrapes_seed() {
        let h = harness();
        let crawler = MockCrawler::new().with_page(FetchedPage::new(SEED, CASHMERE_PAGE));

        let summary = import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap();

        assert_eq!(summary.urls_found, 0);
        assert_eq!(summary.products_inserted, 1);
        assert!(crawler.was_fetched(SEED));
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_job_with_payload() {
        let h = harness();
        let crawler =
            MockCrawler::new().with_fetch_failure(SEED, 502, r#"{"error":"upstream timeout"}"#);

        let err = import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Crawl(_)));

        let job = h.store.jobs().pop().unwrap();
        assert_eq!(job.status, ScrapeJobStatus::Failed);
        assert!(job
            .error_message
            .as_deref()
            .unwrap()
            .contains("upstream timeout"));
        assert_eq!(job.products_found, 0);
        assert_eq!(job.products_inserted, 0);
        assert!(h.store.items().is_empty());
    }

    #[tokio::test]
    async fn test_mapping_failure_fails_job_before_fetch() {
        let h = harness();
        let crawler = MockCrawler::new().with_map_failure(401, "Unauthorized: invalid token");

        let err = import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Crawl(_)));
        assert!(crawler.fetch_calls().is_empty());

        let job = h.store.jobs().pop().unwrap();
        assert_eq!(job.status, ScrapeJobStatus::Failed);
        assert!(job.error_message.unwrap().contains("invalid token"));
    }

    #[tokio::test]
    async fn test_unknown_supplier_fails_job() {
        let h = harness();
        let crawler = MockCrawler::new().with_page(FetchedPage::new(SEED, CASHMERE_PAGE));

        let err = import_catalog(&request(SupplierId::new()), Some(&crawler), &h.tracker)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::SupplierNotFound(_)));
        assert!(crawler.map_calls().is_empty());

        let job = h.store.jobs().pop().unwrap();
        assert_eq!(job.status, ScrapeJobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("Supplier not found."));
    }

    #[tokio::test]
    async fn test_missing_crawler_creates_no_job() {
        let h = harness();

        let err = import_catalog(&request(h.supplier_id), None, &h.tracker)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::Configuration(_)));
        assert!(h.store.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_large_gallery_is_capped() {
        let h = harness();
        let crawler = MockCrawler::new().with_page(FetchedPage::new(SEED, gallery(250)));

        let summary = import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap();

        assert_eq!(summary.products_extracted, 250);
        assert_eq!(summary.products_inserted, 100);
        assert_eq!(summary.products.len(), SUMMARY_PRODUCT_LIMIT);
        assert_eq!(h.store.upsert_attempts().len(), 100);
    }

    #[tokio::test]
    async fn test_rerun_updates_instead_of_duplicating() {
        let h = harness();
        let crawler = MockCrawler::new().with_page(FetchedPage::new(SEED, CASHMERE_PAGE));

        import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap();
        let first_sync = h.store.items()[0].last_synced_at.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap();

        let items = h.store.items_for(h.supplier_id);
        assert_eq!(items.len(), 1);
        assert!(items[0].last_synced_at.unwrap() > first_sync);
        assert_eq!(h.store.jobs().len(), 2);
    }

    #[tokio::test]
    async fn test_max_pages_follows_mapped_links() {
        let h = harness();
        let second = "https://supplier.example/colours/woodgrains";
        let broken = "https://supplier.example/colours/broken";
        let crawler = MockCrawler::new()
            .with_links(vec![SEED.to_string(), broken.to_string(), second.to_string()])
            .with_page(FetchedPage::new(SEED, CASHMERE_PAGE))
            .with_page(FetchedPage::new(
                second,
                r#"<img src="/colour/natural-walnut.jpg" alt="Natural Walnut">"#,
            ))
            .with_fetch_failure(broken, 500, "boom");

        let mut req = request(h.supplier_id);
        req.options.max_pages = Some(3);

        let summary = import_catalog(&req, Some(&crawler), &h.tracker)
            .await
            .unwrap();

        assert_eq!(summary.products_inserted, 2);
        let job = h.store.job(summary.job_id).unwrap();
        assert_eq!(job.urls_to_scrape, 3);
        assert_eq!(job.pages_scraped, 2);
        assert_eq!(job.pages_failed, 1);

        let walnut = h
            .store
            .items()
            .into_iter()
            .find(|i| i.name == "Natural Walnut")
            .unwrap();
        assert_eq!(walnut.source_url.as_deref(), Some(second));
    }

    #[tokio::test]
    async fn test_map_request_carries_options() {
        let h = harness();
        let crawler = MockCrawler::new().with_page(FetchedPage::new(SEED, CASHMERE_PAGE));

        let mut req = request(h.supplier_id);
        req.options.search = Some("oak".to_string());
        req.options.limit = Some(25);
        import_catalog(&req, Some(&crawler), &h.tracker).await.unwrap();

        let calls = crawler.map_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].search.as_deref(), Some("oak"));
        assert_eq!(calls[0].limit, 25);
    }

    #[tokio::test]
    async fn test_progress_is_streamed_until_terminal() {
        let h = harness();
        let mut rx = h.tracker.subscribe_supplier(h.supplier_id).await;
        let crawler = MockCrawler::new().with_page(FetchedPage::new(SEED, CASHMERE_PAGE));

        import_catalog(&request(h.supplier_id), Some(&crawler), &h.tracker)
            .await
            .unwrap();

        let mut statuses = Vec::new();
        while let Ok(event) = rx.try_recv() {
            statuses.push(event["status"].as_str().unwrap().to_string());
        }
        assert_eq!(statuses.first().map(String::as_str), Some("starting"));
        assert_eq!(statuses.last().map(String::as_str), Some("completed"));
        assert!(statuses.iter().any(|s| s == "mapping"));
        assert!(statuses.iter().any(|s| s == "inserting"));
    }

    #[test]
    fn test_scrape_plan_defaults_to_seed() {
        let links = vec!["https://a/1".to_string(), "https://a/2".to_string()];
        assert_eq!(scrape_plan("https://a", &links, 1), vec!["https://a"]);
        assert_eq!(scrape_plan("https://a", &links, 0), vec!["https://a"]);
    }

    #[test]
    fn test_scrape_plan_skips_duplicates() {
        let links = vec![
            "https://a".to_string(),
            "https://a/1".to_string(),
            "https://a/1".to_string(),
            "https://a/2".to_string(),
        ];
        assert_eq!(
            scrape_plan("https://a", &links, 10),
            vec!["https://a", "https://a/1", "https://a/2"]
        );
    }

    #[test]
    fn test_request_uses_camel_case() {
        let json = serde_json::json!({
            "supplierId": "0193a4b0-0000-7000-8000-000000000001",
            "url": SEED,
            "options": { "search": "oak", "maxPages": 2 }
        });
        let req: ImportRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.options.max_pages, Some(2));
        assert_eq!(req.options.limit, None);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_rejected_before_job() {
        let h = harness();
        let crawler = MockCrawler::new();
        let mut req = request(h.supplier_id);
        req.url = "not a url".to_string();

        let err = import_catalog(&req, Some(&crawler), &h.tracker)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidRequest(_)));
        assert!(h.store.jobs().is_empty());
    }

    /// Serves the mock's pages after a fixed delay.
    struct SlowCrawler {
        inner: MockCrawler,
        delay: Duration,
    }

    #[async_trait]
    impl SiteMapper for SlowCrawler {
        async fn map_site(&self, request: &MapRequest) -> CrawlResult<Vec<String>> {
            self.inner.map_site(request).await
        }
    }

    #[async_trait]
    impl PageFetcher for SlowCrawler {
        async fn fetch_page(&self, url: &str) -> CrawlResult<FetchedPage> {
            tokio::time::sleep(self.delay).await;
            self.inner.fetch_page(url).await
        }
    }

    impl Crawler for SlowCrawler {}

    #[tokio::test]
    async fn test_dropped_caller_still_reaches_terminal_state() {
        let h = harness();
        let crawler: Arc<dyn Crawler> = Arc::new(SlowCrawler {
            inner: MockCrawler::new().with_page(FetchedPage::new(SEED, CASHMERE_PAGE)),
            delay: Duration::from_millis(200),
        });

        // The caller gives up while the seed page is still being fetched
        let handle = spawn_import(request(h.supplier_id), Some(crawler), h.tracker.clone());
        let waited = tokio::time::timeout(Duration::from_millis(50), handle).await;
        assert!(waited.is_err());

        let job = h.store.jobs().pop().unwrap();
        assert_eq!(job.status, ScrapeJobStatus::Scraping);

        let mut job = job;
        for _ in 0..100 {
            if job.status.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            job = h.store.job(job.id).unwrap();
        }

        assert_eq!(job.status, ScrapeJobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert_eq!(h.store.items_for(h.supplier_id).len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_import_returns_summary() {
        let h = harness();
        let crawler: Arc<dyn Crawler> =
            Arc::new(MockCrawler::new().with_page(FetchedPage::new(SEED, CASHMERE_PAGE)));

        let summary = spawn_import(request(h.supplier_id), Some(crawler), h.tracker.clone())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.products_inserted, 1);
    }
}
