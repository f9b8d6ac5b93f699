//! Mock crawler for testing.
//!
//! Serves canned site maps and pages, can be told to fail either operation,
//! and records every call for verification.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CrawlError, CrawlResult};
use crate::traits::crawler::{Crawler, FetchedPage, MapRequest, PageFetcher, SiteMapper};

/// Mock crawler for testing.
///
/// # Example
///
/// ```rust
/// use catalog_scraper::{FetchedPage, MockCrawler};
///
/// let mock = MockCrawler::new()
///     .with_links(vec!["https://example.com/colours".to_string()])
///     .with_page(FetchedPage::new("https://example.com", "<img src=\"a.jpg\" alt=\"Oak\">"));
/// ```
#[derive(Default, Clone)]
pub struct MockCrawler {
    links: Arc<RwLock<Vec<String>>>,
    pages: Arc<RwLock<HashMap<String, FetchedPage>>>,
    map_failure: Arc<RwLock<Option<(u16, String)>>>,
    fetch_failures: Arc<RwLock<HashMap<String, (u16, String)>>>,
    map_calls: Arc<RwLock<Vec<MapRequest>>>,
    fetch_calls: Arc<RwLock<Vec<String>>>,
}

impl MockCrawler {
    /// Create a new empty mock crawler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links returned by every `map_site` call (builder pattern).
    pub fn with_links(self, links: Vec<String>) -> Self {
        *self.links.write().unwrap() = links;
        self
    }

    /// Page returned when its URL is fetched (builder pattern).
    pub fn with_page(self, page: FetchedPage) -> Self {
        self.add_page(page);
        self
    }

    /// Make `map_site` answer with a non-success status.
    pub fn with_map_failure(self, status: u16, body: impl Into<String>) -> Self {
        *self.map_failure.write().unwrap() = Some((status, body.into()));
        self
    }

    /// Make fetching `url` answer with a non-success status.
    pub fn with_fetch_failure(
        self,
        url: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.fetch_failures
            .write()
            .unwrap()
            .insert(url.into(), (status, body.into()));
        self
    }

    /// Add or replace a canned page.
    pub fn add_page(&self, page: FetchedPage) {
        self.pages.write().unwrap().insert(page.url.clone(), page);
    }

    /// Requests passed to `map_site`.
    pub fn map_calls(&self) -> Vec<MapRequest> {
        self.map_calls.read().unwrap().clone()
    }

    /// URLs passed to `fetch_page`, in call order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.read().unwrap().clone()
    }

    /// Check if a URL was fetched.
    pub fn was_fetched(&self, url: &str) -> bool {
        self.fetch_calls.read().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl SiteMapper for MockCrawler {
    async fn map_site(&self, request: &MapRequest) -> CrawlResult<Vec<String>> {
        self.map_calls.write().unwrap().push(request.clone());

        if let Some((status, body)) = self.map_failure.read().unwrap().clone() {
            return Err(CrawlError::Mapping {
                url: request.url.clone(),
                status: Some(status),
                detail: body,
            });
        }

        let links = self.links.read().unwrap();
        Ok(links.iter().take(request.limit).cloned().collect())
    }
}

#[async_trait]
impl PageFetcher for MockCrawler {
    async fn fetch_page(&self, url: &str) -> CrawlResult<FetchedPage> {
        self.fetch_calls.write().unwrap().push(url.to_string());

        if let Some((status, body)) = self.fetch_failures.read().unwrap().get(url).cloned() {
            return Err(CrawlError::Fetch {
                url: url.to_string(),
                status: Some(status),
                detail: body,
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CrawlError::Fetch {
                url: url.to_string(),
                status: Some(404),
                detail: "no canned page".to_string(),
            })
    }
}

impl Crawler for MockCrawler {
    fn name(&self) -> &str {
        "mock"
    }
}
