//! Site mapping and page fetching abstractions.
//!
//! The remote crawling service exposes two operations the import pipeline
//! needs: listing the URLs of a site (`SiteMapper`) and rendering one page
//! (`PageFetcher`). Both are single-attempt calls; retries are the caller's
//! business and the pipeline makes none.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_scraper::{Crawler, MapRequest};
//!
//! let links = crawler.map_site(&MapRequest::new(seed).with_search("colours")).await?;
//! let page = crawler.fetch_page(seed).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CrawlResult;

/// Default number of links requested from the site mapper.
pub const DEFAULT_MAP_LIMIT: usize = 100;

/// Parameters for a site-mapping request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRequest {
    /// Seed URL to map from
    pub url: String,

    /// Optional keyword filter applied by the remote service
    pub search: Option<String>,

    /// Maximum number of links to return
    pub limit: usize,
}

impl MapRequest {
    /// Create a request for the given seed URL with the default limit.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            search: None,
            limit: DEFAULT_MAP_LIMIT,
        }
    }

    /// Set the keyword filter. Blank strings clear it.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    /// Set the link limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Rendered page content returned by a `PageFetcher`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// Main-content HTML (boilerplate stripped remotely)
    pub html: String,

    /// Markdown rendering, when the service produced one
    pub markdown: Option<String>,

    /// Links discovered on the page
    #[serde(default)]
    pub links: Vec<String>,
}

impl FetchedPage {
    /// Create a page with HTML content only.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            markdown: None,
            links: Vec::new(),
        }
    }

    /// Attach a markdown rendering.
    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    /// Attach the discovered link list.
    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }
}

/// Lists the discoverable URLs of a site.
#[async_trait]
pub trait SiteMapper: Send + Sync {
    /// Request an ordered list of URLs reachable from `request.url`.
    ///
    /// Fails with `CrawlError::Mapping` when the remote service answers with
    /// a non-success status.
    async fn map_site(&self, request: &MapRequest) -> CrawlResult<Vec<String>>;
}

/// Fetches rendered page content.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch HTML, markdown and links for one URL.
    ///
    /// Fails with `CrawlError::Fetch` when the remote service answers with
    /// a non-success status.
    async fn fetch_page(&self, url: &str) -> CrawlResult<FetchedPage>;
}

/// A crawling backend that can both map and fetch, held as `Arc<dyn Crawler>`.
pub trait Crawler: SiteMapper + PageFetcher {
    /// Backend name (for logging).
    fn name(&self) -> &str {
        "unknown"
    }
}
