//! Supplier catalog scraping.
//!
//! The leaf stages of the catalog import pipeline:
//!
//! - [`SiteMapper`] - list discoverable URLs of a supplier site
//! - [`PageFetcher`] - render one page (HTML, markdown, links)
//! - [`ProductPage`] - turn page HTML into [`ProductCandidate`]s
//!
//! Persistence, job tracking and orchestration live in the server crate.
//!
//! # Usage
//!
//! ```rust,ignore
//! use catalog_scraper::{FirecrawlClient, MapRequest, PageFetcher, ProductPage, SiteMapper};
//!
//! let crawler = FirecrawlClient::new(api_key)?;
//! let links = crawler.map_site(&MapRequest::new(seed)).await?;
//! let page = crawler.fetch_page(seed).await?;
//! let candidates: Vec<_> = ProductPage::parse(&page.html, seed)?.candidates().collect();
//! ```

pub mod crawlers;
pub mod error;
pub mod products;
pub mod traits;

// Re-export core types at crate root
pub use crawlers::{FirecrawlClient, MockCrawler, FIRECRAWL_API_URL};
pub use error::{CrawlError, CrawlResult, ExtractError};
pub use products::{
    extract_candidates, is_product_image, ProductCandidate, ProductPage, EXCLUDED_MARKERS,
    MIN_ALT_LEN, PRODUCT_URL_MARKERS,
};
pub use traits::crawler::{
    Crawler, FetchedPage, MapRequest, PageFetcher, SiteMapper, DEFAULT_MAP_LIMIT,
};
