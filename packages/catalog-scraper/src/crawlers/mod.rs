//! Crawler implementations.
//!
//! - `FirecrawlClient` - Firecrawl REST API (map + scrape)
//! - `MockCrawler` - For testing

mod firecrawl;
mod mock;

pub use firecrawl::{FirecrawlClient, FIRECRAWL_API_URL};
pub use mock::MockCrawler;

// Re-export from traits for convenience
pub use crate::traits::crawler::{Crawler, FetchedPage, MapRequest, PageFetcher, SiteMapper};
