//! Typed errors for the catalog scraper.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the server can map
//! each failure class onto a job status and an HTTP status.

use thiserror::Error;

/// Errors raised while talking to the remote crawling service.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Credentials or endpoint for the crawling service are missing.
    #[error("crawler not configured: {0}")]
    Configuration(String),

    /// The site-mapping request did not succeed.
    #[error("site mapping failed for {url}{}: {detail}", status_suffix(.status))]
    Mapping {
        url: String,
        status: Option<u16>,
        detail: String,
    },

    /// The page-fetch request did not succeed.
    #[error("page fetch failed for {url}{}: {detail}", status_suffix(.status))]
    Fetch {
        url: String,
        status: Option<u16>,
        detail: String,
    },
}

impl CrawlError {
    /// Raw diagnostic payload returned by the remote service, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CrawlError::Configuration(_) => None,
            CrawlError::Mapping { detail, .. } | CrawlError::Fetch { detail, .. } => {
                Some(detail.as_str())
            }
        }
    }

    /// HTTP status the remote service answered with. `None` for transport failures.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            CrawlError::Configuration(_) => None,
            CrawlError::Mapping { status, .. } | CrawlError::Fetch { status, .. } => *status,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Errors raised by the product extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The base URL used to resolve relative image sources is not absolute.
    #[error("invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;
