//! Firecrawl-backed crawler.
//!
//! Talks to the Firecrawl REST API directly with `reqwest`:
//! - `POST /v1/map` for site mapping
//! - `POST /v1/scrape` for single-page rendering (main content only)
//!
//! Each call is a single attempt. A non-success status is turned into a
//! `CrawlError` carrying the response body verbatim so the caller can store
//! it as the job's diagnostic.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CrawlError, CrawlResult};
use crate::traits::crawler::{Crawler, FetchedPage, MapRequest, PageFetcher, SiteMapper};

/// Public Firecrawl endpoint.
pub const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Firecrawl client implementing `SiteMapper` and `PageFetcher`.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_scraper::{FirecrawlClient, MapRequest, SiteMapper};
///
/// let client = FirecrawlClient::new(api_key)?;
/// let links = client.map_site(&MapRequest::new("https://supplier.example")).await?;
/// ```
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    base_url: String,
}

// Request/Response types for Firecrawl API

#[derive(Debug, Serialize)]
struct MapBody<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    links: Vec<MapLink>,
    error: Option<String>,
}

/// Older API revisions return bare strings, newer ones return objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MapLink {
    Url(String),
    Entry { url: String },
}

impl MapLink {
    fn into_url(self) -> String {
        match self {
            MapLink::Url(url) | MapLink::Entry { url } => url,
        }
    }
}

#[derive(Debug, Serialize)]
struct ScrapeBody<'a> {
    url: &'a str,
    formats: [&'static str; 3],
    #[serde(rename = "onlyMainContent")]
    only_main_content: bool,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    html: Option<String>,
    markdown: Option<String>,
    #[serde(default)]
    links: Vec<String>,
}

fn default_success() -> bool {
    true
}

/// Outcome of a POST before it is classified as a mapping or fetch failure.
enum PostFailure {
    Status(u16, String),
    Transport(String),
}

impl FirecrawlClient {
    /// Create a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> CrawlResult<Self> {
        Self::with_options(api_key, FIRECRAWL_API_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client against a custom endpoint (self-hosted Firecrawl) and timeout.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> CrawlResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CrawlError::Configuration(
                "Firecrawl API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CrawlError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url, path)
    }

    async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, PostFailure> {
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| PostFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PostFailure::Status(status.as_u16(), text));
        }

        response
            .json()
            .await
            .map_err(|e| PostFailure::Transport(format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl SiteMapper for FirecrawlClient {
    async fn map_site(&self, request: &MapRequest) -> CrawlResult<Vec<String>> {
        tracing::info!(
            url = %request.url,
            search = ?request.search,
            limit = request.limit,
            "Mapping supplier site"
        );

        let body = MapBody {
            url: &request.url,
            search: request.search.as_deref(),
            limit: request.limit,
        };

        let mapping_error = |status, detail| CrawlError::Mapping {
            url: request.url.clone(),
            status,
            detail,
        };

        let response: MapResponse = self.post("/map", &body).await.map_err(|f| match f {
            PostFailure::Status(code, text) => mapping_error(Some(code), text),
            PostFailure::Transport(text) => mapping_error(None, text),
        })?;

        if !response.success {
            return Err(mapping_error(
                None,
                response.error.unwrap_or_else(|| "map request unsuccessful".to_string()),
            ));
        }

        let links: Vec<String> = response.links.into_iter().map(MapLink::into_url).collect();
        tracing::debug!(url = %request.url, links = links.len(), "Site map received");

        Ok(links)
    }
}

#[async_trait]
impl PageFetcher for FirecrawlClient {
    async fn fetch_page(&self, url: &str) -> CrawlResult<FetchedPage> {
        tracing::info!(url = %url, "Fetching page");

        let body = ScrapeBody {
            url,
            formats: ["markdown", "html", "links"],
            only_main_content: true,
        };

        let fetch_error = |status, detail| CrawlError::Fetch {
            url: url.to_string(),
            status,
            detail,
        };

        let response: ScrapeResponse = self.post("/scrape", &body).await.map_err(|f| match f {
            PostFailure::Status(code, text) => fetch_error(Some(code), text),
            PostFailure::Transport(text) => fetch_error(None, text),
        })?;

        if !response.success {
            return Err(fetch_error(
                None,
                response.error.unwrap_or_else(|| "scrape request unsuccessful".to_string()),
            ));
        }

        let data = response
            .data
            .ok_or_else(|| fetch_error(None, "no data returned".to_string()))?;

        let mut page = FetchedPage::new(url, data.html.unwrap_or_default()).with_links(data.links);
        if let Some(markdown) = data.markdown {
            page = page.with_markdown(markdown);
        }
        Ok(page)
    }
}

impl Crawler for FirecrawlClient {
    fn name(&self) -> &str {
        "firecrawl"
    }
}
