//! Import pipeline errors.
//!
//! The first error raised by a stage fails the job; its `Display` text becomes
//! the job's `error_message`.

use catalog_scraper::CrawlError;
use thiserror::Error;

use crate::common::SupplierId;

#[derive(Debug, Error)]
pub enum ImportError {
    /// No crawler credentials. Raised before a job row exists.
    #[error("Catalog scraping is not configured: {0}")]
    Configuration(String),

    /// Malformed request (e.g. a seed URL that is not absolute).
    #[error("Invalid import request: {0}")]
    InvalidRequest(String),

    #[error("Supplier not found.")]
    SupplierNotFound(SupplierId),

    /// Remote mapping or fetch failure; carries the remote payload.
    #[error(transparent)]
    Crawl(CrawlError),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ImportError {
    /// Extra diagnostic detail for API consumers.
    pub fn details(&self) -> Option<String> {
        match self {
            ImportError::Crawl(e) => e.detail().map(str::to_string),
            ImportError::SupplierNotFound(id) => Some(format!("supplier_id {id}")),
            _ => None,
        }
    }
}

impl From<CrawlError> for ImportError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Configuration(message) => ImportError::Configuration(message),
            other => ImportError::Crawl(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_configuration_maps_to_configuration() {
        let err: ImportError = CrawlError::Configuration("missing key".into()).into();
        assert!(matches!(err, ImportError::Configuration(_)));
    }

    #[test]
    fn test_remote_failure_keeps_payload() {
        let err: ImportError = CrawlError::Mapping {
            url: "https://supplier.example".into(),
            status: Some(429),
            detail: r#"{"error":"rate limited"}"#.into(),
        }
        .into();

        assert!(err.to_string().contains("rate limited"));
        assert_eq!(err.details().as_deref(), Some(r#"{"error":"rate limited"}"#));
    }

    #[test]
    fn test_supplier_not_found_message() {
        let err = ImportError::SupplierNotFound(SupplierId::new());
        assert_eq!(err.to_string(), "Supplier not found.");
    }
}
