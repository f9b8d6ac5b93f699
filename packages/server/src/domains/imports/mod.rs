//! Imports domain - scraping a supplier's website into the catalog.

pub mod actions;
pub mod error;
pub mod models;
pub mod tracker;

pub use actions::{import_catalog, spawn_import, ImportOptions, ImportRequest, ImportSummary};
pub use error::ImportError;
pub use models::{ScrapeJob, ScrapeJobStatus, ScrapeJobUpdate};
pub use tracker::{job_topic, supplier_topic, JobTracker};
