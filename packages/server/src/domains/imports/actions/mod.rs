//! Imports domain actions

pub mod import_catalog;

pub use import_catalog::{
    import_catalog, scrape_plan, spawn_import, ImportOptions, ImportRequest, ImportSummary, DEFAULT_MAX_PAGES,
    SUMMARY_PRODUCT_LIMIT,
};
