// Supplier Catalog - API Core
//
// Backend for the cabinetry catalog: supplier and catalog CRUD, the
// map → scrape → extract → upsert import pipeline with a streamed job record,
// the per-session palette and saved mood boards.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
pub use server::build_app;
