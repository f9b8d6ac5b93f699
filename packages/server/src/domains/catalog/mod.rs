pub mod actions;
pub mod models;

pub use models::catalog_item::{CatalogItem, CatalogItemInput, CatalogItemUpsert};
