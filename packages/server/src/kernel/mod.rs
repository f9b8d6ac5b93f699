//! Kernel module - server infrastructure and dependencies.

pub mod catalog_store;
pub mod deps;
pub mod stream_hub;
pub mod test_dependencies;
pub mod traits;

pub use catalog_store::PgCatalogStore;
pub use deps::ServerDeps;
pub use stream_hub::StreamHub;
pub use test_dependencies::MemoryCatalogStore;
pub use traits::*;
