//! Typed ids for every persisted entity.

pub use super::id::Id;

/// Marker type for suppliers.
pub struct Supplier;

/// Marker type for catalog items.
pub struct CatalogItem;

/// Marker type for catalog import jobs.
pub struct ScrapeJob;

/// Marker type for palette entries.
pub struct LikedItem;

/// Marker type for saved mood boards.
pub struct SavedBoard;

pub type SupplierId = Id<Supplier>;
pub type CatalogItemId = Id<CatalogItem>;
pub type ScrapeJobId = Id<ScrapeJob>;
pub type LikedItemId = Id<LikedItem>;
pub type SavedBoardId = Id<SavedBoard>;
