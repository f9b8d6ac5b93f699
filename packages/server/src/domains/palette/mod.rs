//! Palette domain - per-session liked catalog items.

pub mod models;

pub use models::LikedItem;
