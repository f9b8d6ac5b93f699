//! Catalog domain actions

pub mod upsert_candidates;

pub use upsert_candidates::{upsert_candidates, UpsertOutcome, MAX_UPSERT_BATCH};
