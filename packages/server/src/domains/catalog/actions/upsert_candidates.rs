//! Catalog upsert writer
//!
//! Writes extracted product candidates as catalog rows.

use tracing::{debug, warn};

use crate::domains::catalog::models::{CatalogItem, CatalogItemUpsert};
use crate::kernel::BaseCatalogStore;

/// Hard ceiling on rows written per invocation; the rest are dropped.
pub const MAX_UPSERT_BATCH: usize = 100;

/// Rows that were written, in input order.
#[derive(Debug, Default)]
pub struct UpsertOutcome {
    pub written: Vec<CatalogItem>,
    pub failed: usize,
}

impl UpsertOutcome {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}

/// Insert-or-overwrite the first [`MAX_UPSERT_BATCH`] rows.
///
/// Each row is its own statement. A failing row is logged and skipped, and
/// does not count towards `written`.
pub async fn upsert_candidates(
    rows: &[CatalogItemUpsert],
    store: &dyn BaseCatalogStore,
) -> UpsertOutcome {
    let mut outcome = UpsertOutcome::default();

    if rows.len() > MAX_UPSERT_BATCH {
        debug!(
            candidates = rows.len(),
            limit = MAX_UPSERT_BATCH,
            "Truncating candidate batch"
        );
    }

    for row in rows.iter().take(MAX_UPSERT_BATCH) {
        match store.upsert_catalog_item(row).await {
            Ok(item) => outcome.written.push(item),
            Err(e) => {
                warn!(
                    supplier_id = %row.supplier_id,
                    name = %row.name,
                    error = %e,
                    "Failed to upsert catalog item, skipping"
                );
                outcome.failed += 1;
            }
        }
    }

    outcome
}
