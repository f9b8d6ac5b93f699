//! Catalog items - the products shown in the collections browser.
//!
//! Rows come from two places: manual admin entry and the import pipeline's
//! upsert. The pipeline only ever touches the fields it can extract (name,
//! image, source URL) plus the sync stamps, so curated fields such as colour
//! and material survive a re-import.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use catalog_scraper::ProductCandidate;

use crate::common::{CatalogItemId, SupplierId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub supplier_id: Option<SupplierId>,
    pub category_id: Option<Uuid>,
    pub range_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub hex_color: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub sku: Option<String>,
    pub finish_type: Option<String>,
    pub dimensions: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub is_active: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row written by the import pipeline. Conflict key: `(supplier_id, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItemUpsert {
    pub supplier_id: SupplierId,
    pub name: String,
    pub image_url: String,
    pub source_url: String,
}

impl CatalogItemUpsert {
    pub fn from_candidate(
        supplier_id: SupplierId,
        candidate: &ProductCandidate,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            supplier_id,
            name: candidate.name.clone(),
            image_url: candidate.image_url.clone(),
            source_url: source_url.into(),
        }
    }
}

/// Fields an admin supplies when adding an item by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItemInput {
    pub name: String,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub range_id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub hex_color: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub finish_type: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl CatalogItem {
    /// Insert or overwrite a scraped item, marking it active and synced now.
    pub async fn upsert_scraped(item: &CatalogItemUpsert, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, CatalogItem>(
            r#"
            INSERT INTO catalog_items (
                id, supplier_id, name, image_url, thumbnail_url, source_url,
                is_active, last_synced_at
            )
            VALUES ($1, $2, $3, $4, $4, $5, TRUE, NOW())
            ON CONFLICT (supplier_id, name) DO UPDATE
            SET image_url = EXCLUDED.image_url,
                thumbnail_url = EXCLUDED.thumbnail_url,
                source_url = EXCLUDED.source_url,
                is_active = TRUE,
                last_synced_at = NOW(),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(CatalogItemId::new())
        .bind(item.supplier_id)
        .bind(&item.name)
        .bind(&item.image_url)
        .bind(&item.source_url)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to upsert catalog item '{}'", item.name))?;

        Ok(row)
    }

    /// Create an item from manual admin entry.
    pub async fn create(input: &CatalogItemInput, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, CatalogItem>(
            r#"
            INSERT INTO catalog_items (
                id, supplier_id, category_id, range_id, name, description, material,
                color, hex_color, brand, price, sku, finish_type, dimensions,
                thumbnail_url, image_url, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    COALESCE($17, '{}'::jsonb))
            RETURNING *
            "#,
        )
        .bind(CatalogItemId::new())
        .bind(input.supplier_id)
        .bind(input.category_id)
        .bind(input.range_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.material)
        .bind(&input.color)
        .bind(&input.hex_color)
        .bind(&input.brand)
        .bind(input.price)
        .bind(&input.sku)
        .bind(&input.finish_type)
        .bind(&input.dimensions)
        .bind(&input.thumbnail_url)
        .bind(&input.image_url)
        .bind(&input.metadata)
        .fetch_one(pool)
        .await
        .context("Failed to create catalog item")?;

        Ok(row)
    }

    pub async fn find_by_id(id: CatalogItemId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, CatalogItem>("SELECT * FROM catalog_items WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Items for a supplier, newest sync first.
    pub async fn find_by_supplier(
        supplier_id: SupplierId,
        active_only: bool,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT * FROM catalog_items
            WHERE supplier_id = $1
              AND ($2 = FALSE OR is_active = TRUE)
            ORDER BY last_synced_at DESC NULLS LAST, name ASC
            "#,
        )
        .bind(supplier_id)
        .bind(active_only)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_supplier(supplier_id: SupplierId, pool: &PgPool) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM catalog_items WHERE supplier_id = $1")
                .bind(supplier_id)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    pub async fn delete(id: CatalogItemId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete catalog item")?;
        Ok(result.rows_affected() > 0)
    }
}
