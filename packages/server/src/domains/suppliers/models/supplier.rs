use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::SupplierId;

/// What a supplier provides. Fixed set; the admin UI filters on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "supplier_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SupplierCategory {
    BenchTop,
    DoorPanel,
    KickFinish,
    Hardware,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: SupplierId,
    pub slug: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    /// Opaque per-supplier scrape settings; never interpreted server-side
    pub scrape_config: Option<serde_json::Value>,
    pub is_active: bool,
    pub category: Option<SupplierCategory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable supplier fields, used for both create and full update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierInput {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub scrape_config: Option<serde_json::Value>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub category: Option<SupplierCategory>,
}

fn default_active() -> bool {
    true
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Supplier {
    pub async fn create(input: &SupplierInput, pool: &PgPool) -> Result<Self> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (id, slug, name, logo_url, website_url, scrape_config, is_active, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(SupplierId::new())
        .bind(&input.slug)
        .bind(&input.name)
        .bind(&input.logo_url)
        .bind(&input.website_url)
        .bind(&input.scrape_config)
        .bind(input.is_active)
        .bind(input.category)
        .fetch_one(pool)
        .await
        .context("Failed to create supplier")?;

        tracing::info!(supplier_id = %supplier.id, slug = %supplier.slug, "Created supplier");
        Ok(supplier)
    }

    pub async fn find_by_id(id: SupplierId, pool: &PgPool) -> Result<Option<Self>> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(supplier)
    }

    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(supplier)
    }

    /// List suppliers by name, optionally only the active ones.
    pub async fn list(active_only: bool, pool: &PgPool) -> Result<Vec<Self>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT * FROM suppliers
            WHERE ($1 = FALSE OR is_active = TRUE)
            ORDER BY name ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(pool)
        .await?;
        Ok(suppliers)
    }

    /// Overwrite all editable fields. Returns `None` when the id is unknown.
    pub async fn update(
        id: SupplierId,
        input: &SupplierInput,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET slug = $2,
                name = $3,
                logo_url = $4,
                website_url = $5,
                scrape_config = $6,
                is_active = $7,
                category = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.slug)
        .bind(&input.name)
        .bind(&input.logo_url)
        .bind(&input.website_url)
        .bind(&input.scrape_config)
        .bind(input.is_active)
        .bind(input.category)
        .fetch_optional(pool)
        .await
        .context("Failed to update supplier")?;
        Ok(supplier)
    }

    /// Delete a supplier. Its catalog items go with it (ON DELETE CASCADE).
    pub async fn delete(id: SupplierId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete supplier")?;

        if result.rows_affected() > 0 {
            tracing::info!(supplier_id = %id, "Deleted supplier and its catalog items");
        }
        Ok(result.rows_affected() > 0)
    }
}
