//! Liked items - the anonymous "palette" of catalog items a visitor saves.
//!
//! Every query takes the caller's [`SessionToken`] explicitly.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CatalogItemId, LikedItemId, SessionToken};
use crate::domains::catalog::models::CatalogItem;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LikedItem {
    pub id: LikedItemId,
    pub session_id: String,
    pub catalog_item_id: CatalogItemId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl LikedItem {
    /// Like an item. Liking twice keeps the original row.
    pub async fn like(
        session: &SessionToken,
        catalog_item_id: CatalogItemId,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO liked_items (id, session_id, catalog_item_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id, catalog_item_id) DO NOTHING
            "#,
        )
        .bind(LikedItemId::new())
        .bind(session.as_str())
        .bind(catalog_item_id)
        .execute(pool)
        .await
        .context("Failed to like catalog item")?;

        let liked = sqlx::query_as::<_, LikedItem>(
            "SELECT * FROM liked_items WHERE session_id = $1 AND catalog_item_id = $2",
        )
        .bind(session.as_str())
        .bind(catalog_item_id)
        .fetch_one(pool)
        .await?;

        Ok(liked)
    }

    /// Returns `false` when the item was not liked.
    pub async fn unlike(
        session: &SessionToken,
        catalog_item_id: CatalogItemId,
        pool: &PgPool,
    ) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM liked_items WHERE session_id = $1 AND catalog_item_id = $2")
                .bind(session.as_str())
                .bind(catalog_item_id)
                .execute(pool)
                .await
                .context("Failed to unlike catalog item")?;
        Ok(result.rows_affected() > 0)
    }

    /// The liked catalog items themselves, most recently liked first.
    pub async fn list_items(session: &SessionToken, pool: &PgPool) -> Result<Vec<CatalogItem>> {
        let rows = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT ci.* FROM catalog_items ci
            INNER JOIN liked_items li ON li.catalog_item_id = ci.id
            WHERE li.session_id = $1
            ORDER BY li.created_at DESC
            "#,
        )
        .bind(session.as_str())
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
