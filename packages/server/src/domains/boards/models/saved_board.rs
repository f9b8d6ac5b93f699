//! Saved mood boards.
//!
//! A board is a name plus a list of absolutely positioned catalog items.
//! Updates overwrite the whole board; there is no history.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::{CatalogItemId, SavedBoardId};

/// One item on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardItemPlacement {
    pub catalog_item_id: CatalogItemId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, 0-359
    #[serde(default)]
    pub rotation: i32,
    /// Stacking order; higher draws on top
    #[serde(default)]
    pub z_index: i32,
}

impl BoardItemPlacement {
    /// Wrap `rotation` into 0-359.
    pub fn normalized(mut self) -> Self {
        self.rotation = self.rotation.rem_euclid(360);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedBoard {
    pub id: SavedBoardId,
    pub name: String,
    pub description: Option<String>,
    pub items: Json<Vec<BoardItemPlacement>>,
    pub preview_image_url: Option<String>,
    pub background: Option<String>,
    pub style: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full board contents, used for both create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedBoardInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<BoardItemPlacement>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl SavedBoardInput {
    fn normalized_items(&self) -> Json<Vec<BoardItemPlacement>> {
        Json(
            self.items
                .iter()
                .cloned()
                .map(BoardItemPlacement::normalized)
                .collect(),
        )
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl SavedBoard {
    pub async fn create(input: &SavedBoardInput, pool: &PgPool) -> Result<Self> {
        let board = sqlx::query_as::<_, SavedBoard>(
            r#"
            INSERT INTO saved_boards (id, name, description, items, preview_image_url, background, style, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(SavedBoardId::new())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.normalized_items())
        .bind(&input.preview_image_url)
        .bind(&input.background)
        .bind(&input.style)
        .bind(input.is_public)
        .fetch_one(pool)
        .await
        .context("Failed to create saved board")?;

        tracing::info!(board_id = %board.id, items = board.items.len(), "Saved board");
        Ok(board)
    }

    pub async fn find_by_id(id: SavedBoardId, pool: &PgPool) -> Result<Option<Self>> {
        let board = sqlx::query_as::<_, SavedBoard>("SELECT * FROM saved_boards WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(board)
    }

    /// All boards, or only public ones, newest first.
    pub async fn list(public_only: bool, pool: &PgPool) -> Result<Vec<Self>> {
        let boards = sqlx::query_as::<_, SavedBoard>(
            r#"
            SELECT * FROM saved_boards
            WHERE ($1 = FALSE OR is_public = TRUE)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(public_only)
        .fetch_all(pool)
        .await?;
        Ok(boards)
    }

    /// Overwrite every editable field. `None` when the board does not exist.
    pub async fn update(
        id: SavedBoardId,
        input: &SavedBoardInput,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let board = sqlx::query_as::<_, SavedBoard>(
            r#"
            UPDATE saved_boards
            SET name = $2,
                description = $3,
                items = $4,
                preview_image_url = $5,
                background = $6,
                style = $7,
                is_public = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.normalized_items())
        .bind(&input.preview_image_url)
        .bind(&input.background)
        .bind(&input.style)
        .bind(input.is_public)
        .fetch_optional(pool)
        .await
        .context("Failed to update saved board")?;
        Ok(board)
    }

    pub async fn delete(id: SavedBoardId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete saved board")?;
        Ok(result.rows_affected() > 0)
    }
}
