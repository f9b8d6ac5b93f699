//! Saved board CRUD.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::SavedBoardId;
use crate::domains::boards::{SavedBoard, SavedBoardInput};
use crate::server::app::AppState;
use crate::server::routes::errors::{bad_request, internal_error, not_found, ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct BoardFilter {
    #[serde(default)]
    pub public_only: bool,
}

pub async fn list_boards_handler(
    Extension(state): Extension<AppState>,
    Query(filter): Query<BoardFilter>,
) -> Result<Json<Vec<SavedBoard>>, ApiError> {
    SavedBoard::list(filter.public_only, &state.deps.db_pool)
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn create_board_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<SavedBoardInput>,
) -> Result<(StatusCode, Json<SavedBoard>), ApiError> {
    validate(&input)?;
    let board = SavedBoard::create(&input, &state.deps.db_pool)
        .await
        .map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<SavedBoardId>,
) -> Result<Json<SavedBoard>, ApiError> {
    SavedBoard::find_by_id(id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Board"))
}

/// PUT replaces the whole board.
pub async fn update_board_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<SavedBoardId>,
    Json(input): Json<SavedBoardInput>,
) -> Result<Json<SavedBoard>, ApiError> {
    validate(&input)?;
    SavedBoard::update(id, &input, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Board"))
}

pub async fn delete_board_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<SavedBoardId>,
) -> Result<StatusCode, ApiError> {
    if SavedBoard::delete(id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Board"))
    }
}

fn validate(input: &SavedBoardInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(bad_request("Board name is required"));
    }
    Ok(())
}
