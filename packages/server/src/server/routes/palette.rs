//! Palette routes. The session token travels in the `X-Session-Token` header
//! and is handed to every model call.

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::common::{CatalogItemId, SessionToken};
use crate::domains::catalog::CatalogItem;
use crate::domains::palette::LikedItem;
use crate::server::app::AppState;
use crate::server::routes::errors::{bad_request, internal_error, not_found, ApiError};

pub const SESSION_HEADER: &str = "x-session-token";

pub async fn list_palette_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    let session = session_from_headers(&headers)?;
    LikedItem::list_items(&session, &state.deps.db_pool)
        .await
        .map(Json)
        .map_err(internal_error)
}

/// PUT /api/palette/:item_id
pub async fn like_item_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<CatalogItemId>,
) -> Result<Json<LikedItem>, ApiError> {
    let session = session_from_headers(&headers)?;
    let pool = &state.deps.db_pool;

    if CatalogItem::find_by_id(item_id, pool)
        .await
        .map_err(internal_error)?
        .is_none()
    {
        return Err(not_found("Catalog item"));
    }

    LikedItem::like(&session, item_id, pool)
        .await
        .map(Json)
        .map_err(internal_error)
}

/// DELETE /api/palette/:item_id
pub async fn unlike_item_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<CatalogItemId>,
) -> Result<StatusCode, ApiError> {
    let session = session_from_headers(&headers)?;
    if LikedItem::unlike(&session, item_id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Liked item"))
    }
}

fn session_from_headers(headers: &HeaderMap) -> Result<SessionToken, ApiError> {
    let raw = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| bad_request("X-Session-Token header is required"))?;
    SessionToken::parse(raw).map_err(|e| bad_request(e.to_string()))
}
