//! Catalog browsing and manual item entry.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};

use crate::common::{CatalogItemId, SupplierId};
use crate::domains::catalog::{CatalogItem, CatalogItemInput};
use crate::server::app::AppState;
use crate::server::routes::errors::{
    bad_request, conflict, internal_error, is_unique_violation, not_found, ApiError,
};
use crate::server::routes::suppliers::ListFilter;

/// GET /api/suppliers/:id/items
pub async fn list_supplier_items_handler(
    Extension(state): Extension<AppState>,
    Path(supplier_id): Path<SupplierId>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    CatalogItem::find_by_supplier(supplier_id, filter.active_only, &state.deps.db_pool)
        .await
        .map(Json)
        .map_err(internal_error)
}

/// POST /api/catalog-items
pub async fn create_item_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<CatalogItemInput>,
) -> Result<(StatusCode, Json<CatalogItem>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(bad_request("Item name is required"));
    }

    let item = CatalogItem::create(&input, &state.deps.db_pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                conflict(format!("Item '{}' already exists for this supplier", input.name))
            } else {
                internal_error(e)
            }
        })?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<CatalogItemId>,
) -> Result<Json<CatalogItem>, ApiError> {
    CatalogItem::find_by_id(id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Catalog item"))
}

pub async fn delete_item_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<CatalogItemId>,
) -> Result<StatusCode, ApiError> {
    if CatalogItem::delete(id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Catalog item"))
    }
}
