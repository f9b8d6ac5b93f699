//! Supplier admin CRUD.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::SupplierId;
use crate::domains::suppliers::{Supplier, SupplierInput};
use crate::server::app::AppState;
use crate::server::routes::errors::{
    bad_request, conflict, internal_error, is_unique_violation, not_found, ApiError,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    #[serde(default)]
    pub active_only: bool,
}

pub async fn list_suppliers_handler(
    Extension(state): Extension<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    Supplier::list(filter.active_only, &state.deps.db_pool)
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn create_supplier_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<SupplierInput>,
) -> Result<(StatusCode, Json<Supplier>), ApiError> {
    validate(&input)?;
    let pool = &state.deps.db_pool;

    if Supplier::find_by_slug(&input.slug, pool)
        .await
        .map_err(internal_error)?
        .is_some()
    {
        return Err(slug_taken(&input.slug));
    }

    let supplier = Supplier::create(&input, pool)
        .await
        .map_err(|e| write_error(e, &input.slug))?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn get_supplier_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<SupplierId>,
) -> Result<Json<Supplier>, ApiError> {
    Supplier::find_by_id(id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Supplier"))
}

pub async fn update_supplier_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<SupplierId>,
    Json(input): Json<SupplierInput>,
) -> Result<Json<Supplier>, ApiError> {
    validate(&input)?;
    let pool = &state.deps.db_pool;

    if let Some(existing) = Supplier::find_by_slug(&input.slug, pool)
        .await
        .map_err(internal_error)?
    {
        if existing.id != id {
            return Err(slug_taken(&input.slug));
        }
    }

    Supplier::update(id, &input, pool)
        .await
        .map_err(|e| write_error(e, &input.slug))?
        .map(Json)
        .ok_or_else(|| not_found("Supplier"))
}

pub async fn delete_supplier_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<SupplierId>,
) -> Result<StatusCode, ApiError> {
    if Supplier::delete(id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Supplier"))
    }
}

fn validate(input: &SupplierInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(bad_request("Supplier name is required"));
    }
    if input.slug.trim().is_empty() {
        return Err(bad_request("Supplier slug is required"));
    }
    Ok(())
}

fn slug_taken(slug: &str) -> ApiError {
    conflict(format!("Supplier slug '{slug}' is already in use"))
}

/// A concurrent insert can still win the slug between check and write.
fn write_error(err: anyhow::Error, slug: &str) -> ApiError {
    if is_unique_violation(&err) {
        slug_taken(slug)
    } else {
        internal_error(err)
    }
}
