//! Import RPC and job lookups.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::common::{ScrapeJobId, SupplierId};
use crate::domains::imports::{
    spawn_import, ImportError, ImportRequest, ImportSummary, JobTracker, ScrapeJob,
};
use crate::server::app::AppState;
use crate::server::routes::errors::{api_error, internal_error, not_found, ApiError};

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

/// POST /api/imports
///
/// Runs the pipeline on its own task and answers with its summary. The job
/// still finishes if the client goes away first.
pub async fn start_import_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let tracker = JobTracker::from_deps(&state.deps);

    let summary = spawn_import(request, state.deps.crawler.clone(), tracker)
        .await
        .map_err(|e| internal_error(anyhow::Error::new(e).context("Import task aborted")))?
        .map_err(import_error_response)?;

    Ok(Json(ImportResponse {
        success: true,
        summary,
    }))
}

/// GET /api/imports/:job_id
pub async fn get_import_job_handler(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<ScrapeJobId>,
) -> Result<Json<ScrapeJob>, ApiError> {
    ScrapeJob::find_by_id(job_id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Scrape job"))
}

/// GET /api/suppliers/:id/scrape-jobs/latest
pub async fn latest_import_job_handler(
    Extension(state): Extension<AppState>,
    Path(supplier_id): Path<SupplierId>,
) -> Result<Json<ScrapeJob>, ApiError> {
    ScrapeJob::find_latest_for_supplier(supplier_id, &state.deps.db_pool)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Scrape job"))
}

pub fn import_error_status(err: &ImportError) -> StatusCode {
    match err {
        ImportError::Configuration(_) | ImportError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ImportError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ImportError::SupplierNotFound(_) => StatusCode::NOT_FOUND,
        ImportError::Crawl(_) => StatusCode::BAD_GATEWAY,
    }
}

fn import_error_response(err: ImportError) -> ApiError {
    api_error(import_error_status(&err), err.to_string(), err.details())
}
