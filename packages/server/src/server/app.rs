//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the axum router over the given dependencies.
///
/// `allowed_origins` empty means any origin.
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let state = AppState {
        deps: Arc::new(deps),
    };

    let api = Router::new()
        // Imports
        .route("/api/imports", post(start_import_handler))
        .route("/api/imports/:job_id", get(get_import_job_handler))
        .route("/api/streams/:topic", get(stream_handler))
        // Suppliers
        .route(
            "/api/suppliers",
            get(list_suppliers_handler).post(create_supplier_handler),
        )
        .route(
            "/api/suppliers/:id",
            get(get_supplier_handler)
                .put(update_supplier_handler)
                .delete(delete_supplier_handler),
        )
        .route(
            "/api/suppliers/:id/scrape-jobs/latest",
            get(latest_import_job_handler),
        )
        .route("/api/suppliers/:id/items", get(list_supplier_items_handler))
        // Catalog
        .route("/api/catalog-items", post(create_item_handler))
        .route(
            "/api/catalog-items/:id",
            get(get_item_handler).delete(delete_item_handler),
        )
        // Palette
        .route("/api/palette", get(list_palette_handler))
        .route(
            "/api/palette/:item_id",
            put(like_item_handler).delete(unlike_item_handler),
        )
        // Boards
        .route(
            "/api/boards",
            get(list_boards_handler).post(create_board_handler),
        )
        .route(
            "/api/boards/:id",
            get(get_board_handler)
                .put(update_board_handler)
                .delete(delete_board_handler),
        );

    api.route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)])
}
