use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::api;

/// All application routes.
pub fn configure_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/api/enrich-csv",
            post(api::handlers::enrich_csv::process_csv),
        )
        .route("/api/files", get(api::handlers::enrich_csv::list_files))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
