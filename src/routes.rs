use axum::{Router, routing::get};

use crate::AppState;
use crate::handlers;

/// Create file browser routes
pub fn file_routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(handlers::index))
        // Health check
        .route("/health", get(handlers::health))
        // Listing or download
        .route("/files", get(handlers::browse_html))
        .route("/api/files", get(handlers::browse_json))
}
