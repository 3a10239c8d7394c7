//! Minimal HTTP file browser.
//!
//! Lists directories and streams file downloads from a single root directory.
//! Every client-supplied path is confined to that root before the filesystem is
//! touched. The library exposes the router so it can be embedded or driven
//! directly in tests; the binary only adds CLI parsing and the listener.

pub mod config;
pub mod download;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod mime;
pub mod render;
pub mod resolve;
pub mod routes;

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

pub use config::Config;
pub use error::FileServerError;
pub use mime::{MimeLookup, MimeTable};
pub use resolve::RootDir;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Root directory to serve files from
    pub root: RootDir,
    /// Configuration
    pub config: Arc<Config>,
    /// Content-type lookup for downloads and listings
    pub mime: Arc<dyn MimeLookup>,
}

impl AppState {
    /// Create a new AppState with the given root directory and default config.
    pub fn new(root_dir: PathBuf) -> Self {
        Self::with_config(root_dir, Config::default())
    }

    /// Create a new AppState with the given root directory and config.
    ///
    /// The MIME lookup is built from `config.mime_overrides`.
    pub fn with_config(root_dir: PathBuf, config: Config) -> Self {
        let mime = MimeTable::with_overrides(&config.mime_overrides);
        Self {
            root: RootDir::new(root_dir),
            config: Arc::new(config),
            mime: Arc::new(mime),
        }
    }

    /// Replace the content-type lookup.
    pub fn with_mime(mut self, mime: Arc<dyn MimeLookup>) -> Self {
        self.mime = mime;
        self
    }
}

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    with_layers(routes::file_routes(), state)
}

/// Apply panic recovery, CORS and request tracing to `router`.
///
/// A panic in any handler becomes a 500 response and the server keeps
/// serving. Tests use this to mount extra routes under the same layers.
pub fn with_layers(router: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!("Request handler panicked: {}", detail);

    let body = error::ErrorResponse {
        error: "Internal server error".to_string(),
        code: "INTERNAL_ERROR",
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
