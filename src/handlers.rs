use axum::{
    Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::AppState;
use crate::download::file_response;
use crate::error::FileServerError;
use crate::listing::{Listing, list_directory};
use crate::render;
use crate::resolve::{resolve, verify_confined};

/// Query parameters for the listing/download endpoints
#[derive(Debug, Deserialize)]
pub struct FilesQuery {
    /// Virtual path relative to root (defaults to "/")
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_path() -> String {
    "/".to_string()
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub root: String,
}

/// What a virtual path turned out to be.
pub enum Outcome {
    Listing(Listing),
    Download(Response),
}

/// Resolve `raw`, stat the target and produce either a listing or a download.
pub async fn respond(state: &AppState, raw: &str) -> Result<Outcome, FileServerError> {
    let resolved = resolve(&state.root, raw)?;
    verify_confined(&state.root, &resolved).await?;

    let metadata = fs::metadata(resolved.path())
        .await
        .map_err(|e| FileServerError::NotFound(format!("{}: {}", resolved.virtual_path(), e)))?;

    if metadata.is_dir() {
        debug!("Listing directory: {}", resolved.virtual_path());

        let mime = state.mime.clone();
        let listing =
            tokio::task::spawn_blocking(move || list_directory(&resolved, mime.as_ref()))
                .await
                .map_err(|err| FileServerError::Io(std::io::Error::other(err)))??;
        Ok(Outcome::Listing(listing))
    } else if metadata.is_file() {
        let response = file_response(
            &resolved,
            &metadata,
            state.mime.as_ref(),
            state.config.cache_max_age,
        )
        .await?;
        Ok(Outcome::Download(response))
    } else {
        Err(FileServerError::InvalidPath(format!(
            "{}: not a regular file or directory",
            resolved.virtual_path()
        )))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - Landing page
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::index_page(&state.config.title))
}

/// GET /health - Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        root: state.root.path().display().to_string(),
    })
}

/// GET /files - HTML listing or file download
pub async fn browse_html(
    State(state): State<AppState>,
    Query(query): Query<FilesQuery>,
) -> Response {
    let title = &state.config.title;
    match respond(&state, &query.path).await {
        Ok(Outcome::Listing(listing)) => {
            Html(render::listing_page(title, &listing)).into_response()
        }
        Ok(Outcome::Download(response)) => response,
        Err(err) => {
            debug!("Request for {:?} failed: {}", query.path, err);
            let page = render::error_page(title, &query.path, &err.to_string());
            (err.status(), Html(page)).into_response()
        }
    }
}

/// GET /api/files - JSON listing or file download
pub async fn browse_json(
    State(state): State<AppState>,
    Query(query): Query<FilesQuery>,
) -> Result<Response, FileServerError> {
    match respond(&state, &query.path).await? {
        Outcome::Listing(listing) => Ok(Json(listing).into_response()),
        Outcome::Download(response) => Ok(response),
    }
}
