//! Test utilities and common setup.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use dirserve::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

/// Temporary root with a small tree:
///
/// ```text
/// a.txt          "hello world"
/// docs/a.txt     "nested"
/// docs/b/
/// 报告 final.pdf  "%PDF"
/// ```
pub fn fixture_root() -> TempDir {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    std::fs::write(root.join("a.txt"), "hello world").unwrap();
    std::fs::create_dir_all(root.join("docs/b")).unwrap();
    std::fs::write(root.join("docs/a.txt"), "nested").unwrap();
    std::fs::write(root.join("报告 final.pdf"), "%PDF").unwrap();
    temp_dir
}

pub fn test_state(root: &TempDir) -> AppState {
    AppState::new(root.path().to_path_buf())
}

pub fn test_app(root: &TempDir) -> Router {
    dirserve::app(test_state(root))
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method(Method::GET)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
