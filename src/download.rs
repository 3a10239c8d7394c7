//! File download responses.

use std::fs::Metadata;

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::info;

use crate::error::FileServerError;
use crate::mime::MimeLookup;
use crate::resolve::ResolvedPath;

/// Build a `Content-Disposition` value that survives non-ASCII names.
///
/// The plain `filename` carries an ASCII approximation (anything outside
/// printable ASCII, plus `"` and `\`, becomes `_`); `filename*` carries the
/// exact name percent-encoded as UTF-8.
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(file_name)
    )
}

/// Stream a regular file as an attachment.
///
/// The body is read in bounded chunks, so memory use does not grow with the
/// file size.
pub async fn file_response(
    resolved: &ResolvedPath,
    metadata: &Metadata,
    mime: &dyn MimeLookup,
    cache_max_age: u64,
) -> Result<Response, FileServerError> {
    let path = resolved.path();
    let file_size = metadata.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());

    info!(
        "Serving download: {} ({} bytes)",
        resolved.virtual_path(),
        file_size
    );

    let file = fs::File::open(path).await.map_err(FileServerError::Io)?;
    let body = Body::from_stream(ReaderStream::new(file));

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.content_type(path)),
            (header::CONTENT_LENGTH, file_size.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={cache_max_age}"),
            ),
        ],
        body,
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(
        "content-description",
        HeaderValue::from_static("File Transfer"),
    );
    headers.insert(
        "content-transfer-encoding",
        HeaderValue::from_static("binary"),
    );
    let last_modified = metadata
        .modified()
        .ok()
        .and_then(|t| HeaderValue::from_str(&httpdate::fmt_http_date(t)).ok());
    if let Some(value) = last_modified {
        headers.insert(header::LAST_MODIFIED, value);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("report.pdf"),
            "attachment; filename=\"report.pdf\"; filename*=UTF-8''report.pdf"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("文件.txt");
        assert_eq!(
            value,
            "attachment; filename=\"__.txt\"; filename*=UTF-8''%E6%96%87%E4%BB%B6.txt"
        );
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn test_content_disposition_escapes_quotes_and_spaces() {
        let value = content_disposition("my \"final\" draft.txt");
        assert!(value.starts_with("attachment; filename=\"my _final_ draft.txt\";"));
        assert!(value.ends_with("filename*=UTF-8''my%20%22final%22%20draft.txt"));
    }
}
