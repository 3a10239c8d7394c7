use std::collections::HashMap;
use std::path::Path;

/// Fallback for files whose type cannot be guessed.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a file path to a best-guess content type.
pub trait MimeLookup: Send + Sync {
    fn content_type(&self, path: &Path) -> String;
}

/// Extension overrides backed by `mime_guess`.
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
    overrides: HashMap<String, String>,
}

impl MimeTable {
    /// Build a table from `extension -> content type` pairs.
    ///
    /// Extensions are matched case-insensitively; a leading dot is optional.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let overrides = overrides
            .into_iter()
            .map(|(ext, mime)| (normalize_extension(ext.as_ref()), mime.into()))
            .collect();
        Self { overrides }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

impl MimeLookup for MimeTable {
    fn content_type(&self, path: &Path) -> String {
        if let Some(ext) = path.extension() {
            let ext = normalize_extension(&ext.to_string_lossy());
            if let Some(mime) = self.overrides.get(&ext) {
                return mime.clone();
            }
        }

        mime_guess::from_path(path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| OCTET_STREAM.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guesses_known_extensions() {
        let table = MimeTable::default();
        assert_eq!(table.content_type(Path::new("a.txt")), "text/plain");
        assert_eq!(table.content_type(Path::new("dir/photo.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        let table = MimeTable::default();
        assert_eq!(table.content_type(Path::new("blob.zzqx")), OCTET_STREAM);
        assert_eq!(table.content_type(Path::new("Makefile")), OCTET_STREAM);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let table = MimeTable::with_overrides([(".LOG", "text/x-log"), ("txt", "text/x-custom")]);
        assert_eq!(table.content_type(Path::new("server.log")), "text/x-log");
        assert_eq!(table.content_type(Path::new("notes.TXT")), "text/x-custom");
        assert_eq!(table.content_type(Path::new("page.html")), "text/html");
    }
}
