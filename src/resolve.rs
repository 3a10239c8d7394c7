//! Confinement of client-supplied paths to the served root directory.
//!
//! Every request path goes through [`resolve`] before the filesystem is
//! touched. The check works on normalized path components rather than on the
//! raw string, so redundant separators, `.` segments and already-decoded
//! `%2e%2e` sequences are all handled the same way.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::{error, warn};

use crate::error::FileServerError;

/// Base directory all served content lives under.
#[derive(Debug, Clone)]
pub struct RootDir(PathBuf);

impl RootDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Normalized client path, always starting with `/`.
///
/// The root is `/`; every other value has no trailing separator and no
/// `.`/`..` segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPath(String);

impl VirtualPath {
    pub fn root() -> Self {
        Self("/".to_string())
    }

    fn from_segments(segments: &[String]) -> Self {
        if segments.is_empty() {
            return Self::root();
        }
        Self(format!("/{}", segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Parent path with the last segment stripped. The root is its own parent.
    pub fn parent(&self) -> VirtualPath {
        match self.0.rfind('/') {
            Some(0) | None => Self::root(),
            Some(idx) => Self(self.0[..idx].to_string()),
        }
    }

    /// Path of a direct child named `name`.
    pub fn child(&self, name: &str) -> VirtualPath {
        if self.is_root() {
            Self(format!("/{name}"))
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    /// Last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next()
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A path that passed the confinement check.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    path: PathBuf,
    virtual_path: VirtualPath,
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn virtual_path(&self) -> &VirtualPath {
        &self.virtual_path
    }
}

/// Resolve an untrusted virtual path against `root`.
///
/// A missing leading separator is implied and an empty path means the root.
/// Any `..` that would climb above the root fails with
/// [`FileServerError::AccessDenied`], even when later segments would descend
/// back into it. NUL bytes and platform path prefixes are rejected as
/// [`FileServerError::InvalidPath`].
///
/// No filesystem access happens here; see [`verify_confined`] for the
/// symlink check on existing targets.
pub fn resolve(root: &RootDir, raw: &str) -> Result<ResolvedPath, FileServerError> {
    if raw.contains('\0') {
        warn!("Path contains null byte");
        return Err(FileServerError::InvalidPath(
            "path contains invalid characters".to_string(),
        ));
    }

    let raw = if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    };

    let mut segments: Vec<String> = Vec::new();
    for component in Path::new(&raw).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if segments.pop().is_none() {
                    warn!("Path traversal attempt: {:?} escapes root", raw);
                    return Err(FileServerError::AccessDenied);
                }
            }
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::Prefix(_) => {
                warn!("Path prefix in virtual path: {:?}", raw);
                return Err(FileServerError::InvalidPath(
                    "path must be relative to the served root".to_string(),
                ));
            }
        }
    }

    let mut path = root.path().to_path_buf();
    path.extend(&segments);

    // The joined path must still sit at or below root.
    let escapes = match path.strip_prefix(root.path()) {
        Ok(relative) => matches!(relative.components().next(), Some(Component::ParentDir)),
        Err(_) => true,
    };
    if escapes {
        error!("Path resolution left root: {:?}", path);
        return Err(FileServerError::AccessDenied);
    }

    Ok(ResolvedPath {
        path,
        virtual_path: VirtualPath::from_segments(&segments),
    })
}

/// Ensure an existing target does not leave the root through a symlink.
///
/// Targets that do not exist pass, so the caller's stat reports them as
/// missing.
pub async fn verify_confined(
    root: &RootDir,
    resolved: &ResolvedPath,
) -> Result<(), FileServerError> {
    let Ok(canonical_path) = tokio::fs::canonicalize(resolved.path()).await else {
        return Ok(());
    };
    let canonical_root = tokio::fs::canonicalize(root.path()).await?;

    if !canonical_path.starts_with(&canonical_root) {
        warn!(
            "Symlink escape attempt: {} resolved outside root",
            resolved.virtual_path()
        );
        return Err(FileServerError::AccessDenied);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root() -> RootDir {
        RootDir::new("/srv/share")
    }

    #[test]
    fn test_resolve_root() {
        let resolved = resolve(&root(), "/").unwrap();
        assert_eq!(resolved.path(), Path::new("/srv/share"));
        assert!(resolved.virtual_path().is_root());
    }

    #[test]
    fn test_resolve_empty_is_root() {
        let resolved = resolve(&root(), "").unwrap();
        assert_eq!(resolved.path(), Path::new("/srv/share"));
        assert_eq!(resolved.virtual_path().as_str(), "/");
    }

    #[test]
    fn test_resolve_collapses_traversal_inside_root() {
        let resolved = resolve(&root(), "a/b/../c").unwrap();
        assert_eq!(resolved.path(), Path::new("/srv/share/a/c"));
        assert_eq!(resolved.virtual_path().as_str(), "/a/c");
    }

    #[test]
    fn test_resolve_rejects_escape() {
        for raw in [
            "/../../etc/passwd",
            "..",
            "../",
            "/a/../..",
            "a/b/../../../x",
            "/./../share/secret",
            "//..//..//etc",
        ] {
            assert!(
                matches!(resolve(&root(), raw), Err(FileServerError::AccessDenied)),
                "expected {raw:?} to be denied"
            );
        }
    }

    #[test]
    fn test_resolve_redundant_separators() {
        let resolved = resolve(&root(), "//docs///./notes//").unwrap();
        assert_eq!(resolved.path(), Path::new("/srv/share/docs/notes"));
        assert_eq!(resolved.virtual_path().as_str(), "/docs/notes");
    }

    #[test]
    fn test_resolve_keeps_encoded_text_literal() {
        // Query strings are decoded once; a second layer stays part of the name.
        let resolved = resolve(&root(), "/%2e%2e/secret").unwrap();
        assert_eq!(resolved.path(), Path::new("/srv/share/%2e%2e/secret"));
    }

    #[test]
    fn test_resolve_rejects_null_byte() {
        assert!(matches!(
            resolve(&root(), "file\0.txt"),
            Err(FileServerError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_resolve_relative_root() {
        let resolved = resolve(&RootDir::new("./ftp_folder"), "docs/a.txt").unwrap();
        assert_eq!(resolved.path(), Path::new("./ftp_folder/docs/a.txt"));
    }

    #[test]
    fn test_virtual_path_parent() {
        let resolved = resolve(&root(), "/a/b/c").unwrap();
        let vp = resolved.virtual_path();
        assert_eq!(vp.parent().as_str(), "/a/b");
        assert_eq!(vp.parent().parent().as_str(), "/a");
        assert_eq!(vp.parent().parent().parent().as_str(), "/");
        assert_eq!(VirtualPath::root().parent().as_str(), "/");
    }

    #[test]
    fn test_virtual_path_child_and_name() {
        assert_eq!(VirtualPath::root().child("a.txt").as_str(), "/a.txt");
        let docs = VirtualPath::root().child("docs");
        assert_eq!(docs.child("b").as_str(), "/docs/b");
        assert_eq!(docs.file_name(), Some("docs"));
        assert_eq!(VirtualPath::root().file_name(), None);
    }

    #[tokio::test]
    async fn test_verify_confined_allows_regular_paths() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        let root = RootDir::new(temp_dir.path());

        let existing = resolve(&root, "/a.txt").unwrap();
        assert!(verify_confined(&root, &existing).await.is_ok());

        let missing = resolve(&root, "/missing.txt").unwrap();
        assert!(verify_confined(&root, &missing).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_verify_confined_detects_symlink_escape() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        std::fs::write(outside_dir.path().join("secret.txt"), "secret").unwrap();
        symlink(outside_dir.path(), temp_dir.path().join("escape")).unwrap();

        let root = RootDir::new(temp_dir.path());
        let resolved = resolve(&root, "/escape/secret.txt").unwrap();
        assert!(matches!(
            verify_confined(&root, &resolved).await,
            Err(FileServerError::AccessDenied)
        ));
    }
}
