//! Directory listing model.

use std::cmp::Ordering;
use std::fs::Metadata;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FileServerError;
use crate::mime::MimeLookup;
use crate::resolve::{ResolvedPath, VirtualPath};

/// Name of the synthetic entry that navigates one level up.
pub const PARENT_ENTRY: &str = "..";

/// One row of a directory listing
#[derive(Debug, Clone, Serialize)]
pub struct EntryRecord {
    pub name: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    /// Virtual path to request when following this entry
    pub path: String,
}

impl EntryRecord {
    fn parent(of: &VirtualPath) -> Self {
        Self {
            name: PARENT_ENTRY.to_string(),
            is_dir: true,
            size: None,
            size_display: None,
            modified: None,
            mime: None,
            path: of.parent().to_string(),
        }
    }

    fn from_metadata(
        dir: &VirtualPath,
        name: String,
        metadata: &Metadata,
        mime: Option<String>,
    ) -> Self {
        let is_dir = metadata.is_dir();
        let mut path = dir.child(&name).to_string();
        if is_dir {
            path.push('/');
        }
        let size = (!is_dir).then(|| metadata.len());

        Self {
            size_display: size.map(format_size),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            mime: if is_dir { None } else { mime },
            is_dir,
            size,
            name,
            path,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.name == PARENT_ENTRY
    }
}

/// Listing of a single directory
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub path: String,
    pub entries: Vec<EntryRecord>,
}

/// Enumerate a directory.
///
/// Non-root listings start with a `..` entry pointing at the parent virtual
/// path. The remaining entries are sorted by name. Entries whose metadata
/// cannot be read are logged and skipped. This uses blocking filesystem calls;
/// async callers run it on the blocking pool.
pub fn list_directory(
    resolved: &ResolvedPath,
    mime: &dyn MimeLookup,
) -> Result<Listing, FileServerError> {
    let virtual_path = resolved.virtual_path();
    let read_dir = std::fs::read_dir(resolved.path())
        .map_err(|e| FileServerError::ReadError(format!("{virtual_path}: {e}")))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", virtual_path, e);
                continue;
            }
        };

        let entry_path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Follows symlinks so linked directories list as directories.
        let metadata = match std::fs::metadata(&entry_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Skipping {:?} in {}: {}", name, virtual_path, e);
                continue;
            }
        };

        let mime = (!metadata.is_dir()).then(|| mime.content_type(&entry_path));
        entries.push(EntryRecord::from_metadata(
            virtual_path,
            name,
            &metadata,
            mime,
        ));
    }

    entries.sort_by(compare_names);

    if !virtual_path.is_root() {
        entries.insert(0, EntryRecord::parent(virtual_path));
    }

    debug!("Listed {} entries in {}", entries.len(), virtual_path);

    Ok(Listing {
        path: virtual_path.to_string(),
        entries,
    })
}

fn compare_names(a: &EntryRecord, b: &EntryRecord) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Human-readable size using binary units, e.g. `1536` -> `"1.5 KiB"`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
