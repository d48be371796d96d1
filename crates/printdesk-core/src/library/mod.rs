//! File listing and byte loading for a designated root folder (normally the
//! user's downloads directory).
//!
//! Paths handed to and returned from this module are relative to the root
//! and `/`-separated on every platform.

mod query;

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::decode::DecodeError;

pub use query::{FileQuery, Selection, SortOrder, MAX_MULTI_SELECT, PAGE_SIZE};

/// Extensions treated as placeable images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Extensions treated as printable documents.
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Errors from listing, reading or deleting files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The relative path is absolute or climbs out of the root.
    #[error("Path escapes the library root: {0}")]
    OutsideRoot(String),

    /// No downloads directory is known for this platform.
    #[error("No downloads directory available")]
    NoDownloadsDir,

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl LoadError {
    fn from_io(path: &str, err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => LoadError::NotFound(path.to_string()),
            ErrorKind::PermissionDenied => LoadError::PermissionDenied(path.to_string()),
            _ => LoadError::Io {
                path: path.to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<LoadError> for DecodeError {
    fn from(err: LoadError) -> Self {
        DecodeError::IoError(err.to_string())
    }
}

/// Coarse classification of a listed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Document,
    Other,
}

impl FileKind {
    /// Classify by the (case-insensitive) extension of a file name.
    pub fn from_name(name: &str) -> Self {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return FileKind::Other;
        };
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Image
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Document
        } else {
            FileKind::Other
        }
    }
}

/// One regular file under the library root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Path relative to the root, `/`-separated.
    pub relative_path: String,
    pub kind: FileKind,
    /// Last modification time in Unix milliseconds, when the platform reports it.
    pub modified: Option<i64>,
    pub size_bytes: u64,
}

/// The platform downloads directory.
pub fn downloads_dir() -> Result<PathBuf, LoadError> {
    dirs::download_dir().ok_or(LoadError::NoDownloadsDir)
}

/// Recursively list regular files under `root`, newest first.
///
/// Entries without a modification time sort after dated ones; ties are
/// broken by relative path. Unreadable subdirectories are skipped.
pub fn list_files(root: &Path) -> Result<Vec<FileEntry>, LoadError> {
    let root_label = root.display().to_string();
    let meta = fs::metadata(root).map_err(|e| LoadError::from_io(&root_label, e))?;
    if !meta.is_dir() {
        return Err(LoadError::Io {
            path: root_label,
            message: "not a directory".to_string(),
        });
    }

    let mut entries = Vec::new();
    for item in WalkDir::new(root).min_depth(1).follow_links(false) {
        let item = match item {
            Ok(item) => item,
            Err(err) => {
                log::warn!("skipping unreadable entry under {}: {}", root_label, err);
                continue;
            }
        };
        if !item.file_type().is_file() {
            continue;
        }

        let Some(relative_path) = relative_slash_path(root, item.path()) else {
            continue;
        };
        let name = item.file_name().to_string_lossy().into_owned();
        let metadata = match item.metadata() {
            Ok(m) => m,
            Err(err) => {
                log::warn!("skipping {}: {}", relative_path, err);
                continue;
            }
        };
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64);

        entries.push(FileEntry {
            kind: FileKind::from_name(&name),
            name,
            relative_path,
            modified,
            size_bytes: metadata.len(),
        });
    }

    entries.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });
    log::debug!("listed {} files under {}", entries.len(), root_label);
    Ok(entries)
}

/// Read a file under `root`.
///
/// # Errors
///
/// `LoadError::OutsideRoot` for absolute paths or `..` components,
/// `LoadError::NotFound` / `LoadError::PermissionDenied` for the matching
/// I/O failures.
pub fn read_bytes(root: &Path, relative_path: &str) -> Result<Vec<u8>, LoadError> {
    let path = resolve(root, relative_path)?;
    fs::read(&path).map_err(|e| LoadError::from_io(relative_path, e))
}

/// Delete a file under `root`.
pub fn delete_file(root: &Path, relative_path: &str) -> Result<(), LoadError> {
    let path = resolve(root, relative_path)?;
    fs::remove_file(&path).map_err(|e| LoadError::from_io(relative_path, e))?;
    log::info!("deleted {}", relative_path);
    Ok(())
}

/// Join a relative path onto the root, refusing anything that could leave it.
fn resolve(root: &Path, relative_path: &str) -> Result<PathBuf, LoadError> {
    let relative = Path::new(relative_path);
    let safe = !relative_path.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(LoadError::OutsideRoot(relative_path.to_string()));
    }
    Ok(root.join(relative))
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_name() {
        assert_eq!(FileKind::from_name("photo.JPG"), FileKind::Image);
        assert_eq!(FileKind::from_name("scan.webp"), FileKind::Image);
        assert_eq!(FileKind::from_name("old.bmp"), FileKind::Image);
        assert_eq!(FileKind::from_name("invoice.pdf"), FileKind::Document);
        assert_eq!(FileKind::from_name("notes.txt"), FileKind::Other);
        assert_eq!(FileKind::from_name("README"), FileKind::Other);
        assert_eq!(FileKind::from_name("archive.tar.gz"), FileKind::Other);
    }

    #[test]
    fn test_list_files_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"png").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.pdf"), b"pdf!").unwrap();

        let mut entries = list_files(dir.path()).unwrap();
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].relative_path, "a.png");
        assert_eq!(entries[0].kind, FileKind::Image);
        assert_eq!(entries[0].size_bytes, 3);
        assert_eq!(entries[1].relative_path, "sub/b.pdf");
        assert_eq!(entries[1].name, "b.pdf");
        assert_eq!(entries[1].kind, FileKind::Document);
        assert!(entries[1].modified.is_some());
    }

    #[test]
    fn test_list_files_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_files(&dir.path().join("missing"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_read_bytes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.bin"), [1u8, 2, 3]).unwrap();

        assert_eq!(read_bytes(dir.path(), "x.bin").unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            read_bytes(dir.path(), "nope.bin"),
            Err(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_paths_outside_root_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_bytes(dir.path(), "../etc/passwd"),
            Err(LoadError::OutsideRoot(_))
        ));
        assert!(matches!(
            delete_file(dir.path(), ""),
            Err(LoadError::OutsideRoot(_))
        ));
    }

    #[test]
    fn test_delete_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gone.png"), b"x").unwrap();

        delete_file(dir.path(), "gone.png").unwrap();
        assert!(!dir.path().join("gone.png").exists());
        assert!(matches!(
            delete_file(dir.path(), "gone.png"),
            Err(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_error_maps_into_decode_error() {
        let err: DecodeError = LoadError::NotFound("a.png".to_string()).into();
        assert!(matches!(err, DecodeError::IoError(ref m) if m.contains("a.png")));
    }
}
