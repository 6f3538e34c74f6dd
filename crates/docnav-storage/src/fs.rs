//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for listing and reading a documentation tree on the
//! local filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a directory.
///
/// Storage paths are joined onto the root. Symlinks are followed, so a
/// symlinked directory lists as a directory.
///
/// # Example
///
/// ```ignore
/// use std::path::{Path, PathBuf};
/// use docnav_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// for entry in storage.list(Path::new("guide"))? {
///     println!("{}", entry.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory for document storage.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage.
    ///
    /// # Arguments
    ///
    /// * `root` - Documentation scan root
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a path doesn't escape the root directory.
    ///
    /// Rejects absolute paths and parent directory components (`..`).
    fn validate_path(path: &Path) -> Result<(), StorageError> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Map a storage path to an absolute filesystem path.
    fn full_path(&self, path: &Path) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;
        Ok(self.root.join(path))
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        let full = self.full_path(dir)?;
        let read_dir = fs::read_dir(&full)
            .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry
                .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;

            // Follow symlinks; a dangling link is skipped rather than failing the listing
            let Ok(meta) = fs::metadata(entry.path()) else {
                tracing::debug!(path = %entry.path().display(), "Skipping unreadable entry");
                continue;
            };
            let kind = if meta.is_dir() {
                EntryKind::Dir
            } else if meta.is_file() {
                EntryKind::File
            } else {
                continue;
            };

            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        let full = self.full_path(path)?;
        fs::read_to_string(&full)
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }
}
