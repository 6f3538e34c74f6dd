//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Entry, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files in memory; directories are implied by file paths or added
/// explicitly with [`with_dir`](Self::with_dir). Listings come back in
/// `HashMap` order, which is exactly what the engine must not depend on.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use docnav_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("guide/index.md", "---\ntitle: Guide\n---\n")
///     .with_file("guide/_meta.json", r#"["index"]"#);
///
/// let entries = storage.list(Path::new("guide")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<HashMap<PathBuf, String>>,
    dirs: RwLock<HashSet<PathBuf>>,
    failures: RwLock<HashMap<PathBuf, StorageErrorKind>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    ///
    /// The root directory always exists.
    #[must_use]
    pub fn new() -> Self {
        let storage = Self::default();
        storage.dirs.write().unwrap().insert(PathBuf::new());
        storage
    }

    /// Add a file with content, creating its parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path: PathBuf = path.into();
        if let Some(parent) = path.parent() {
            self.add_dir_chain(parent);
        }
        self.files.write().unwrap().insert(path, content.into());
        self
    }

    /// Add an (possibly empty) directory and its ancestors.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.add_dir_chain(&path.into());
        self
    }

    /// Make every access to `path` fail with the given error kind.
    ///
    /// Applies to both [`Storage::list`] and [`Storage::read`].
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, path: impl Into<PathBuf>, kind: StorageErrorKind) -> Self {
        self.failures.write().unwrap().insert(path.into(), kind);
        self
    }

    fn add_dir_chain(&self, dir: &Path) {
        let mut dirs = self.dirs.write().unwrap();
        let mut current = Some(dir);
        while let Some(d) = current {
            dirs.insert(d.to_path_buf());
            current = d.parent();
        }
    }

    fn check_failure(&self, path: &Path) -> Result<(), StorageError> {
        match self.failures.read().unwrap().get(path) {
            Some(&kind) => Err(StorageError::new(kind)
                .with_path(path)
                .with_backend(BACKEND)),
            None => Ok(()),
        }
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        self.check_failure(dir)?;

        let dirs = self.dirs.read().unwrap();
        if !dirs.contains(dir) {
            return Err(StorageError::not_found(dir).with_backend(BACKEND));
        }

        let name_in_dir = |path: &Path| -> Option<String> {
            (path.parent() == Some(dir) && path != dir)
                .then(|| path.file_name())
                .flatten()
                .map(|n| n.to_string_lossy().into_owned())
        };

        let mut entries: Vec<Entry> = dirs
            .iter()
            .filter_map(|d| name_in_dir(d))
            .map(Entry::dir)
            .collect();
        entries.extend(
            self.files
                .read()
                .unwrap()
                .keys()
                .filter_map(|f| name_in_dir(f))
                .map(Entry::file),
        );

        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        self.check_failure(path)?;

        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}
