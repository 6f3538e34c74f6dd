//! Directory scanning.
//!
//! Lists the immediate children of one directory and classifies each as a
//! content file, a sub-directory, or ignorable. Unlike a full tree walk, the
//! scanner never recurses: the walker decides what to descend into.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use docnav_storage::Storage;

use crate::error::ResolveError;
use crate::options::ResolveOptions;

/// Base name of index pages.
pub(crate) const INDEX_NAME: &str = "index";

/// One file system entry eligible to become a navigation node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Storage path relative to the scan root, extension included.
    pub path: PathBuf,
    /// File key: path relative to the scan root without extension.
    pub key: String,
    /// Base name: file name without extension, or the directory name.
    pub name: String,
    /// True for directories.
    pub is_dir: bool,
    /// Recognized extension for files, `None` for directories.
    pub extension: Option<String>,
}

impl ContentEntry {
    /// Check whether this entry is an index page.
    #[must_use]
    pub fn is_index(&self) -> bool {
        !self.is_dir && self.name == INDEX_NAME
    }
}

/// Immediate children of one directory, each list sorted by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirScan {
    /// Content files, one per base name.
    pub files: Vec<ContentEntry>,
    /// Sub-directories.
    pub dirs: Vec<ContentEntry>,
}

impl DirScan {
    /// Check whether the directory has no content files and no sub-directories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Scan one directory.
///
/// Skips the meta file, entries matching an ignore prefix, and files without a
/// recognized extension. When a base name exists with several recognized
/// extensions, the first-listed extension wins and the rest are logged and
/// skipped.
///
/// Returns an empty [`DirScan`] if the directory doesn't exist.
///
/// # Errors
///
/// Returns [`ResolveError::Storage`] if the directory exists but can't be listed.
pub fn scan_dir(
    storage: &dyn Storage,
    dir: &Path,
    options: &ResolveOptions,
) -> Result<DirScan, ResolveError> {
    let entries = match storage.list(dir) {
        Ok(entries) => entries,
        Err(e) if e.is_not_found() => return Ok(DirScan::default()),
        Err(e) => return Err(e.into()),
    };

    let dir_key = path_to_key(dir);
    let mut files: BTreeMap<String, (usize, ContentEntry)> = BTreeMap::new();
    let mut dirs: BTreeMap<String, ContentEntry> = BTreeMap::new();

    for entry in entries {
        if options.is_ignored(&entry.name) {
            continue;
        }

        if entry.is_dir() {
            dirs.insert(
                entry.name.clone(),
                ContentEntry {
                    path: dir.join(&entry.name),
                    key: join_key(&dir_key, &entry.name),
                    name: entry.name,
                    is_dir: true,
                    extension: None,
                },
            );
            continue;
        }

        let Some((stem, rank)) = options.extensions.split(&entry.name) else {
            continue;
        };
        let candidate = ContentEntry {
            path: dir.join(&entry.name),
            key: join_key(&dir_key, stem),
            name: stem.to_owned(),
            is_dir: false,
            extension: Some(options.extensions.as_slice()[rank].clone()),
        };

        match files.get(stem) {
            Some((existing_rank, existing)) if *existing_rank <= rank => {
                tracing::warn!(
                    kept = %existing.path.display(),
                    skipped = %candidate.path.display(),
                    "Same page name with several extensions, keeping the higher-priority one"
                );
            }
            Some((_, existing)) => {
                tracing::warn!(
                    kept = %candidate.path.display(),
                    skipped = %existing.path.display(),
                    "Same page name with several extensions, keeping the higher-priority one"
                );
                files.insert(stem.to_owned(), (rank, candidate));
            }
            None => {
                files.insert(stem.to_owned(), (rank, candidate));
            }
        }
    }

    Ok(DirScan {
        files: files.into_values().map(|(_, entry)| entry).collect(),
        dirs: dirs.into_values().collect(),
    })
}

/// Convert a storage path to a `/`-separated key.
pub(crate) fn path_to_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a parent key and a child name.
pub(crate) fn join_key(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use docnav_storage::{MockStorage, StorageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::Extensions;

    fn names(entries: &[ContentEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_scan_partitions_files_and_dirs() {
        let storage = MockStorage::new()
            .with_file("guide/c.md", "")
            .with_file("guide/a.md", "")
            .with_file("guide/b.mdx", "")
            .with_dir("guide/sub");

        let scan = scan_dir(&storage, Path::new("guide"), &ResolveOptions::default()).unwrap();

        assert_eq!(names(&scan.files), vec!["a", "b", "c"]);
        assert_eq!(names(&scan.dirs), vec!["sub"]);
        assert_eq!(scan.files[1].key, "guide/b");
        assert_eq!(scan.files[1].path, PathBuf::from("guide/b.mdx"));
        assert_eq!(scan.files[1].extension.as_deref(), Some("mdx"));
        assert_eq!(scan.dirs[0].key, "guide/sub");
        assert!(scan.dirs[0].is_dir);
    }

    #[test]
    fn test_scan_root_keys_have_no_prefix() {
        let storage = MockStorage::new().with_file("index.md", "");

        let scan = scan_dir(&storage, Path::new(""), &ResolveOptions::default()).unwrap();

        assert_eq!(scan.files[0].key, "index");
        assert!(scan.files[0].is_index());
    }

    #[test]
    fn test_scan_skips_meta_hidden_and_unrecognized() {
        let storage = MockStorage::new()
            .with_file("_meta.json", "[]")
            .with_file(".draft.md", "")
            .with_file("_partial.md", "")
            .with_file("notes.txt", "")
            .with_file("page.md", "")
            .with_dir(".git")
            .with_dir("_assets");

        let scan = scan_dir(&storage, Path::new(""), &ResolveOptions::default()).unwrap();

        assert_eq!(names(&scan.files), vec!["page"]);
        assert!(scan.dirs.is_empty());
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let storage = MockStorage::new();

        let scan = scan_dir(&storage, Path::new("missing"), &ResolveOptions::default()).unwrap();

        assert!(scan.is_empty());
    }

    #[test]
    fn test_scan_list_failure_is_error() {
        let storage = MockStorage::new()
            .with_dir("guide")
            .with_failure("guide", StorageErrorKind::PermissionDenied);

        let err = scan_dir(&storage, Path::new("guide"), &ResolveOptions::default()).unwrap_err();

        assert!(matches!(err, ResolveError::Storage(_)));
    }

    #[test]
    fn test_scan_extension_precedence_follows_list_order() {
        let storage = MockStorage::new()
            .with_file("a.md", "")
            .with_file("a.mdx", "");

        let md_first = ResolveOptions::default();
        let scan = scan_dir(&storage, Path::new(""), &md_first).unwrap();
        assert_eq!(scan.files.len(), 1);
        assert_eq!(scan.files[0].path, PathBuf::from("a.md"));

        let mdx_first = ResolveOptions {
            extensions: Extensions::new(["mdx", "md"]).unwrap(),
            ..Default::default()
        };
        let scan = scan_dir(&storage, Path::new(""), &mdx_first).unwrap();
        assert_eq!(scan.files.len(), 1);
        assert_eq!(scan.files[0].path, PathBuf::from("a.mdx"));
    }

    #[test]
    fn test_scan_is_sorted_regardless_of_listing_order() {
        let mut storage = MockStorage::new();
        for name in ["delta", "alpha", "charlie", "bravo", "echo"] {
            storage = storage.with_file(format!("{name}.md"), "");
            storage = storage.with_dir(format!("{name}-dir"));
        }

        let scan = scan_dir(&storage, Path::new(""), &ResolveOptions::default()).unwrap();

        assert_eq!(
            names(&scan.files),
            vec!["alpha", "bravo", "charlie", "delta", "echo"]
        );
        assert_eq!(
            names(&scan.dirs),
            vec!["alpha-dir", "bravo-dir", "charlie-dir", "delta-dir", "echo-dir"]
        );
    }

    #[test]
    fn test_path_to_key() {
        assert_eq!(path_to_key(Path::new("")), "");
        assert_eq!(path_to_key(Path::new("guide/sub")), "guide/sub");
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "a"), "a");
        assert_eq!(join_key("guide", "a"), "guide/a");
    }
}
