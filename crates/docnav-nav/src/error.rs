//! Error types for navigation resolution.

use std::path::PathBuf;

use docnav_storage::StorageError;

use crate::meta::MetaError;

/// Error returned when navigation resolution fails.
///
/// Absence (missing directories, files or meta) is never an error; everything
/// here aborts the whole resolve.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Storage failure other than "not found".
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Meta file exists but is malformed.
    #[error("Invalid meta file {}: {source}", .path.display())]
    Meta {
        /// Storage path of the meta file.
        path: PathBuf,
        /// What was wrong with it.
        #[source]
        source: MetaError,
    },
    /// Two items of one directory resolved to the same file key.
    #[error("Duplicate navigation key '{key}' in {}", .dir.display())]
    KeyCollision {
        /// The colliding file key.
        key: String,
        /// Storage path of the directory holding both items.
        dir: PathBuf,
    },
    /// Recognized extension list is unusable.
    #[error("Invalid content extensions: {0}")]
    InvalidExtensions(String),
    /// Source root is not inside the scan root.
    #[error("Source root {} is not inside scan root {}", .source_root.display(), .scan_root.display())]
    InvalidRoot {
        /// Directory that was to be walked.
        source_root: PathBuf,
        /// Directory file keys are relative to.
        scan_root: PathBuf,
    },
}
