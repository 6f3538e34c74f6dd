//! Storage abstraction for the docnav navigation engine.
//!
//! This crate provides a [`Storage`] trait for abstracting directory listing and
//! file reads from the underlying storage backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between navigation resolution and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `list()` and `read()` methods
//! - [`FsStorage`] implementation for filesystem backends
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use docnav_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! let meta = storage.read(Path::new("guide/_meta.json"))?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};
