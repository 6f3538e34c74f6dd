//! Navigation resolution for docnav.
//!
//! Turns a documentation directory tree into a [`NavModel`]: a flat primary
//! navigation bar plus one ordered sidebar tree per top-level section.
//!
//! Resolution combines three sources of truth:
//! - the file system layout (directories become groups, files become pages)
//! - optional per-directory meta files that order, rename and hide children
//! - page front matter (`title`, `tag`, `overviewHeaders`)
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docnav_nav::{ResolveOptions, Resolver};
//! use docnav_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let resolver = Resolver::new(storage, ResolveOptions::default());
//! let model = resolver.resolve()?;
//!
//! for route in model.routes() {
//!     println!("{} -> {}", route.link, route.source);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod front_matter;
mod link;
mod meta;
mod model;
mod node;
mod options;
mod scanner;
mod walker;

pub use error::ResolveError;
pub use front_matter::{FrontMatter, PageInfo, extract_heading, parse_front_matter, read_page_info};
pub use meta::{MetaDeclaration, MetaDirective, MetaError, MetaFormat, Overrides, load_meta, parse_meta};
pub use model::{NavEntry, NavModel, PageRef, PrevNext, Route};
pub use node::{DividerType, NavGroup, NavLink, NavNode, SidebarItem, humanize};
pub use options::{
    DEFAULT_EXTENSIONS, DEFAULT_IGNORE_PREFIXES, DEFAULT_META_FILENAME, Extensions, ResolveOptions,
};
pub use scanner::{ContentEntry, DirScan, scan_dir};
pub use walker::{Resolver, resolve};
