//! Resolution options.
//!
//! Everything the engine needs besides the storage itself lives in
//! [`ResolveOptions`], which is threaded into every entry point. There are no
//! process-wide defaults, so two roots with different extension sets can be
//! resolved side by side.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::ResolveError;

/// Default recognized content extensions.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Default meta filename.
pub const DEFAULT_META_FILENAME: &str = "_meta.json";

/// Default ignore markers: hidden files and underscore-prefixed partials.
pub const DEFAULT_IGNORE_PREFIXES: &[&str] = &[".", "_"];

/// Ordered, validated set of recognized content extensions.
///
/// Order is precedence: when one base name exists with several recognized
/// extensions, the extension listed first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions(Vec<String>);

impl Extensions {
    /// Build an extension set.
    ///
    /// A leading dot is accepted and stripped (`.md` and `md` are the same).
    /// Matching is case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidExtensions`] for an empty list, an empty
    /// extension, or the same extension listed twice (two files differing only
    /// in equally ranked extensions could not be told apart).
    pub fn new<I, S>(extensions: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut list = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim_start_matches('.');
            if ext.is_empty() {
                return Err(ResolveError::InvalidExtensions(
                    "extension cannot be empty".to_owned(),
                ));
            }
            if !seen.insert(ext.to_owned()) {
                return Err(ResolveError::InvalidExtensions(format!(
                    "'{ext}' is listed more than once"
                )));
            }
            list.push(ext.to_owned());
        }
        if list.is_empty() {
            return Err(ResolveError::InvalidExtensions(
                "at least one extension is required".to_owned(),
            ));
        }
        Ok(Self(list))
    }

    /// Extensions in precedence order, without leading dots.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Split a file name into its base name and the precedence of its extension.
    ///
    /// Returns `None` if the name carries no recognized extension or the base
    /// name would be empty.
    #[must_use]
    pub fn split<'a>(&self, file_name: &'a str) -> Option<(&'a str, usize)> {
        self.0.iter().enumerate().find_map(|(rank, ext)| {
            let stem = file_name.strip_suffix(ext.as_str())?.strip_suffix('.')?;
            (!stem.is_empty()).then_some((stem, rank))
        })
    }

    /// Strip a recognized extension from a name, if present.
    #[must_use]
    pub fn strip<'a>(&self, name: &'a str) -> &'a str {
        self.split(name).map_or(name, |(stem, _)| stem)
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self(DEFAULT_EXTENSIONS.iter().map(|&e| e.to_owned()).collect())
    }
}

/// Options for one navigation resolve.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Directory to walk, as a storage path relative to the scan root
    /// (empty for the scan root itself). File keys stay relative to the scan
    /// root; links are relative to this directory.
    pub source_root: PathBuf,
    /// URL prefix for every generated link (e.g. `/` or `/v2/`).
    pub base_path: String,
    /// Recognized content extensions.
    pub extensions: Extensions,
    /// Name of per-directory meta files; `.json`, `.yaml` or `.yml`.
    pub meta_filename: String,
    /// Entries whose name starts with any of these are ignored.
    pub ignore_prefixes: Vec<String>,
    /// Fall back to the first `# H1` heading when front matter has no title.
    pub extract_title: bool,
    /// Derive `nav` from all sections when the root has no meta file.
    pub auto_nav: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            source_root: PathBuf::new(),
            base_path: "/".to_owned(),
            extensions: Extensions::default(),
            meta_filename: DEFAULT_META_FILENAME.to_owned(),
            ignore_prefixes: DEFAULT_IGNORE_PREFIXES
                .iter()
                .map(|&p| p.to_owned())
                .collect(),
            extract_title: false,
            auto_nav: false,
        }
    }
}

impl ResolveOptions {
    /// Check whether an entry name is ignored by convention or is the meta file.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        name == self.meta_filename
            || self
                .ignore_prefixes
                .iter()
                .any(|p| !p.is_empty() && name.starts_with(p.as_str()))
    }
}
