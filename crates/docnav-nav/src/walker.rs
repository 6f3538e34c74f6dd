//! Tree walker.
//!
//! Resolves a documentation root depth-first, children before parents. Each
//! directory is a pure function of its own listing, its meta file and the
//! already-resolved sub-directories, so siblings are resolved in parallel and
//! collected in name order.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use docnav_storage::{FsStorage, Storage};
use rayon::prelude::*;

use crate::error::ResolveError;
use crate::front_matter::{PageInfo, read_page_info};
use crate::meta::{MetaDeclaration, MetaDirective, Overrides, load_meta};
use crate::model::{NavEntry, NavModel};
use crate::node::{DirContents, IndexPage, NavNode, NodeBuilder, SidebarItem, humanize};
use crate::options::{Extensions, ResolveOptions};
use crate::scanner::{ContentEntry, DirScan, INDEX_NAME, path_to_key, scan_dir};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// A scanned child waiting to be turned into a node.
enum Child {
    Page {
        entry: ContentEntry,
        info: PageInfo,
    },
    Dir {
        entry: ContentEntry,
        contents: DirContents,
        same_name: Option<(ContentEntry, PageInfo)>,
    },
}

/// Children of one directory with their front matter and resolved subtrees.
struct Children {
    index: Option<(ContentEntry, PageInfo)>,
    by_name: BTreeMap<String, Child>,
}

/// Top-level section resolved at the documentation root.
struct Section {
    prefix: String,
    text: String,
}

/// Navigation resolver over a storage backend.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use docnav_nav::{ResolveOptions, Resolver};
/// use docnav_storage::FsStorage;
///
/// let storage = Arc::new(FsStorage::new("docs".into()));
/// let model = Resolver::new(storage, ResolveOptions::default()).resolve()?;
/// println!("{}", serde_json::to_string_pretty(&model)?);
/// ```
pub struct Resolver {
    storage: Arc<dyn Storage>,
    options: ResolveOptions,
}

impl Resolver {
    /// Create a resolver.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, options: ResolveOptions) -> Self {
        Self { storage, options }
    }

    /// Options this resolver was created with.
    #[must_use]
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve the documentation root into a [`NavModel`].
    ///
    /// A missing source root resolves to an empty model.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on malformed meta anywhere in the tree, on a
    /// file key collision, or on a storage failure other than "not found".
    pub fn resolve(&self) -> Result<NavModel, ResolveError> {
        let start = Instant::now();
        let root = self.options.source_root.as_path();
        let storage = self.storage.as_ref();
        let builder = NodeBuilder::new(&self.options);

        let scan = scan_dir(storage, root, &self.options)?;
        let meta = load_meta(storage, root, &self.options)?;

        let sections: Vec<DirContents> = scan
            .dirs
            .par_iter()
            .map(|dir| self.walk(&dir.path))
            .collect::<Result<_, _>>()?;
        let infos = self.read_infos(&scan.files)?;

        let mut files: Vec<(&ContentEntry, &PageInfo)> = scan.files.iter().zip(&infos).collect();
        files.sort_by_key(|(entry, _)| !entry.is_index());
        let root_pages: Vec<NavNode> = files
            .iter()
            .map(|(entry, info)| builder.page_node(entry, info, None))
            .collect();
        let page_names: BTreeMap<&str, usize> = files
            .iter()
            .enumerate()
            .map(|(i, (entry, _))| (entry.name.as_str(), i))
            .collect();

        let mut sidebar = BTreeMap::new();
        let mut section_by_name: BTreeMap<&str, Section> = BTreeMap::new();
        for (entry, contents) in scan.dirs.iter().zip(sections) {
            if contents.items.is_empty() {
                tracing::debug!(section = %entry.path.display(), "Skipping empty section");
                continue;
            }
            let prefix = builder.section_prefix(entry);
            let text = contents
                .index
                .as_ref()
                .map(|index| index.node.text.clone())
                .or_else(|| {
                    page_names
                        .get(entry.name.as_str())
                        .map(|&i| root_pages[i].text.clone())
                })
                .unwrap_or_else(|| humanize(&entry.name));
            section_by_name.insert(
                &entry.name,
                Section {
                    prefix: prefix.clone(),
                    text,
                },
            );
            sidebar.insert(prefix, contents.items);
        }

        let nav = match &meta {
            Some(decl) => decl
                .directives
                .iter()
                .filter_map(|directive| {
                    self.nav_entry(&builder, directive, &section_by_name, |name| {
                        page_names.get(name).map(|&i| &root_pages[i])
                    })
                })
                .collect(),
            None if self.options.auto_nav => section_by_name.values().map(section_entry).collect(),
            None => Vec::new(),
        };

        let model = NavModel {
            nav,
            sidebar,
            root_pages,
        };

        tracing::info!(
            root = %root.display(),
            nav_entries = model.nav.len(),
            sections = model.sidebar.len(),
            routes = model.routes().len(),
            elapsed_ms = elapsed_ms(start),
            "Navigation resolved"
        );

        Ok(model)
    }

    /// Resolve one directory as a nested group node.
    ///
    /// An index page is promoted to the group head. Returns `None` when the
    /// directory resolves to nothing (no content, no index, no meta).
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::resolve`], for the directory's subtree.
    pub fn resolve_dir(&self, dir: &Path) -> Result<Option<NavNode>, ResolveError> {
        let contents = self.walk(dir)?;
        let key = path_to_key(dir);
        let entry = ContentEntry {
            path: dir.to_path_buf(),
            name: key.rsplit('/').next().unwrap_or_default().to_owned(),
            key,
            is_dir: true,
            extension: None,
        };
        Ok(NodeBuilder::new(&self.options).dir_node(&entry, contents, None, None))
    }

    /// Resolve the item list of one directory, index page included as an
    /// ordinary item.
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::resolve`], for the directory's subtree.
    pub fn resolve_items(&self, dir: &Path) -> Result<Vec<SidebarItem>, ResolveError> {
        Ok(self.walk(dir)?.items)
    }

    /// Resolve one directory's contents, sub-directories first.
    fn walk(&self, dir: &Path) -> Result<DirContents, ResolveError> {
        let storage = self.storage.as_ref();
        let scan = scan_dir(storage, dir, &self.options)?;
        let meta = load_meta(storage, dir, &self.options)?;
        let builder = NodeBuilder::new(&self.options);

        let Children {
            index,
            by_name: mut children,
        } = self.collect_children(dir, scan)?;

        let index = index.map(|(entry, info)| {
            let overrides = meta
                .as_ref()
                .and_then(|decl| find_directive(decl, INDEX_NAME))
                .and_then(MetaDirective::overrides);
            IndexPage {
                node: builder.page_node(&entry, &info, overrides),
                overview_headers: info.front_matter.overview_headers,
            }
        });

        let mut items = Vec::new();
        match &meta {
            Some(decl) => {
                if let Some(index) = &index
                    && find_directive(decl, INDEX_NAME).is_none()
                {
                    tracing::debug!(dir = %dir.display(), "Index not listed in meta, kept first");
                    items.push(SidebarItem::Node(index.node.clone()));
                }
                for directive in &decl.directives {
                    if let Some(item) = builder.directive_item(directive) {
                        items.push(item);
                        continue;
                    }
                    let Some(name) = directive.name() else {
                        continue;
                    };
                    if name == INDEX_NAME
                        && let Some(index) = &index
                    {
                        items.push(SidebarItem::Node(index.node.clone()));
                        continue;
                    }
                    match children.remove(name) {
                        Some(child) => {
                            items.extend(build_child(&builder, child, directive.overrides()));
                        }
                        None => tracing::warn!(
                            dir = %dir.display(),
                            name,
                            "Meta entry doesn't match any content, skipping"
                        ),
                    }
                }
                for name in children.keys() {
                    tracing::debug!(dir = %dir.display(), name, "Not listed in meta, excluded");
                }
            }
            None => {
                if let Some(index) = &index {
                    items.push(SidebarItem::Node(index.node.clone()));
                }
                for child in children.into_values() {
                    items.extend(build_child(&builder, child, None));
                }
            }
        }

        ensure_unique_keys(&items, dir)?;

        Ok(DirContents {
            items,
            index,
            has_meta: meta.is_some(),
        })
    }

    /// Read front matter of the files and resolve the sub-directories of one
    /// scanned directory, pairing same-name files with their directories.
    fn collect_children(&self, dir: &Path, scan: DirScan) -> Result<Children, ResolveError> {
        let contents: Vec<DirContents> = scan
            .dirs
            .par_iter()
            .map(|sub| self.walk(&sub.path))
            .collect::<Result<_, _>>()?;
        let infos = self.read_infos(&scan.files)?;

        let mut pages: BTreeMap<String, (ContentEntry, PageInfo)> = scan
            .files
            .into_iter()
            .zip(infos)
            .map(|(entry, info)| (entry.name.clone(), (entry, info)))
            .collect();
        let index = pages.remove(INDEX_NAME);

        let mut by_name = BTreeMap::new();
        for (entry, contents) in scan.dirs.into_iter().zip(contents) {
            if entry.name == INDEX_NAME && index.is_some() {
                return Err(ResolveError::KeyCollision {
                    key: entry.key,
                    dir: dir.to_path_buf(),
                });
            }
            let same_name = pages.remove(&entry.name);
            by_name.insert(
                entry.name.clone(),
                Child::Dir {
                    entry,
                    contents,
                    same_name,
                },
            );
        }
        for (name, (entry, info)) in pages {
            by_name.insert(name, Child::Page { entry, info });
        }

        Ok(Children { index, by_name })
    }

    fn read_infos(&self, files: &[ContentEntry]) -> Result<Vec<PageInfo>, ResolveError> {
        let storage = self.storage.as_ref();
        files
            .par_iter()
            .map(|file| read_page_info(storage, &file.path, self.options.extract_title))
            .collect()
    }

    /// Primary navigation entry for one root directive.
    fn nav_entry<'a>(
        &self,
        builder: &NodeBuilder<'_>,
        directive: &MetaDirective,
        sections: &BTreeMap<&str, Section>,
        root_page: impl Fn(&str) -> Option<&'a NavNode>,
    ) -> Option<NavEntry> {
        match directive {
            MetaDirective::CustomLink {
                text,
                link,
                active_match,
                ..
            } => Some(NavEntry {
                text: text.clone(),
                link: builder.override_link(link),
                active_match: active_match.clone(),
            }),
            MetaDirective::Divider { .. } | MetaDirective::SectionHeader { .. } => {
                tracing::debug!(?directive, "Ignoring non-link directive in root meta");
                None
            }
            MetaDirective::Named(name) | MetaDirective::NamedWithOverride { name, .. } => {
                let overrides = directive.overrides().cloned().unwrap_or_default();
                let entry = if let Some(section) = sections.get(name.as_str()) {
                    section_entry(section)
                } else if let Some(page) = root_page(name.as_str()) {
                    NavEntry {
                        text: page.text.clone(),
                        link: page.link.clone(),
                        active_match: None,
                    }
                } else if overrides.link.is_some() {
                    NavEntry {
                        text: humanize(name),
                        link: String::new(),
                        active_match: None,
                    }
                } else {
                    tracing::warn!(
                        root = %self.options.source_root.display(),
                        name = name.as_str(),
                        "Root meta entry doesn't match any section or page, skipping"
                    );
                    return None;
                };
                Some(apply_nav_overrides(builder, entry, &overrides))
            }
        }
    }
}

fn section_entry(section: &Section) -> NavEntry {
    NavEntry {
        text: section.text.clone(),
        link: format!("{}/", section.prefix),
        active_match: Some(format!("^{}/", regex::escape(&section.prefix))),
    }
}

fn apply_nav_overrides(builder: &NodeBuilder<'_>, mut entry: NavEntry, overrides: &Overrides) -> NavEntry {
    if let Some(text) = &overrides.text {
        entry.text.clone_from(text);
    }
    if let Some(link) = &overrides.link {
        entry.link = builder.override_link(link);
    }
    entry
}

fn find_directive<'a>(decl: &'a MetaDeclaration, name: &str) -> Option<&'a MetaDirective> {
    decl.directives.iter().find(|d| d.name() == Some(name))
}

fn build_child(builder: &NodeBuilder<'_>, child: Child, overrides: Option<&Overrides>) -> Option<SidebarItem> {
    let node = match child {
        Child::Page { entry, info } => Some(builder.page_node(&entry, &info, overrides)),
        Child::Dir {
            entry,
            contents,
            same_name,
        } => {
            let node = builder.dir_node(
                &entry,
                contents,
                same_name.as_ref().map(|(file, info)| (file, info)),
                overrides,
            );
            if node.is_none() {
                tracing::debug!(dir = %entry.path.display(), "Skipping empty directory");
            }
            node
        }
    };
    node.map(SidebarItem::Node)
}

fn ensure_unique_keys(items: &[SidebarItem], dir: &Path) -> Result<(), ResolveError> {
    let mut seen = HashSet::new();
    for node in items.iter().filter_map(SidebarItem::as_node) {
        if !seen.insert(node.file_key.as_str()) {
            return Err(ResolveError::KeyCollision {
                key: node.file_key.clone(),
                dir: dir.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Resolve a documentation root on the local filesystem.
///
/// `source_root` is the directory to walk and must lie inside `scan_root`;
/// file keys are relative to `scan_root`, links to `source_root` under
/// `base_path`. Other options take their defaults.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidRoot`] if `source_root` is outside
/// `scan_root`, or any error of [`Resolver::resolve`].
pub fn resolve(
    source_root: &Path,
    base_path: &str,
    scan_root: &Path,
    extensions: &Extensions,
) -> Result<NavModel, ResolveError> {
    let relative = source_root
        .strip_prefix(scan_root)
        .map_err(|_| ResolveError::InvalidRoot {
            source_root: source_root.to_path_buf(),
            scan_root: scan_root.to_path_buf(),
        })?;

    let options = ResolveOptions {
        source_root: relative.to_path_buf(),
        base_path: base_path.to_owned(),
        extensions: extensions.clone(),
        ..ResolveOptions::default()
    };
    let storage = Arc::new(FsStorage::new(PathBuf::from(scan_root)));
    Resolver::new(storage, options).resolve()
}
