//! Navigation nodes and the node builder.
//!
//! The builder turns one content file, or one directory whose children are
//! already resolved, into exactly one [`NavNode`] (or a skip). It owns every
//! precedence rule for text, links, tags and identity; the walker only decides
//! which entries to build and in what order.

use serde::Serialize;

use crate::front_matter::PageInfo;
use crate::link::{dir_link, normalize_base, normalize_override, page_link};
use crate::meta::{MetaDirective, Overrides};
use crate::options::ResolveOptions;
use crate::scanner::{ContentEntry, path_to_key};

/// Fallback text of an index page at the source root.
const ROOT_INDEX_TEXT: &str = "Home";

/// Resolved navigation node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavNode {
    /// Stable identity: path relative to the scan root without extension.
    #[serde(rename = "_fileKey")]
    pub file_key: String,
    /// Display title.
    pub text: String,
    /// Site-relative link.
    pub link: String,
    /// Badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Heading levels to list when this group is shown as an overview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview_headers: Option<Vec<u8>>,
    /// Storage path of the backing content file; `None` for a pure directory group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Link the backing content file is published at. Set together with
    /// `source` and never changed by a meta `link` override.
    #[serde(skip)]
    pub route: Option<String>,
    /// Group data when the node stands for a directory.
    #[serde(flatten)]
    pub group: Option<NavGroup>,
}

impl NavNode {
    /// Check whether this node is a group.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    /// Child items, empty for leaves.
    #[must_use]
    pub fn items(&self) -> &[SidebarItem] {
        self.group.as_ref().map_or(&[], |g| g.items.as_slice())
    }
}

/// Group part of a directory node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    /// Ordered children.
    pub items: Vec<SidebarItem>,
    /// Start collapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Allow collapsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,
}

/// Divider style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerType {
    /// Solid line.
    Solid,
    /// Dashed line.
    Dashed,
}

/// Link that doesn't correspond to a content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Display text.
    pub text: String,
    /// Link target.
    pub link: String,
    /// Badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// One entry of a sidebar item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SidebarItem {
    /// Page or directory group.
    Node(NavNode),
    /// Visual separator.
    Divider {
        /// Line style.
        #[serde(rename = "dividerType")]
        divider_type: DividerType,
    },
    /// Non-link heading.
    SectionHeader {
        /// Heading text.
        #[serde(rename = "sectionHeaderText")]
        text: String,
        /// Badge.
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    },
    /// Custom link.
    Link(NavLink),
}

impl SidebarItem {
    /// The node, if this item is one.
    #[must_use]
    pub fn as_node(&self) -> Option<&NavNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// Index page of a resolved directory.
#[derive(Debug, Clone)]
pub(crate) struct IndexPage {
    /// The index as a leaf node.
    pub node: NavNode,
    /// Overview headers from the index front matter.
    pub overview_headers: Option<Vec<u8>>,
}

/// Resolved contents of one directory.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirContents {
    /// Ordered items; the index page appears here where listed.
    pub items: Vec<SidebarItem>,
    /// Index page, whether or not it is listed in `items`.
    pub index: Option<IndexPage>,
    /// Whether the directory has a meta file.
    pub has_meta: bool,
}

impl DirContents {
    /// An empty directory with no meta and no index resolves to nothing.
    fn is_skip(&self) -> bool {
        self.items.is_empty() && self.index.is_none() && !self.has_meta
    }
}

/// Humanize a file or directory name.
///
/// `-` and `_` become spaces and the leading letter is capitalized:
/// `getting-started` becomes `Getting started`.
#[must_use]
pub fn humanize(name: &str) -> String {
    let spaced = name.replace(['-', '_'], " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds nodes for one resolve.
pub(crate) struct NodeBuilder<'a> {
    options: &'a ResolveOptions,
    base: String,
    root_key: String,
}

impl<'a> NodeBuilder<'a> {
    pub(crate) fn new(options: &'a ResolveOptions) -> Self {
        Self {
            options,
            base: normalize_base(&options.base_path),
            root_key: path_to_key(&options.source_root),
        }
    }

    /// Path of a key relative to the source root.
    fn relative<'k>(&self, key: &'k str) -> &'k str {
        if self.root_key.is_empty() {
            return key;
        }
        key.strip_prefix(self.root_key.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(key)
    }

    /// Link of a content file.
    pub(crate) fn file_link(&self, entry: &ContentEntry) -> String {
        page_link(&self.base, self.relative(&entry.key))
    }

    /// URL prefix of a top-level section, without trailing slash.
    pub(crate) fn section_prefix(&self, section: &ContentEntry) -> String {
        dir_link(&self.base, self.relative(&section.key))
    }

    /// Normalize a link from a meta override.
    pub(crate) fn override_link(&self, link: &str) -> String {
        normalize_override(link, &self.base, &self.options.extensions)
    }

    /// Humanized fallback text of a content file.
    fn fallback_text(&self, entry: &ContentEntry) -> String {
        if !entry.is_index() {
            return humanize(&entry.name);
        }
        let rel = self.relative(&entry.key);
        match rel.rsplit_once('/') {
            Some((dir, _)) => humanize(dir.rsplit('/').next().unwrap_or(dir)),
            None => ROOT_INDEX_TEXT.to_owned(),
        }
    }

    /// Build the leaf node of a content file.
    ///
    /// Text precedence: override, front matter title (or heading), humanized
    /// name. Tag precedence: override, front matter.
    pub(crate) fn page_node(
        &self,
        entry: &ContentEntry,
        info: &PageInfo,
        overrides: Option<&Overrides>,
    ) -> NavNode {
        let overrides = overrides.cloned().unwrap_or_default();
        NavNode {
            file_key: entry.key.clone(),
            text: overrides
                .text
                .or_else(|| info.title().map(str::to_owned))
                .unwrap_or_else(|| self.fallback_text(entry)),
            link: overrides
                .link
                .map_or_else(|| self.file_link(entry), |l| self.override_link(&l)),
            tag: overrides.tag.or_else(|| info.front_matter.tag.clone()),
            overview_headers: None,
            source: Some(path_to_key(&entry.path)),
            route: Some(self.file_link(entry)),
            group: None,
        }
    }

    /// Build the node of a directory from its resolved contents.
    ///
    /// With `same_name`, the file of the same name supplies identity and leaf
    /// attributes and the directory supplies items. Without it, an index page
    /// is promoted to the group head. Returns `None` (skip) for a directory
    /// with no content, no index and no meta; a same-name file then stands
    /// alone as a leaf.
    pub(crate) fn dir_node(
        &self,
        dir: &ContentEntry,
        contents: DirContents,
        same_name: Option<(&ContentEntry, &PageInfo)>,
        overrides: Option<&Overrides>,
    ) -> Option<NavNode> {
        if contents.is_skip() {
            return same_name.map(|(file, info)| self.page_node(file, info, overrides));
        }

        let overrides = overrides.cloned().unwrap_or_default();
        let mut node = match (same_name, contents.index) {
            (Some((file, info)), _) => NavNode {
                overview_headers: info.front_matter.overview_headers.clone(),
                group: Some(NavGroup {
                    items: contents.items,
                    collapsed: None,
                    collapsible: None,
                }),
                ..self.page_node(file, info, None)
            },
            (None, Some(index)) => {
                let index_key = index.node.file_key.clone();
                let items = contents
                    .items
                    .into_iter()
                    .filter(|item| item.as_node().is_none_or(|n| n.file_key != index_key))
                    .collect();
                NavNode {
                    overview_headers: index.overview_headers,
                    group: Some(NavGroup {
                        items,
                        collapsed: None,
                        collapsible: None,
                    }),
                    ..index.node
                }
            }
            (None, None) => NavNode {
                file_key: dir.key.clone(),
                text: humanize(&dir.name),
                link: dir_link(&self.base, self.relative(&dir.key)),
                tag: None,
                overview_headers: None,
                source: None,
                route: None,
                group: Some(NavGroup {
                    items: contents.items,
                    collapsed: None,
                    collapsible: None,
                }),
            },
        };

        if let Some(text) = overrides.text {
            node.text = text;
        }
        if let Some(link) = overrides.link {
            node.link = self.override_link(&link);
        }
        if let Some(tag) = overrides.tag {
            node.tag = Some(tag);
        }
        if let Some(group) = node.group.as_mut() {
            group.collapsed = overrides.collapsed;
            group.collapsible = overrides.collapsible;
        }

        Some(node)
    }

    /// Build the item of an identity-less directive.
    ///
    /// Returns `None` for named directives, which need a child to resolve.
    pub(crate) fn directive_item(&self, directive: &MetaDirective) -> Option<SidebarItem> {
        match directive {
            MetaDirective::Divider { dashed } => Some(SidebarItem::Divider {
                divider_type: if *dashed {
                    DividerType::Dashed
                } else {
                    DividerType::Solid
                },
            }),
            MetaDirective::SectionHeader { text, tag } => Some(SidebarItem::SectionHeader {
                text: text.clone(),
                tag: tag.clone(),
            }),
            MetaDirective::CustomLink {
                text, link, tag, ..
            } => Some(SidebarItem::Link(NavLink {
                text: text.clone(),
                link: self.override_link(link),
                tag: tag.clone(),
            })),
            MetaDirective::Named(_) | MetaDirective::NamedWithOverride { .. } => None,
        }
    }
}
