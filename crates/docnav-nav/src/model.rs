//! Resolved navigation model and queries over it.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::link::same_page;
use crate::node::{NavNode, SidebarItem};

/// One primary navigation bar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavEntry {
    /// Display text.
    pub text: String,
    /// Link target.
    pub link: String,
    /// Regex source matching the URLs for which this entry is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_match: Option<String>,
}

/// A page to render: every node backed by a content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Site-relative link.
    pub link: String,
    /// Node identity.
    pub file_key: String,
    /// Storage path of the content file.
    pub source: String,
}

/// Neighbouring page reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef<'a> {
    /// Display text.
    pub text: &'a str,
    /// Link target.
    pub link: &'a str,
}

/// Previous and next pages of a page within its sidebar section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrevNext<'a> {
    /// Page before, in reading order.
    pub prev: Option<PageRef<'a>>,
    /// Page after, in reading order.
    pub next: Option<PageRef<'a>>,
}

/// Result of a navigation resolve.
///
/// Computed once from a snapshot of the source tree and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavModel {
    /// Primary navigation bar entries.
    pub nav: Vec<NavEntry>,
    /// Item tree per top-level section, keyed by URL prefix.
    pub sidebar: BTreeMap<String, Vec<SidebarItem>>,
    /// Content files directly under the source root.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub root_pages: Vec<NavNode>,
}

impl NavModel {
    /// Check whether nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nav.is_empty() && self.sidebar.is_empty() && self.root_pages.is_empty()
    }

    /// All pages backed by a content file.
    ///
    /// Root pages come first, then each section in key order, depth-first.
    /// Each route is published at the node's own file location, regardless of
    /// any link override shown in the sidebar. When two nodes share a route,
    /// the first one wins.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        let mut seen = HashSet::new();
        let mut routes = Vec::new();
        for node in &self.root_pages {
            push_routes(node, &mut seen, &mut routes);
        }
        for items in self.sidebar.values() {
            for node in items.iter().filter_map(SidebarItem::as_node) {
                push_routes(node, &mut seen, &mut routes);
            }
        }
        routes
    }

    /// Sidebar section a link belongs to.
    ///
    /// Picks the longest section prefix that equals the link or is followed by
    /// `/` in it.
    #[must_use]
    pub fn sidebar_for(&self, link: &str) -> Option<(&str, &[SidebarItem])> {
        self.sidebar
            .iter()
            .filter(|(prefix, _)| {
                link.strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, items)| (prefix.as_str(), items.as_slice()))
    }

    /// Previous and next pages of a page within its section.
    ///
    /// Pages are the section's nodes backed by a content file, in depth-first
    /// order. `link` is matched against each page's route ignoring a trailing
    /// slash; the neighbours carry their sidebar links. Returns an empty result
    /// for a link outside every section.
    #[must_use]
    pub fn prev_next(&self, link: &str) -> PrevNext<'_> {
        let Some((_, items)) = self.sidebar_for(link) else {
            return PrevNext::default();
        };

        let mut pages = Vec::new();
        flatten_pages(items, &mut pages);

        let Some(pos) = pages.iter().position(|(route, _)| same_page(route, link)) else {
            return PrevNext::default();
        };
        PrevNext {
            prev: pos.checked_sub(1).and_then(|i| pages.get(i)).map(|(_, p)| *p),
            next: pages.get(pos + 1).map(|(_, p)| *p),
        }
    }

    /// Find a node by file key.
    #[must_use]
    pub fn find(&self, file_key: &str) -> Option<&NavNode> {
        self.root_pages
            .iter()
            .find(|n| n.file_key == file_key)
            .or_else(|| {
                self.sidebar
                    .values()
                    .find_map(|items| find_in(items, file_key))
            })
    }
}

fn push_routes(node: &NavNode, seen: &mut HashSet<String>, routes: &mut Vec<Route>) {
    if let (Some(source), Some(route)) = (&node.source, &node.route)
        && seen.insert(route.clone())
    {
        routes.push(Route {
            link: route.clone(),
            file_key: node.file_key.clone(),
            source: source.clone(),
        });
    }
    for child in node.items().iter().filter_map(SidebarItem::as_node) {
        push_routes(child, seen, routes);
    }
}

fn flatten_pages<'a>(items: &'a [SidebarItem], pages: &mut Vec<(&'a str, PageRef<'a>)>) {
    for node in items.iter().filter_map(SidebarItem::as_node) {
        if node.source.is_some()
            && let Some(route) = &node.route
        {
            pages.push((
                route.as_str(),
                PageRef {
                    text: &node.text,
                    link: &node.link,
                },
            ));
        }
        flatten_pages(node.items(), pages);
    }
}

fn find_in<'a>(items: &'a [SidebarItem], file_key: &str) -> Option<&'a NavNode> {
    items.iter().filter_map(SidebarItem::as_node).find_map(|node| {
        if node.file_key == file_key {
            Some(node)
        } else {
            find_in(node.items(), file_key)
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::node::{DividerType, NavGroup};

    fn page(key: &str, text: &str, link: &str) -> NavNode {
        NavNode {
            file_key: key.to_owned(),
            text: text.to_owned(),
            link: link.to_owned(),
            tag: None,
            overview_headers: None,
            source: Some(format!("{key}.md")),
            route: Some(link.to_owned()),
            group: None,
        }
    }

    fn group(node: NavNode, items: Vec<SidebarItem>) -> NavNode {
        NavNode {
            group: Some(NavGroup {
                items,
                collapsed: None,
                collapsible: None,
            }),
            ..node
        }
    }

    /// `/guide`: index, a, advanced (group with index: b, pure group: c), divider, d.
    fn model() -> NavModel {
        let pure = NavNode {
            source: None,
            route: None,
            ..group(
                page("guide/advanced/deep", "Deep", "/guide/advanced/deep"),
                vec![SidebarItem::Node(page(
                    "guide/advanced/deep/c",
                    "C",
                    "/guide/advanced/deep/c",
                ))],
            )
        };
        let advanced = group(
            page("guide/advanced/index", "Advanced", "/guide/advanced/"),
            vec![
                SidebarItem::Node(page("guide/advanced/b", "B", "/guide/advanced/b")),
                SidebarItem::Node(pure),
            ],
        );

        let mut sidebar = BTreeMap::new();
        sidebar.insert(
            "/guide".to_owned(),
            vec![
                SidebarItem::Node(page("guide/index", "Guide", "/guide/")),
                SidebarItem::Node(page("guide/a", "A", "/guide/a")),
                SidebarItem::Node(advanced),
                SidebarItem::Divider {
                    divider_type: DividerType::Solid,
                },
                SidebarItem::Node(page("guide/d", "D", "/guide/d")),
            ],
        );
        sidebar.insert(
            "/guide/api".to_owned(),
            vec![SidebarItem::Node(page("guide/api/x", "X", "/guide/api/x"))],
        );

        NavModel {
            nav: vec![NavEntry {
                text: "Guide".to_owned(),
                link: "/guide/".to_owned(),
                active_match: Some("^/guide/".to_owned()),
            }],
            sidebar,
            root_pages: vec![page("index", "Home", "/")],
        }
    }

    #[test]
    fn test_routes_order_and_sources() {
        let links: Vec<String> = model().routes().into_iter().map(|r| r.link).collect();

        assert_eq!(
            links,
            vec![
                "/",
                "/guide/",
                "/guide/a",
                "/guide/advanced/",
                "/guide/advanced/b",
                "/guide/advanced/deep/c",
                "/guide/d",
                "/guide/api/x",
            ]
        );
    }

    #[test]
    fn test_routes_dedup_by_link() {
        let mut model = model();
        model.root_pages.push(page("guide-copy", "Copy", "/guide/a"));

        let routes = model.routes();

        let a: Vec<&Route> = routes.iter().filter(|r| r.link == "/guide/a").collect();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].file_key, "guide-copy");
    }

    #[test]
    fn test_sidebar_for_longest_prefix() {
        let model = model();

        assert_eq!(model.sidebar_for("/guide/a").map(|(p, _)| p), Some("/guide"));
        assert_eq!(model.sidebar_for("/guide").map(|(p, _)| p), Some("/guide"));
        assert_eq!(
            model.sidebar_for("/guide/api/x").map(|(p, _)| p),
            Some("/guide/api")
        );
        assert_eq!(
            model.sidebar_for("/guide/apis").map(|(p, _)| p),
            Some("/guide")
        );
        assert!(model.sidebar_for("/guides").is_none());
        assert!(model.sidebar_for("/").is_none());
    }

    #[test]
    fn test_prev_next() {
        let model = model();

        let pn = model.prev_next("/guide/advanced/b");
        assert_eq!(pn.prev.map(|p| p.link), Some("/guide/advanced/"));
        assert_eq!(pn.next.map(|p| p.link), Some("/guide/advanced/deep/c"));

        let pn = model.prev_next("/guide/advanced/deep/c");
        assert_eq!(pn.next.map(|p| p.text), Some("D"));
    }

    #[test]
    fn test_prev_next_edges_and_trailing_slash() {
        let model = model();

        let first = model.prev_next("/guide");
        assert!(first.prev.is_none());
        assert_eq!(first.next.map(|p| p.link), Some("/guide/a"));

        let last = model.prev_next("/guide/d/");
        assert_eq!(last.prev.map(|p| p.link), Some("/guide/advanced/deep/c"));
        assert!(last.next.is_none());
    }

    #[test]
    fn test_routes_ignore_link_overrides() {
        let mut model = model();
        let items = model.sidebar.get_mut("/guide").unwrap();
        let SidebarItem::Node(a) = &mut items[1] else {
            panic!("expected a node");
        };
        a.link = "https://example.com".to_owned();
        let SidebarItem::Node(d) = &mut items[4] else {
            panic!("expected a node");
        };
        d.link = "/guide/a".to_owned();

        let routes = model.routes();

        assert!(routes.iter().any(|r| r.link == "/guide/a" && r.file_key == "guide/a"));
        assert!(routes.iter().any(|r| r.link == "/guide/d" && r.file_key == "guide/d"));
        assert!(!routes.iter().any(|r| r.link.starts_with("https://")));

        let pn = model.prev_next("/guide/d");
        assert_eq!(pn.prev.map(|p| p.link), Some("/guide/advanced/deep/c"));
        let pn = model.prev_next("/guide/a");
        assert_eq!(pn.prev.map(|p| p.link), Some("/guide/"));
        assert_eq!(pn.next.map(|p| p.link), Some("/guide/advanced/"));
    }

    #[test]
    fn test_prev_next_unknown_link() {
        let model = model();

        assert_eq!(model.prev_next("/"), PrevNext::default());
        assert_eq!(model.prev_next("/guide/missing"), PrevNext::default());
    }

    #[test]
    fn test_find_by_file_key() {
        let model = model();

        assert_eq!(model.find("index").map(|n| n.text.as_str()), Some("Home"));
        assert_eq!(
            model.find("guide/advanced/deep/c").map(|n| n.link.as_str()),
            Some("/guide/advanced/deep/c")
        );
        assert!(model.find("guide/missing").is_none());
    }

    #[test]
    fn test_serialization_shape() {
        let model = NavModel {
            nav: vec![NavEntry {
                text: "Guide".to_owned(),
                link: "/guide/".to_owned(),
                active_match: Some("^/guide/".to_owned()),
            }],
            sidebar: BTreeMap::from([(
                "/guide".to_owned(),
                vec![SidebarItem::Node(page("guide/a", "A", "/guide/a"))],
            )]),
            root_pages: Vec::new(),
        };

        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({
                "nav": [{ "text": "Guide", "link": "/guide/", "activeMatch": "^/guide/" }],
                "sidebar": {
                    "/guide": [{
                        "_fileKey": "guide/a",
                        "text": "A",
                        "link": "/guide/a",
                        "source": "guide/a.md",
                    }],
                },
            })
        );
    }

    #[test]
    fn test_empty_model() {
        assert!(NavModel::default().is_empty());
        assert!(NavModel::default().routes().is_empty());
        assert!(!model().is_empty());
    }
}
