//! Link path normalization.
//!
//! All generated links are site-relative: leading slash, no extension, no
//! duplicate slashes. Index pages link to their directory with a trailing
//! slash; plain pages and directory groups never carry one.

use crate::options::Extensions;

/// Normalize a base path to `/segment/.../` form.
///
/// Examples:
/// - `""` -> `"/"`
/// - `"/"` -> `"/"`
/// - `"docs"` -> `"/docs/"`
/// - `"/v2"` -> `"/v2/"`
pub(crate) fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        collapse_slashes(&format!("/{trimmed}/"))
    }
}

/// Link for a content page.
///
/// `rel` is the page path relative to the source root, without extension.
///
/// Examples (base `/`):
/// - `guide/a` -> `/guide/a`
/// - `guide/index` -> `/guide/`
/// - `index` -> `/`
pub(crate) fn page_link(base: &str, rel: &str) -> String {
    if rel == "index" {
        return base.to_owned();
    }
    match rel.strip_suffix("/index") {
        Some(dir) => collapse_slashes(&format!("{base}{dir}/")),
        None => collapse_slashes(&format!("{base}{rel}")),
    }
}

/// Link for a directory group without an index page.
///
/// `rel` is the directory path relative to the source root.
pub(crate) fn dir_link(base: &str, rel: &str) -> String {
    collapse_slashes(&format!("{base}{rel}"))
}

/// Check whether a link points outside the site.
pub(crate) fn is_external(link: &str) -> bool {
    link.contains("://") || link.starts_with("mailto:") || link.starts_with("//")
}

/// Normalize a link given explicitly in a meta file.
///
/// External links are kept verbatim. Internal ones get a leading slash, lose a
/// recognized extension and are placed under `base` unless already there.
pub(crate) fn normalize_override(link: &str, base: &str, extensions: &Extensions) -> String {
    if is_external(link) {
        return link.to_owned();
    }

    let (path, suffix) = match link.find(['#', '?']) {
        Some(pos) => link.split_at(pos),
        None => (link, ""),
    };
    let path = extensions.strip(path);
    let path = collapse_slashes(&format!("/{path}"));

    let path = if base == "/" || path.starts_with(base) || format!("{path}/") == base {
        path
    } else {
        collapse_slashes(&format!("{base}{path}"))
    };
    format!("{path}{suffix}")
}

/// Compare two links as pages, ignoring a trailing slash.
pub(crate) fn same_page(a: &str, b: &str) -> bool {
    let trim = |s: &str| -> String {
        match s.trim_end_matches('/') {
            "" => "/".to_owned(),
            t => t.to_owned(),
        }
    };
    trim(a) == trim(b)
}

/// Collapse runs of `/` into one.
fn collapse_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_slash = false;
    for c in s.chars() {
        let is_slash = c == '/' || c == '\\';
        if !(is_slash && prev_slash) {
            out.push(if is_slash { '/' } else { c });
        }
        prev_slash = is_slash;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(""), "/");
        assert_eq!(normalize_base("/"), "/");
        assert_eq!(normalize_base("docs"), "/docs/");
        assert_eq!(normalize_base("/v2"), "/v2/");
        assert_eq!(normalize_base("/en//guide/"), "/en/guide/");
    }

    #[test]
    fn test_page_link() {
        assert_eq!(page_link("/", "guide/a"), "/guide/a");
        assert_eq!(page_link("/", "guide/index"), "/guide/");
        assert_eq!(page_link("/", "index"), "/");
        assert_eq!(page_link("/v2/", "index"), "/v2/");
        assert_eq!(page_link("/v2/", "guide/index"), "/v2/guide/");
        assert_eq!(page_link("/v2/", "a"), "/v2/a");
    }

    #[test]
    fn test_dir_link() {
        assert_eq!(dir_link("/", "guide/sub"), "/guide/sub");
        assert_eq!(dir_link("/v2/", "guide"), "/v2/guide");
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://example.com"));
        assert!(is_external("mailto:docs@example.com"));
        assert!(is_external("//cdn.example.com/x"));
        assert!(!is_external("/guide/a"));
        assert!(!is_external("guide/a"));
    }

    #[test]
    fn test_normalize_override() {
        let exts = Extensions::default();

        assert_eq!(normalize_override("guide/a.md", "/", &exts), "/guide/a");
        assert_eq!(normalize_override("/guide//a", "/", &exts), "/guide/a");
        assert_eq!(normalize_override("/guide/", "/", &exts), "/guide/");
        assert_eq!(
            normalize_override("https://example.com/a.md", "/", &exts),
            "https://example.com/a.md"
        );
        assert_eq!(normalize_override("/guide/a", "/v2/", &exts), "/v2/guide/a");
        assert_eq!(normalize_override("/v2/guide/a", "/v2/", &exts), "/v2/guide/a");
        assert_eq!(normalize_override("/v2", "/v2/", &exts), "/v2");
        assert_eq!(
            normalize_override("/guide/a.md#setup", "/", &exts),
            "/guide/a#setup"
        );
    }

    #[test]
    fn test_same_page() {
        assert!(same_page("/guide/", "/guide"));
        assert!(same_page("/", "/"));
        assert!(!same_page("/guide/a", "/guide"));
    }

    #[test]
    fn test_collapse_slashes_normalizes_backslashes() {
        assert_eq!(collapse_slashes("/guide\\a"), "/guide/a");
        assert_eq!(collapse_slashes("//a///b"), "/a/b");
    }
}
