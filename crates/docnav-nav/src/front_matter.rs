//! Front matter extraction.
//!
//! Reads the leading `---`-delimited YAML block of a content file. Only the
//! fields navigation needs are decoded; everything else is ignored.

use std::path::Path;
use std::sync::LazyLock;

use docnav_storage::{Storage, StorageErrorKind};
use regex::Regex;
use serde::Deserialize;

use crate::error::ResolveError;

/// First `# Heading` line of a document body.
static H1_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t#]*$").expect("valid H1 regex"));

/// Navigation-relevant front matter fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Badge shown next to the page in the sidebar.
    #[serde(default)]
    pub tag: Option<String>,
    /// Heading levels listed when the page serves as a directory overview.
    #[serde(default)]
    pub overview_headers: Option<Vec<u8>>,
}

/// What navigation knows about one content file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Decoded front matter (default if absent or malformed).
    pub front_matter: FrontMatter,
    /// First H1 heading, only looked up when title extraction is enabled.
    pub heading: Option<String>,
}

impl PageInfo {
    /// Title from front matter, falling back to the first heading.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.front_matter
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.heading.as_deref())
    }
}

/// Split content into its raw front matter block and the body.
///
/// Returns `None` for the block when the content doesn't start with `---` or
/// the block is never closed.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    // An empty block closes immediately
    if let Some(body) = rest.strip_prefix("---") {
        return (Some(""), body);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

/// Parse front matter from file content.
///
/// Missing front matter yields the default. Malformed front matter is logged
/// and also yields the default: it never fails navigation.
#[must_use]
pub fn parse_front_matter(content: &str, path: &Path) -> FrontMatter {
    let (Some(block), _) = split_front_matter(content) else {
        return FrontMatter::default();
    };
    if block.trim().is_empty() {
        return FrontMatter::default();
    }

    match serde_yaml::from_str(block) {
        Ok(front_matter) => front_matter,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse front matter, ignoring");
            FrontMatter::default()
        }
    }
}

/// Extract the first H1 heading of a document body.
#[must_use]
pub fn extract_heading(content: &str) -> Option<String> {
    let (_, body) = split_front_matter(content);
    H1_REGEX
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|t| !t.is_empty())
}

/// Read navigation info for one content file.
///
/// A file that disappeared since it was listed, or whose content isn't valid
/// UTF-8, has no front matter.
///
/// # Errors
///
/// Returns [`ResolveError::Storage`] if the file exists but can't be read.
pub fn read_page_info(
    storage: &dyn Storage,
    path: &Path,
    extract_title: bool,
) -> Result<PageInfo, ResolveError> {
    let content = match storage.read(path) {
        Ok(content) => content,
        Err(e) if e.is_not_found() => return Ok(PageInfo::default()),
        Err(e) if e.kind == StorageErrorKind::InvalidData => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to decode content file, ignoring front matter");
            return Ok(PageInfo::default());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(PageInfo {
        front_matter: parse_front_matter(&content, path),
        heading: if extract_title {
            extract_heading(&content)
        } else {
            None
        },
    })
}

#[cfg(test)]
mod tests {
    use docnav_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(content: &str) -> FrontMatter {
        parse_front_matter(content, Path::new("test.md"))
    }

    #[test]
    fn test_parse_all_fields() {
        let fm = parse("---\ntitle: Guide\ntag: new\noverviewHeaders: [2, 3]\nsidebar: false\n---\n# Body\n");

        assert_eq!(
            fm,
            FrontMatter {
                title: Some("Guide".to_owned()),
                tag: Some("new".to_owned()),
                overview_headers: Some(vec![2, 3]),
            }
        );
    }

    #[test]
    fn test_parse_quoted_title() {
        let fm = parse("---\ntitle: \"Test same name dir in file\"\n---\n");
        assert_eq!(fm.title.as_deref(), Some("Test same name dir in file"));
    }

    #[test]
    fn test_parse_crlf() {
        let fm = parse("---\r\ntitle: Windows\r\n---\r\nBody");
        assert_eq!(fm.title.as_deref(), Some("Windows"));
    }

    #[test]
    fn test_no_front_matter() {
        assert_eq!(parse("# Just a heading\n"), FrontMatter::default());
        assert_eq!(parse(""), FrontMatter::default());
    }

    #[test]
    fn test_unclosed_front_matter_is_ignored() {
        assert_eq!(parse("---\ntitle: Open\n"), FrontMatter::default());
    }

    #[test]
    fn test_empty_front_matter() {
        assert_eq!(parse("---\n---\n# Body"), FrontMatter::default());
    }

    #[test]
    fn test_malformed_front_matter_is_default() {
        assert_eq!(parse("---\ntitle: [broken\n---\n"), FrontMatter::default());
    }

    #[test]
    fn test_extract_heading() {
        assert_eq!(
            extract_heading("Intro\n\n# Getting Started\n\n## Sub"),
            Some("Getting Started".to_owned())
        );
        assert_eq!(
            extract_heading("# Closed heading ##"),
            Some("Closed heading".to_owned())
        );
        assert_eq!(extract_heading("## Only h2"), None);
        assert_eq!(extract_heading("#NoSpace"), None);
    }

    #[test]
    fn test_extract_heading_skips_front_matter() {
        let content = "---\n# not a heading: yes\n---\n# Real\n";
        assert_eq!(extract_heading(content), Some("Real".to_owned()));
    }

    #[test]
    fn test_page_info_title_precedence() {
        let info = PageInfo {
            front_matter: FrontMatter {
                title: Some("From front matter".to_owned()),
                ..Default::default()
            },
            heading: Some("From heading".to_owned()),
        };
        assert_eq!(info.title(), Some("From front matter"));

        let info = PageInfo {
            front_matter: FrontMatter {
                title: Some("  ".to_owned()),
                ..Default::default()
            },
            heading: Some("From heading".to_owned()),
        };
        assert_eq!(info.title(), Some("From heading"));

        assert_eq!(PageInfo::default().title(), None);
    }

    #[test]
    fn test_read_page_info() {
        let storage = MockStorage::new().with_file("a.md", "---\ntag: beta\n---\n# Page A\n");

        let info = read_page_info(&storage, Path::new("a.md"), true).unwrap();
        assert_eq!(info.front_matter.tag.as_deref(), Some("beta"));
        assert_eq!(info.title(), Some("Page A"));

        let info = read_page_info(&storage, Path::new("a.md"), false).unwrap();
        assert_eq!(info.title(), None);
    }

    #[test]
    fn test_read_page_info_missing_file() {
        let storage = MockStorage::new();

        let info = read_page_info(&storage, Path::new("gone.md"), true).unwrap();

        assert_eq!(info, PageInfo::default());
    }

    #[test]
    fn test_read_page_info_undecodable_file() {
        let storage = MockStorage::new()
            .with_file("latin1.md", "")
            .with_failure("latin1.md", StorageErrorKind::InvalidData);

        let info = read_page_info(&storage, Path::new("latin1.md"), true).unwrap();

        assert_eq!(info, PageInfo::default());
    }

    #[test]
    fn test_read_page_info_failure() {
        let storage = MockStorage::new()
            .with_file("a.md", "")
            .with_failure("a.md", StorageErrorKind::PermissionDenied);

        assert!(read_page_info(&storage, Path::new("a.md"), false).is_err());
    }
}
