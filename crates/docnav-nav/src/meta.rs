//! Per-directory meta declarations.
//!
//! A meta file lists a directory's children in display order, optionally with
//! overrides, dividers, section headers and custom links. It is decoded once
//! into [`MetaDirective`] values; nothing downstream inspects raw fields.
//!
//! # Format
//!
//! A JSON or YAML sequence. Each element is either a plain string (the child's
//! name) or an object:
//!
//! ```json
//! [
//!   "getting-started",
//!   { "name": "advanced", "text": "Advanced topics", "collapsed": true },
//!   { "type": "divider", "dashed": true },
//!   { "type": "section-header", "text": "Reference" },
//!   { "type": "custom-link", "text": "Changelog", "link": "https://example.com" }
//! ]
//! ```
//!
//! `label` is accepted as an alias of `text`. An object with `text` and `link`
//! but neither `name` nor `type` is a custom link.

use std::collections::HashSet;
use std::path::Path;

use docnav_storage::Storage;
use serde::Deserialize;

use crate::error::ResolveError;
use crate::options::{Extensions, ResolveOptions};

/// Error describing malformed meta content.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// JSON syntax or shape error.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML syntax or shape error.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Meta filename has an extension we can't parse.
    #[error("unsupported meta file format '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
    /// Object directive with an unrecognized `type`.
    #[error("unknown directive type '{0}'")]
    UnknownType(String),
    /// Directive that needs a field doesn't have it.
    #[error("directive #{index} ({kind}) requires '{field}'")]
    MissingField {
        /// Zero-based position in the declaration.
        index: usize,
        /// Directive kind.
        kind: &'static str,
        /// Missing field name.
        field: &'static str,
    },
    /// Two directives name the same child.
    #[error("'{0}' is listed more than once")]
    DuplicateName(String),
}

/// Meta file syntax, chosen by the meta filename's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl MetaFormat {
    /// Detect the format of a meta filename.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::UnsupportedFormat`] for any other extension.
    pub fn from_filename(filename: &str) -> Result<Self, MetaError> {
        match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(MetaError::UnsupportedFormat(filename.to_owned())),
        }
    }
}

/// Per-item overrides from a named directive.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overrides {
    /// Display text.
    pub text: Option<String>,
    /// Link target.
    pub link: Option<String>,
    /// Badge.
    pub tag: Option<String>,
    /// Start collapsed.
    pub collapsed: Option<bool>,
    /// Allow collapsing.
    pub collapsible: Option<bool>,
}

impl Overrides {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One decoded meta directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaDirective {
    /// Include the named child with its derived attributes.
    Named(String),
    /// Include the named child with overrides.
    NamedWithOverride {
        /// Child base name (extension stripped).
        name: String,
        /// Attribute overrides.
        overrides: Overrides,
    },
    /// Visual separator.
    Divider {
        /// Dashed instead of solid.
        dashed: bool,
    },
    /// Non-link heading.
    SectionHeader {
        /// Heading text.
        text: String,
        /// Badge.
        tag: Option<String>,
    },
    /// Link to an arbitrary URL.
    CustomLink {
        /// Display text.
        text: String,
        /// Link target, verbatim.
        link: String,
        /// Badge.
        tag: Option<String>,
        /// Regex source marking the link active (root nav only).
        active_match: Option<String>,
    },
}

impl MetaDirective {
    /// Child name referenced by this directive, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) | Self::NamedWithOverride { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Overrides carried by this directive, if any.
    #[must_use]
    pub fn overrides(&self) -> Option<&Overrides> {
        match self {
            Self::NamedWithOverride { overrides, .. } => Some(overrides),
            _ => None,
        }
    }
}

/// Ordered directives loaded from one meta file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetaDeclaration {
    /// Directives in declaration order.
    pub directives: Vec<MetaDirective>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDirective {
    Name(String),
    Object(RawObject),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObject {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    #[serde(alias = "label")]
    text: Option<String>,
    link: Option<String>,
    tag: Option<String>,
    collapsed: Option<bool>,
    collapsible: Option<bool>,
    #[serde(default)]
    dashed: bool,
    active_match: Option<String>,
}

/// Parse meta content.
///
/// Whitespace-only content is an explicit, empty declaration.
///
/// # Errors
///
/// Returns [`MetaError`] if the content is not a sequence of valid directives
/// or names the same child twice.
pub fn parse_meta(
    content: &str,
    format: MetaFormat,
    extensions: &Extensions,
) -> Result<MetaDeclaration, MetaError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(MetaDeclaration::default());
    }

    let raw: Vec<RawDirective> = match format {
        MetaFormat::Json => serde_json::from_str(trimmed)?,
        MetaFormat::Yaml => serde_yaml::from_str(trimmed)?,
    };

    let mut seen = HashSet::new();
    let mut directives = Vec::with_capacity(raw.len());
    for (index, item) in raw.into_iter().enumerate() {
        let directive = decode(index, item, extensions)?;
        if let Some(name) = directive.name()
            && !seen.insert(name.to_owned())
        {
            return Err(MetaError::DuplicateName(name.to_owned()));
        }
        directives.push(directive);
    }

    Ok(MetaDeclaration { directives })
}

fn decode(
    index: usize,
    item: RawDirective,
    extensions: &Extensions,
) -> Result<MetaDirective, MetaError> {
    let obj = match item {
        RawDirective::Name(name) => return named(index, &name, Overrides::default(), extensions),
        RawDirective::Object(obj) => obj,
    };

    let require = |value: Option<String>, kind: &'static str, field: &'static str| {
        value
            .filter(|v| !v.is_empty())
            .ok_or(MetaError::MissingField { index, kind, field })
    };

    match obj.kind.as_deref() {
        Some("divider") => Ok(MetaDirective::Divider { dashed: obj.dashed }),
        Some("section-header") => Ok(MetaDirective::SectionHeader {
            text: require(obj.text, "section-header", "text")?,
            tag: obj.tag,
        }),
        Some("custom-link") => Ok(MetaDirective::CustomLink {
            text: require(obj.text, "custom-link", "text")?,
            link: require(obj.link, "custom-link", "link")?,
            tag: obj.tag,
            active_match: obj.active_match,
        }),
        None if obj.name.is_none() && obj.link.is_some() => Ok(MetaDirective::CustomLink {
            text: require(obj.text, "custom-link", "text")?,
            link: require(obj.link, "custom-link", "link")?,
            tag: obj.tag,
            active_match: obj.active_match,
        }),
        None | Some("file" | "dir") => {
            let name = require(obj.name, "named", "name")?;
            let overrides = Overrides {
                text: obj.text,
                link: obj.link,
                tag: obj.tag,
                collapsed: obj.collapsed,
                collapsible: obj.collapsible,
            };
            named(index, &name, overrides, extensions)
        }
        Some(other) => Err(MetaError::UnknownType(other.to_owned())),
    }
}

fn named(
    index: usize,
    name: &str,
    overrides: Overrides,
    extensions: &Extensions,
) -> Result<MetaDirective, MetaError> {
    let name = extensions.strip(name.trim_end_matches('/'));
    if name.is_empty() {
        return Err(MetaError::MissingField {
            index,
            kind: "named",
            field: "name",
        });
    }
    if overrides.is_empty() {
        Ok(MetaDirective::Named(name.to_owned()))
    } else {
        Ok(MetaDirective::NamedWithOverride {
            name: name.to_owned(),
            overrides,
        })
    }
}

/// Load the meta declaration of a directory.
///
/// Returns `Ok(None)` when the directory has no meta file, meaning "no
/// explicit ordering".
///
/// # Errors
///
/// Returns [`ResolveError::Meta`] if the meta file is malformed, or
/// [`ResolveError::Storage`] if it exists but can't be read. Reads are not
/// retried.
pub fn load_meta(
    storage: &dyn Storage,
    dir: &Path,
    options: &ResolveOptions,
) -> Result<Option<MetaDeclaration>, ResolveError> {
    let path = dir.join(&options.meta_filename);
    let content = match storage.read(&path) {
        Ok(content) => content,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    MetaFormat::from_filename(&options.meta_filename)
        .and_then(|format| parse_meta(&content, format, &options.extensions))
        .map(Some)
        .map_err(|source| ResolveError::Meta { path, source })
}
