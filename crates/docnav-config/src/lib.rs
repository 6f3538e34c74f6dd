//! Configuration management for docnav.
//!
//! Parses `docnav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `docs.base_path`
//! - `docs.root`

mod expand;

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the sub-directory of the source directory to walk.
    pub root: Option<String>,
    /// Override URL base path.
    pub base_path: Option<String>,
    /// Override recognized content extensions.
    pub extensions: Option<Vec<String>>,
    /// Override title extraction from headings.
    pub extract_title: Option<bool>,
    /// Override automatic primary navigation.
    pub auto_nav: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docnav.toml";

/// Default source directory, relative to the config file.
const DEFAULT_SOURCE_DIR: &str = "docs";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    #[serde(default)]
    docs: DocsConfigRaw,
    /// Navigation resolution settings.
    pub navigation: NavigationConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    root: Option<String>,
    base_path: Option<String>,
    extensions: Option<Vec<String>>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Scan root: file keys are relative to it.
    pub source_dir: PathBuf,
    /// Sub-directory of `source_dir` to walk, empty for `source_dir` itself.
    pub root: String,
    /// URL prefix for generated links.
    pub base_path: String,
    /// Recognized content extensions in precedence order.
    pub extensions: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::with_source_dir(PathBuf::from(DEFAULT_SOURCE_DIR))
    }
}

impl DocsConfig {
    fn with_source_dir(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            root: String::new(),
            base_path: "/".to_owned(),
            extensions: default_extensions(),
        }
    }

    /// Directory actually walked: `source_dir` joined with `root`.
    #[must_use]
    pub fn source_root(&self) -> PathBuf {
        if self.root.is_empty() {
            self.source_dir.clone()
        } else {
            self.source_dir.join(&self.root)
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_owned(), "mdx".to_owned()]
}

/// Navigation resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Per-directory meta filename; `.json`, `.yaml` or `.yml`.
    pub meta_filename: String,
    /// Entry name prefixes to ignore.
    pub ignore_prefixes: Vec<String>,
    /// Fall back to the first H1 heading for page titles.
    pub extract_title: bool,
    /// Derive the primary navigation from sections when the root has no meta.
    pub auto_nav: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            meta_filename: "_meta.json".to_owned(),
            ignore_prefixes: vec![".".to_owned(), "_".to_owned()],
            extract_title: false,
            auto_nav: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.base_path`").
        field: String,
        /// Error message (e.g., "${`DOCS_BASE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docnav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(root) = &settings.root {
            self.docs_resolved.root.clone_from(root);
        }
        if let Some(base_path) = &settings.base_path {
            self.docs_resolved.base_path.clone_from(base_path);
        }
        if let Some(extensions) = &settings.extensions {
            self.docs_resolved.extensions.clone_from(extensions);
        }
        if let Some(extract_title) = settings.extract_title {
            self.navigation.extract_title = extract_title;
        }
        if let Some(auto_nav) = settings.auto_nav {
            self.navigation.auto_nav = auto_nav;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            navigation: NavigationConfig::default(),
            docs_resolved: DocsConfig::with_source_dir(base.join(DEFAULT_SOURCE_DIR)),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically at the end of [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_docs()?;
        self.validate_navigation()?;
        Ok(())
    }

    /// Validate docs configuration.
    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;

        if !docs.base_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "docs.base_path must start with '/', got '{}'",
                docs.base_path
            )));
        }

        if docs.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "docs.extensions must list at least one extension".to_owned(),
            ));
        }
        for ext in &docs.extensions {
            require_non_empty(ext.trim_start_matches('.'), "docs.extensions entry")?;
        }

        let escapes = Path::new(&docs.root)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ConfigError::Validation(format!(
                "docs.root must be a relative path inside docs.source_dir, got '{}'",
                docs.root
            )));
        }

        Ok(())
    }

    /// Validate navigation configuration.
    fn validate_navigation(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.navigation.meta_filename, "navigation.meta_filename")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_field(&mut self.docs.base_path, "docs.base_path")?;
        expand::expand_field(&mut self.docs.root, "docs.root")
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = config_dir.join(self.docs.source_dir.as_deref().unwrap_or(DEFAULT_SOURCE_DIR));

        self.docs_resolved = DocsConfig {
            source_dir,
            root: self.docs.root.clone().unwrap_or_default(),
            base_path: self.docs.base_path.clone().unwrap_or_else(|| "/".to_owned()),
            extensions: self.docs.extensions.clone().unwrap_or_else(default_extensions),
        };
    }
}
