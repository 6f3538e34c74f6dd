//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod nav;
pub(crate) mod routes;

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use docnav_config::{CliSettings, Config};
use docnav_nav::{Extensions, ResolveOptions, Resolver};
use docnav_storage::FsStorage;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use nav::NavArgs;
pub(crate) use routes::RoutesArgs;

/// Source arguments shared by every command.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover docnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Sub-directory of the source directory to walk (overrides config).
    #[arg(long)]
    root: Option<String>,

    /// URL prefix for generated links (overrides config).
    #[arg(short, long, env = "DOCNAV_BASE_PATH")]
    base_path: Option<String>,

    /// Recognized content extension, highest priority first; repeatable
    /// (overrides config).
    #[arg(short, long = "extension", value_name = "EXT")]
    extensions: Vec<String>,

    /// Enable verbose output (resolution logs and timing).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            root: self.root.clone(),
            base_path: self.base_path.clone(),
            extensions: (!self.extensions.is_empty()).then(|| self.extensions.clone()),
            ..CliSettings::default()
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Load configuration and build a resolver over the source directory.
    pub(crate) fn resolver(&self) -> Result<Resolver, CliError> {
        resolver_from_config(&self.load_config()?)
    }
}

/// Build a filesystem resolver from loaded configuration.
pub(crate) fn resolver_from_config(config: &Config) -> Result<Resolver, CliError> {
    let options = resolve_options(config)?;
    let storage = Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()));
    Ok(Resolver::new(storage, options))
}

/// Map configuration onto resolution options.
fn resolve_options(config: &Config) -> Result<ResolveOptions, CliError> {
    let docs = &config.docs_resolved;
    let nav = &config.navigation;
    Ok(ResolveOptions {
        source_root: normalize_root(&docs.root),
        base_path: docs.base_path.clone(),
        extensions: Extensions::new(&docs.extensions)?,
        meta_filename: nav.meta_filename.clone(),
        ignore_prefixes: nav.ignore_prefixes.clone(),
        extract_title: nav.extract_title,
        auto_nav: nav.auto_nav,
    })
}

/// Drop `.` segments so file keys don't carry them.
fn normalize_root(root: &str) -> PathBuf {
    Path::new(root)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
