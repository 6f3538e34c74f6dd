//! `docnav check` command implementation.

use clap::Args;

use super::{SourceArgs, resolver_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Hard errors (malformed meta, key collisions, I/O failures) surface as
    /// `Err` and end the process with a non-zero exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or resolution fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.source.load_config()?;

        output.highlight(&format!(
            "Checking navigation in {}",
            config.docs_resolved.source_root().display()
        ));

        let model = resolver_from_config(&config)?.resolve()?;
        if model.is_empty() {
            output.warning("No content found");
            return Ok(());
        }
        if model.nav.is_empty() {
            output.warning("Primary navigation is empty (no root meta file)");
        }

        for (prefix, items) in &model.sidebar {
            output.info(&format!("  {prefix}: {} items", items.len()));
        }
        output.success(&format!(
            "OK: {} sections, {} routes, {} nav entries",
            model.sidebar.len(),
            model.routes().len(),
            model.nav.len()
        ));

        Ok(())
    }
}
