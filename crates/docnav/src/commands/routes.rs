//! `docnav routes` command implementation.

use clap::Args;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or resolution fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let model = self.source.resolver()?.resolve()?;

        for route in model.routes() {
            output.data(&format!("{}\t{}", route.link, route.source))?;
        }

        Ok(())
    }
}
