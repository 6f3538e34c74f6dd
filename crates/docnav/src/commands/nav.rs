//! `docnav nav` command implementation.

use clap::Args;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print JSON on one line.
    #[arg(long)]
    compact: bool,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or resolution fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let model = self.source.resolver()?.resolve()?;

        let json = if self.compact {
            serde_json::to_string(&model)?
        } else {
            serde_json::to_string_pretty(&model)?
        };
        output.data(&json)?;

        Ok(())
    }
}
