//! `docdiff export` command implementation.

use std::path::PathBuf;

use clap::Args;
use docdiff_confluence::ContentClient;

use super::{ConnectionArgs, create_confluence_client};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Confluence space key.
    pub(crate) space: String,

    /// File to write the PDF to. Must not exist yet.
    pub(crate) destination: PathBuf,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination exists, configuration is incomplete,
    /// or the export or download fails.
    pub(crate) fn execute(self, connection: &ConnectionArgs, output: &Output) -> Result<(), CliError> {
        if self.destination.exists() {
            return Err(CliError::Validation(format!(
                "destination {} already exists",
                self.destination.display()
            )));
        }

        let config = connection.load_config(None)?;
        let client = create_confluence_client(&config, output)?;

        output.info(&format!("Exporting space {}...", self.space));
        let reference = client.export_space(&self.space)?;
        let bytes = client.download(&reference, &self.destination)?;

        output.success(&format!(
            "\nExported {} ({bytes} bytes)",
            self.destination.display()
        ));
        Ok(())
    }
}
