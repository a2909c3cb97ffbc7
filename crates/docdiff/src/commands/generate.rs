//! `docdiff generate` command implementation.

use std::path::PathBuf;

use clap::Args;
use docdiff_history::{
    PageAction, PublishConfig, PublishResult, ReportOutcome, ReportPublisher, SnapshotStatus,
};
use docdiff_snapshot::SnapshotStore;

use super::{ConnectionArgs, create_confluence_client};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Confluence space key.
    pub(crate) space: String,

    /// Label of the release being documented.
    pub(crate) current: String,

    /// Label of the release to compare against.
    #[arg(long)]
    pub(crate) previous: Option<String>,

    /// Directory holding snapshot files (overrides config).
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,

    /// Compute the report without writing the snapshot or the page.
    #[arg(long)]
    pub(crate) dry_run: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is incomplete or the run fails.
    pub(crate) fn execute(self, connection: &ConnectionArgs, output: &Output) -> Result<(), CliError> {
        validate_label("space", &self.space)?;
        validate_label("current label", &self.current)?;
        if let Some(previous) = &self.previous {
            validate_label("previous label", previous)?;
            if *previous == self.current {
                return Err(CliError::Validation(
                    "previous label must differ from the current label".to_owned(),
                ));
            }
        }

        let config = connection.load_config(self.path.clone())?;
        let client = create_confluence_client(&config, output)?;
        let store = SnapshotStore::new(&config.history_resolved.snapshot_dir);

        let publish_config = PublishConfig {
            history_title: config.history_resolved.page_title.clone(),
            dry_run: self.dry_run,
            ..PublishConfig::new(client.base_url())
        };
        let publisher = ReportPublisher::new(&client, &store, publish_config);

        output.info(&format!(
            "Generating version history for {} {}...",
            self.space, self.current
        ));
        let result = publisher.run(&self.space, &self.current, self.previous.as_deref())?;

        if self.dry_run {
            output.notice("\n[DRY RUN] No changes made.");
        }
        print_result(output, &result);
        Ok(())
    }
}

/// Labels end up in file names and page titles.
fn validate_label(what: &str, value: &str) -> Result<(), CliError> {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(CliError::Validation(format!(
            "{what} '{value}' must be non-empty and contain no whitespace or path separators"
        )));
    }
    Ok(())
}

fn print_result(output: &Output, result: &PublishResult) {
    match &result.snapshot {
        SnapshotStatus::Existing(path) => {
            output.info(&format!("Snapshot: {} (existing)", path.display()));
        }
        SnapshotStatus::Written { path, entries } => {
            output.info(&format!(
                "Snapshot: {} ({entries} pages)",
                path.display()
            ));
        }
        SnapshotStatus::Unsaved { entries } => {
            output.info(&format!("Snapshot: not saved ({entries} pages)"));
        }
    }

    match &result.report {
        None => output.notice("No previous version supplied, nothing to diff."),
        Some(report) => print_report(output, report),
    }
}

fn print_report(output: &Output, report: &ReportOutcome) {
    output.info(&format!("Changes (report pages excluded): {}", report.counts));
    match &report.action {
        PageAction::Created { id } => {
            output.success(&format!("\nPage \"{}\" created (ID: {id})", report.title));
        }
        PageAction::Updated { id, version } => {
            output.success(&format!(
                "\nPage \"{}\" updated (ID: {id}, version {version})",
                report.title
            ));
        }
        PageAction::WouldCreate { title } => {
            output.info(&format!("Would create page \"{title}\""));
        }
        PageAction::WouldUpdate { id } => {
            output.info(&format!("Would update page \"{}\" (ID: {id})", report.title));
        }
    }
}
