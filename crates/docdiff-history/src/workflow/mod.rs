//! Snapshot, diff and publish workflow.
//!
//! [`ReportPublisher`] runs one release end to end:
//!
//! 1. Ensure a snapshot exists for the current label (listing the space only
//!    if none was persisted before)
//! 2. If a previous label is given, load its snapshot and diff the two
//! 3. Render the report and create or update the `Version {label}` page
//!    under the history page
//!
//! With `dry_run` every read still happens, but neither the snapshot file
//! nor the report page is written.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docdiff_confluence::ConfluenceClient;
//! use docdiff_history::{PublishConfig, ReportPublisher};
//! use docdiff_snapshot::SnapshotStore;
//!
//! let client = ConfluenceClient::new("https://confluence.example.com", "user", "secret");
//! let store = SnapshotStore::new("snapshots");
//! let publisher = ReportPublisher::new(&client, &store, PublishConfig::new(client.base_url()));
//!
//! let result = publisher.run("DOC", "2.0.0", Some("1.0.0"))?;
//! if let Some(report) = &result.report {
//!     println!("{}", report.counts);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod result;

pub use error::PublishError;
pub use executor::ReportPublisher;
pub use result::{PageAction, PublishResult, ReportOutcome, SnapshotStatus};

pub use docdiff_config::DEFAULT_HISTORY_TITLE;

/// Configuration for a publish run.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Base URL used for links in the rendered report.
    pub base_url: String,
    /// Title of the existing page that parents the reports.
    pub history_title: String,
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

impl PublishConfig {
    /// Configuration with the default history title and writes enabled.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            history_title: DEFAULT_HISTORY_TITLE.to_owned(),
            dry_run: false,
        }
    }
}
