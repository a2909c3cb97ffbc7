//! Version history reports for Confluence spaces.
//!
//! At every release the build records a snapshot of the space. When the
//! previous release label is known, the two snapshots are compared and the
//! result is published as a `Version {label}` child page of the space's
//! history page.
//!
//! - [`ReportRenderer`]: renders a [`DiffReport`](docdiff_snapshot::DiffReport)
//!   to Confluence storage format
//! - [`ReportPublisher`]: snapshot, diff and publish workflow

mod render;
pub use render::ReportRenderer;

pub mod workflow;
pub use workflow::{
    PageAction, PublishConfig, PublishError, PublishResult, ReportOutcome, ReportPublisher,
    SnapshotStatus,
};
