//! Publish workflow implementation.

use docdiff_confluence::ContentClient;
use docdiff_snapshot::{Snapshot, SnapshotEntry, SnapshotStore, diff};
use tracing::{debug, info};

use crate::render::{ReportRenderer, report_title};

use super::PublishConfig;
use super::error::PublishError;
use super::result::{PageAction, PublishResult, ReportOutcome, SnapshotStatus};

/// Runs the snapshot, diff and publish steps for one release.
pub struct ReportPublisher<'a, C: ContentClient> {
    client: &'a C,
    store: &'a SnapshotStore,
    renderer: ReportRenderer,
    config: PublishConfig,
}

impl<'a, C: ContentClient> ReportPublisher<'a, C> {
    /// Create a publisher.
    #[must_use]
    pub fn new(client: &'a C, store: &'a SnapshotStore, config: PublishConfig) -> Self {
        let renderer = ReportRenderer::new(&config.base_url, &config.history_title);
        Self {
            client,
            store,
            renderer,
            config,
        }
    }

    /// Run the workflow for `current_label`.
    ///
    /// Without `previous_label` only the snapshot step runs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - listing the space or any page lookup or write fails
    /// - the previous snapshot is missing or malformed
    /// - the history page does not exist
    /// - a report title matches more than one page
    pub fn run(
        &self,
        space: &str,
        current_label: &str,
        previous_label: Option<&str>,
    ) -> Result<PublishResult, PublishError> {
        let (snapshot, fresh) = self.ensure_snapshot(space, current_label)?;

        let Some(previous_label) = previous_label else {
            info!("Previous version not supplied, nothing to diff");
            return Ok(PublishResult {
                snapshot,
                report: None,
            });
        };

        let report = self.publish_report(space, current_label, previous_label, fresh)?;
        Ok(PublishResult {
            snapshot,
            report: Some(report),
        })
    }

    /// Make sure a snapshot exists for `(space, label)`.
    ///
    /// An existing snapshot is left alone and the space is not listed. Otherwise
    /// the whole listing is collected before anything is written, so a failed
    /// page request never leaves a partial file. The freshly captured snapshot
    /// is returned for reuse in the same run.
    fn ensure_snapshot(
        &self,
        space: &str,
        label: &str,
    ) -> Result<(SnapshotStatus, Option<Snapshot>), PublishError> {
        if self.store.exists(space, label) {
            let path = self.store.path_for(space, label);
            info!(
                "A snapshot already exists for {} at {}",
                label,
                path.display()
            );
            return Ok((SnapshotStatus::Existing(path), None));
        }

        info!("Capturing snapshot of space {} for version {}", space, label);
        let entries = self
            .client
            .list_content(space)
            .collect::<Result<Vec<SnapshotEntry>, _>>()?;
        let snapshot = Snapshot::new(space, label, entries)?;
        let count = snapshot.len();

        if self.config.dry_run {
            info!("Dry run: not saving snapshot of {} entries", count);
            return Ok((SnapshotStatus::Unsaved { entries: count }, Some(snapshot)));
        }

        let path = self.store.write(&snapshot)?;
        Ok((
            SnapshotStatus::Written {
                path,
                entries: count,
            },
            Some(snapshot),
        ))
    }

    fn publish_report(
        &self,
        space: &str,
        current_label: &str,
        previous_label: &str,
        fresh: Option<Snapshot>,
    ) -> Result<ReportOutcome, PublishError> {
        let previous = self.store.read(space, previous_label)?;
        let current = match fresh {
            Some(snapshot) => snapshot,
            None => self.store.read(space, current_label)?,
        };

        info!("Generating diff report {} -> {}", previous_label, current_label);
        let report = self
            .renderer
            .visible(&diff(current.entries(), previous.entries()));
        let counts = report.counts();
        info!("Diff (report pages excluded): {}", counts);

        let html = self.renderer.render(&report, current_label, previous_label);
        debug!("Generated html: {}", html);

        let history_title = &self.config.history_title;
        let history = self
            .client
            .get_page_by_title(space, history_title)?
            .ok_or_else(|| PublishError::MissingPage {
                space: space.to_owned(),
                title: history_title.clone(),
            })?;

        let title = report_title(current_label);
        let existing = self.client.get_page_by_title(space, &title)?;

        let action = match (existing, self.config.dry_run) {
            (None, true) => {
                info!("Dry run: not creating page '{}'", title);
                PageAction::WouldCreate {
                    title: title.clone(),
                }
            }
            (Some(page), true) => {
                info!("Dry run: not updating page {}", page.id);
                PageAction::WouldUpdate { id: page.id }
            }
            (None, false) => {
                let created = self.client.create_page(&title, space, &history.id, &html)?;
                PageAction::Created { id: created.id }
            }
            (Some(page), false) => {
                let updated = self.client.update_page(&page.id, &html)?;
                PageAction::Updated {
                    id: updated.id,
                    version: updated.version.number,
                }
            }
        };

        Ok(ReportOutcome {
            counts,
            title,
            action,
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use docdiff_confluence::{Call, ConfluenceError, MockContentClient};
    use docdiff_snapshot::{DiffCounts, SnapshotError};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const SPACE: &str = "DOC";

    fn entry(id: &str, version: u32, title: &str) -> SnapshotEntry {
        SnapshotEntry::new(id, version, title, format!("/x/{id}"))
    }

    fn current_listing() -> Vec<SnapshotEntry> {
        vec![
            entry("1", 3, "Install"),
            entry("2", 1, "Upgrade"),
            entry("4", 2, "Reference"),
        ]
    }

    fn previous_snapshot() -> Snapshot {
        Snapshot::new(
            SPACE,
            "1.0",
            vec![
                entry("1", 2, "Install"),
                entry("3", 1, "Legacy"),
                entry("4", 2, "Reference"),
            ],
        )
        .unwrap()
    }

    fn client() -> MockContentClient {
        MockContentClient::new()
            .with_page_size(2)
            .with_listing(SPACE, current_listing())
            .with_page(SPACE, "100", "Version History", 1)
    }

    fn config(dry_run: bool) -> PublishConfig {
        PublishConfig {
            dry_run,
            ..PublishConfig::new("https://wiki.example.com")
        }
    }

    fn store_with_previous(dir: &TempDir) -> SnapshotStore {
        let store = SnapshotStore::new(dir.path());
        store.write(&previous_snapshot()).unwrap();
        store
    }

    fn expected_counts() -> DiffCounts {
        DiffCounts {
            changed: 1,
            added: 1,
            deleted: 1,
        }
    }

    #[test]
    fn test_snapshot_only_without_previous() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let client = client();

        let result = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", None)
            .unwrap();

        assert_eq!(
            result.snapshot,
            SnapshotStatus::Written {
                path: store.path_for(SPACE, "2.0"),
                entries: 3,
            }
        );
        assert!(result.report.is_none());
        assert_eq!(store.read(SPACE, "2.0").unwrap().entries(), current_listing());
        assert_eq!(client.listing_requests(), 2);
        assert_eq!(client.write_calls(), 0);
    }

    #[test]
    fn test_existing_snapshot_is_not_regenerated() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let first = client();
        ReportPublisher::new(&first, &store, config(false))
            .run(SPACE, "2.0", None)
            .unwrap();
        let bytes = fs::read(store.path_for(SPACE, "2.0")).unwrap();

        let second = client();
        let result = ReportPublisher::new(&second, &store, config(false))
            .run(SPACE, "2.0", None)
            .unwrap();

        assert_eq!(
            result.snapshot,
            SnapshotStatus::Existing(store.path_for(SPACE, "2.0"))
        );
        assert!(second.calls().is_empty());
        assert_eq!(fs::read(store.path_for(SPACE, "2.0")).unwrap(), bytes);
    }

    #[test]
    fn test_failed_listing_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let client = client().with_failing_listing_page(1);

        let err = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", None)
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Confluence(ConfluenceError::HttpResponse { status: 503, .. })
        ));
        assert!(!store.exists(SPACE, "2.0"));
    }

    #[test]
    fn test_duplicate_ids_in_listing_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let client = MockContentClient::new().with_listing(
            SPACE,
            vec![entry("1", 1, "A"), entry("1", 2, "A copy")],
        );

        let err = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", None)
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Snapshot(SnapshotError::DuplicateId { .. })
        ));
        assert!(!store.exists(SPACE, "2.0"));
    }

    #[test]
    fn test_first_publish_creates_report_page() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let client = client();

        let result = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap();

        let report = result.report.unwrap();
        assert_eq!(report.counts, expected_counts());
        assert_eq!(report.title, "Version 2.0");

        let page = client.page_titled("Version 2.0").unwrap();
        assert_eq!(report.action, PageAction::Created {
            id: page.content.id.clone()
        });
        assert_eq!(page.parent_id.as_deref(), Some("100"));
        assert_eq!(page.body(), report.html);
        assert!(page.body().contains("selectedPageVersions=2&amp;selectedPageVersions=3"));
        assert_eq!(client.write_calls(), 1);
    }

    #[test]
    fn test_republish_updates_report_page() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let client = client();
        let publisher = ReportPublisher::new(&client, &store, config(false));

        publisher.run(SPACE, "2.0", Some("1.0")).unwrap();
        let first_listing = client.listing_requests();
        let result = publisher.run(SPACE, "2.0", Some("1.0")).unwrap();

        let page = client.page_titled("Version 2.0").unwrap();
        assert_eq!(
            result.report.unwrap().action,
            PageAction::Updated {
                id: page.content.id.clone(),
                version: 2,
            }
        );
        assert_eq!(client.listing_requests(), first_listing);
        assert_eq!(
            client.calls().last(),
            Some(&Call::Put {
                page_id: page.content.id,
                version: 2,
            })
        );
    }

    #[test]
    fn test_dry_run_writes_nothing_but_reports_counts() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let client = client();

        let result = ReportPublisher::new(&client, &store, config(true))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap();

        assert_eq!(result.snapshot, SnapshotStatus::Unsaved { entries: 3 });
        let report = result.report.unwrap();
        assert_eq!(report.counts, expected_counts());
        assert_eq!(
            report.action,
            PageAction::WouldCreate {
                title: "Version 2.0".to_owned()
            }
        );
        assert_eq!(client.write_calls(), 0);
        assert!(!store.exists(SPACE, "2.0"));

        let lookups: Vec<_> = client
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::FindByTitle { .. }))
            .collect();
        assert_eq!(lookups.len(), 2);
    }

    #[test]
    fn test_dry_run_matches_real_run_counts() {
        let dry_dir = TempDir::new().unwrap();
        let dry_store = store_with_previous(&dry_dir);
        let dry_client = client();
        let dry = ReportPublisher::new(&dry_client, &dry_store, config(true))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap();

        let real_dir = TempDir::new().unwrap();
        let real_store = store_with_previous(&real_dir);
        let real_client = client();
        let real = ReportPublisher::new(&real_client, &real_store, config(false))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap();

        let dry = dry.report.unwrap();
        let real = real.report.unwrap();
        assert_eq!(dry.counts, real.counts);
        assert_eq!(dry.html, real.html);
    }

    #[test]
    fn test_dry_run_with_existing_page_would_update() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let client = client().with_page(SPACE, "200", "Version 2.0", 5);

        let result = ReportPublisher::new(&client, &store, config(true))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap();

        assert_eq!(
            result.report.unwrap().action,
            PageAction::WouldUpdate {
                id: "200".to_owned()
            }
        );
        assert_eq!(client.write_calls(), 0);
    }

    #[test]
    fn test_counts_exclude_report_pages() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let mut listing = current_listing();
        listing.push(entry("100", 1, "Version History"));
        listing.push(entry("101", 1, "Version 1.0"));
        let client = MockContentClient::new()
            .with_listing(SPACE, listing)
            .with_page(SPACE, "100", "Version History", 1);

        let report = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap()
            .report
            .unwrap();

        assert_eq!(report.counts, expected_counts());
        assert!(!report.html.contains(r#"ri:content-title="Version 1.0""#));
    }

    #[test]
    fn test_only_report_pages_changed() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        store
            .write(&Snapshot::new(SPACE, "1.0", vec![entry("1", 3, "Install")]).unwrap())
            .unwrap();
        let client = MockContentClient::new()
            .with_listing(
                SPACE,
                vec![entry("1", 3, "Install"), entry("101", 1, "Version 1.0")],
            )
            .with_page(SPACE, "100", "Version History", 1);

        let report = ReportPublisher::new(&client, &store, config(true))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap()
            .report
            .unwrap();

        assert_eq!(report.counts, DiffCounts::default());
        assert!(report.html.ends_with("<p>No pages changed.</p>"));
    }

    #[test]
    fn test_missing_previous_snapshot_is_fatal() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let client = client();

        let err = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Snapshot(SnapshotError::NotFound(_))
        ));
        assert_eq!(client.write_calls(), 0);
    }

    #[test]
    fn test_missing_history_page_is_fatal() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let client = MockContentClient::new().with_listing(SPACE, current_listing());

        let err = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap_err();

        assert!(matches!(err, PublishError::MissingPage { ref title, .. } if title == "Version History"));
        assert!(err.to_string().contains("Version History"));
        assert_eq!(client.write_calls(), 0);
    }

    #[test]
    fn test_ambiguous_report_page_is_fatal() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let client = client()
            .with_page(SPACE, "200", "Version 2.0", 1)
            .with_page(SPACE, "201", "Version 2.0", 1);

        let err = ReportPublisher::new(&client, &store, config(false))
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Confluence(ConfluenceError::AmbiguousTitle { count: 2, .. })
        ));
        assert_eq!(client.write_calls(), 0);
    }

    #[test]
    fn test_custom_history_title() {
        let dir = TempDir::new().unwrap();
        let store = store_with_previous(&dir);
        let client = MockContentClient::new()
            .with_listing(SPACE, current_listing())
            .with_page(SPACE, "300", "Release Notes", 1);
        let config = PublishConfig {
            history_title: "Release Notes".to_owned(),
            ..config(false)
        };

        ReportPublisher::new(&client, &store, config)
            .run(SPACE, "2.0", Some("1.0"))
            .unwrap();

        let page = client.page_titled("Version 2.0").unwrap();
        assert_eq!(page.parent_id.as_deref(), Some("300"));
    }
}
