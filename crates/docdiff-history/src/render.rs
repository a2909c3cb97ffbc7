//! Diff report rendering to Confluence storage format.

use std::sync::LazyLock;

use docdiff_snapshot::{ChangedEntry, DiffReport, SnapshotEntry};
use quick_xml::escape::escape;
use regex::Regex;

/// Titles of the per-label report pages.
static REPORT_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Version \S+$").unwrap());

/// Title of the report page for `label`.
pub(crate) fn report_title(label: &str) -> String {
    format!("Version {label}")
}

/// Renders a [`DiffReport`] as a Confluence page body.
///
/// Pages that are themselves version reports (the history page and any
/// `Version {label}` page) are left out so a report never lists its own
/// siblings.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    base_url: String,
    history_title: String,
}

impl ReportRenderer {
    /// Create a renderer linking diffs against `base_url`.
    pub fn new(base_url: &str, history_title: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            history_title: history_title.to_owned(),
        }
    }

    /// Whether `title` belongs to a report page.
    pub fn is_report_title(&self, title: &str) -> bool {
        title == self.history_title || REPORT_TITLE_RE.is_match(title)
    }

    /// Drop report pages from every bucket of `report`.
    pub fn visible(&self, report: &DiffReport) -> DiffReport {
        DiffReport {
            changed: report
                .changed
                .iter()
                .filter(|c| !self.is_report_title(&c.current.title))
                .cloned()
                .collect(),
            added: self.visible_entries(&report.added),
            deleted: self.visible_entries(&report.deleted),
        }
    }

    /// Render the report body. Report pages are left out.
    pub fn render(&self, report: &DiffReport, current_label: &str, previous_label: &str) -> String {
        let report = self.visible(report);
        let mut html = String::new();
        html.push_str(&version_table(current_label, previous_label));

        if report.is_empty() {
            html.push_str("<p>No pages changed.</p>");
            return html;
        }

        if !report.changed.is_empty() {
            let rows: Vec<String> = report.changed.iter().map(|c| self.changed_row(c)).collect();
            html.push_str(&section("Changed", &rows));
        }
        if !report.added.is_empty() {
            let rows: Vec<String> = report
                .added
                .iter()
                .map(|e| row(&page_link(&e.title), "added"))
                .collect();
            html.push_str(&section("Added", &rows));
        }
        if !report.deleted.is_empty() {
            let rows: Vec<String> = report
                .deleted
                .iter()
                .map(|e| row(&escape(e.title.as_str()), "deleted"))
                .collect();
            html.push_str(&section("Deleted", &rows));
        }

        html
    }

    fn visible_entries(&self, entries: &[SnapshotEntry]) -> Vec<SnapshotEntry> {
        entries
            .iter()
            .filter(|e| !self.is_report_title(&e.title))
            .cloned()
            .collect()
    }

    fn changed_row(&self, changed: &ChangedEntry) -> String {
        let entry = &changed.current;
        let url = self.diff_url(&entry.id, changed.previous_version, entry.version);
        let link = format!(
            r#"<a href="{}">v{}..v{}</a>"#,
            escape(url.as_str()),
            changed.previous_version,
            entry.version
        );
        row(&page_link(&entry.title), &link)
    }

    /// Confluence page comparing two versions of a page.
    fn diff_url(&self, page_id: &str, previous: u32, current: u32) -> String {
        format!(
            "{}/pages/diffpagesbyversion.action?pageId={page_id}&selectedPageVersions={previous}&selectedPageVersions={current}",
            self.base_url
        )
    }
}

fn version_table(current_label: &str, previous_label: &str) -> String {
    format!(
        "<table><tbody>\
         <tr><th>Current version</th><td>{}</td></tr>\
         <tr><th>Previous version</th><td>{}</td></tr>\
         </tbody></table>",
        escape(current_label),
        escape(previous_label)
    )
}

fn section(heading: &str, rows: &[String]) -> String {
    format!(
        "<h2>{heading}</h2><table><tbody><tr><th>Page</th><th>Change</th></tr>{}</tbody></table>",
        rows.concat()
    )
}

fn row(page: &str, change: &str) -> String {
    format!("<tr><td>{page}</td><td>{change}</td></tr>")
}

fn page_link(title: &str) -> String {
    format!(
        r#"<ac:link><ri:page ri:content-title="{}" /></ac:link>"#,
        escape(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(id: &str, version: u32, title: &str) -> SnapshotEntry {
        SnapshotEntry::new(id, version, title, "")
    }

    fn renderer() -> ReportRenderer {
        ReportRenderer::new("https://wiki.example.com/", "Version History")
    }

    #[test]
    fn test_report_title() {
        assert_eq!(report_title("2.1.0"), "Version 2.1.0");
    }

    #[test]
    fn test_is_report_title() {
        let renderer = renderer();
        assert!(renderer.is_report_title("Version History"));
        assert!(renderer.is_report_title("Version 1.0.0"));
        assert!(!renderer.is_report_title("Version control guide"));
        assert!(!renderer.is_report_title("Installation"));
    }

    #[test]
    fn test_render_changed_links_both_versions() {
        let report = DiffReport {
            changed: vec![ChangedEntry {
                current: entry("42", 3, "Install"),
                previous_version: 2,
            }],
            ..DiffReport::default()
        };

        let html = renderer().render(&report, "2.0", "1.0");

        assert!(html.contains(
            r#"<a href="https://wiki.example.com/pages/diffpagesbyversion.action?pageId=42&amp;selectedPageVersions=2&amp;selectedPageVersions=3">v2..v3</a>"#
        ));
        assert!(html.contains(r#"<ri:page ri:content-title="Install" />"#));
        assert!(html.contains("<h2>Changed</h2>"));
        assert!(!html.contains("<h2>Added</h2>"));
    }

    #[test]
    fn test_render_labels_added_and_deleted() {
        let report = DiffReport {
            added: vec![entry("2", 1, "New page")],
            deleted: vec![entry("3", 4, "Old page")],
            ..DiffReport::default()
        };

        let html = renderer().render(&report, "2.0", "1.0");

        assert!(html.contains(
            r#"<tr><td><ac:link><ri:page ri:content-title="New page" /></ac:link></td><td>added</td></tr>"#
        ));
        assert!(html.contains("<tr><td>Old page</td><td>deleted</td></tr>"));
    }

    #[test]
    fn test_render_version_table() {
        let html = renderer().render(&DiffReport::default(), "2.0", "1.0");
        assert_eq!(
            html,
            "<table><tbody>\
             <tr><th>Current version</th><td>2.0</td></tr>\
             <tr><th>Previous version</th><td>1.0</td></tr>\
             </tbody></table>\
             <p>No pages changed.</p>"
        );
    }

    #[test]
    fn test_render_excludes_report_pages() {
        let report = DiffReport {
            changed: vec![ChangedEntry {
                current: entry("1", 9, "Version History"),
                previous_version: 8,
            }],
            added: vec![entry("2", 1, "Version 1.0")],
            ..DiffReport::default()
        };

        let html = renderer().render(&report, "2.0", "1.0");

        assert!(!html.contains("Version History"));
        assert!(!html.contains(r#"ri:content-title="Version 1.0""#));
        assert!(html.ends_with("<p>No pages changed.</p>"));
    }

    #[test]
    fn test_visible_drops_report_pages_from_all_buckets() {
        let report = DiffReport {
            changed: vec![
                ChangedEntry {
                    current: entry("1", 9, "Version History"),
                    previous_version: 8,
                },
                ChangedEntry {
                    current: entry("5", 2, "Install"),
                    previous_version: 1,
                },
            ],
            added: vec![entry("2", 1, "Version 1.0"), entry("6", 1, "FAQ")],
            deleted: vec![entry("3", 1, "Version 0.9")],
        };

        let visible = renderer().visible(&report);

        assert_eq!(visible.changed.len(), 1);
        assert_eq!(visible.changed[0].current.id, "5");
        assert_eq!(visible.added, vec![entry("6", 1, "FAQ")]);
        assert!(visible.deleted.is_empty());
    }

    #[test]
    fn test_render_escapes_titles() {
        let report = DiffReport {
            added: vec![entry("2", 1, r#"Q&A "FAQ" <draft>"#)],
            ..DiffReport::default()
        };

        let html = renderer().render(&report, "2.0", "1.0");

        assert!(html.contains("Q&amp;A &quot;FAQ&quot; &lt;draft&gt;"));
    }
}
