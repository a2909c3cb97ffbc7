//! Confluence content types.

use docdiff_snapshot::SnapshotEntry;
use serde::{Deserialize, Serialize};

/// Confluence content item (page).
///
/// Only includes fields that are actually used.
/// Serde ignores unknown fields from the API response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Content {
    /// Content ID.
    pub id: String,
    /// Content type (always "page" for items we touch).
    #[serde(rename = "type", default = "default_content_type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

fn default_content_type() -> String {
    "page".to_owned()
}

/// Content version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Version message/comment.
    #[serde(default)]
    pub message: Option<String>,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// Markup in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

/// Hypermedia links of a content item.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link.
    #[serde(default)]
    pub webui: Option<String>,
    /// Short link (`/x/AbCd`).
    #[serde(default)]
    pub tinyui: Option<String>,
}

/// One page of a paged listing or search.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPage {
    /// Items on this page.
    pub results: Vec<Content>,
    /// Offset of the first item.
    #[serde(default)]
    pub start: usize,
    /// Number of items on this page.
    #[serde(default)]
    pub size: usize,
    /// Paging links.
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

impl ContentPage {
    /// Continuation reference for the next page, if there is one.
    pub fn next(&self) -> Option<&str> {
        self.links.next.as_deref()
    }
}

/// Paging links of a listing response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    /// Relative link to the next page.
    #[serde(default)]
    pub next: Option<String>,
}

impl From<Content> for SnapshotEntry {
    fn from(content: Content) -> Self {
        let url = content
            .links
            .and_then(|links| links.tinyui.or(links.webui))
            .unwrap_or_default();
        SnapshotEntry {
            id: content.id,
            title: content.title,
            url,
            version: content.version.number,
        }
    }
}
