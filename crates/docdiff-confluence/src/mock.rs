//! In-memory content client for testing.
//!
//! Provides [`MockContentClient`] so the snapshot and publish workflow can be
//! exercised without a Confluence server.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::RwLock;

use docdiff_snapshot::SnapshotEntry;

use crate::client::create_new_file;
use crate::error::ConfluenceError;
use crate::source::ContentClient;
use crate::types::{Body, Content, ContentPage, Links, PageLinks, Storage, Version};

const EXPORT_SCHEME: &str = "mock://export/";

/// A remote call recorded by [`MockContentClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// One listing request.
    ContentPage {
        space: String,
        cursor: Option<String>,
    },
    /// Lookup by id.
    GetById(String),
    /// Lookup by title.
    FindByTitle { space: String, title: String },
    /// Page creation.
    Create {
        title: String,
        space: String,
        parent_id: String,
    },
    /// Page body write.
    Put { page_id: String, version: u32 },
    /// Export request.
    Export(String),
    /// File download.
    Download(String),
}

impl Call {
    /// Whether the call modifies remote state.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Create { .. } | Self::Put { .. })
    }
}

/// A page held by the mock.
#[derive(Debug, Clone)]
pub struct MockPage {
    /// Space key.
    pub space: String,
    /// Parent page id, if created with one.
    pub parent_id: Option<String>,
    /// Page content including title and version.
    pub content: Content,
}

impl MockPage {
    /// Stored body in storage format.
    pub fn body(&self) -> &str {
        self.content
            .body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map_or("", |s| s.value.as_str())
    }
}

/// Mock content client.
///
/// Serves space listings in pages of a fixed size with `start=N` cursors,
/// stores created and updated pages in memory, and records every call.
///
/// # Example
///
/// ```ignore
/// use docdiff_confluence::{ContentClient, MockContentClient};
/// use docdiff_snapshot::SnapshotEntry;
///
/// let client = MockContentClient::new()
///     .with_page_size(2)
///     .with_listing("DOC", vec![SnapshotEntry::new("1", 3, "Intro", "/x/A")])
///     .with_page("DOC", "100", "Version History", 1);
///
/// let entries: Vec<_> = client.list_content("DOC").collect();
/// ```
#[derive(Debug)]
pub struct MockContentClient {
    page_size: usize,
    listings: RwLock<HashMap<String, Vec<SnapshotEntry>>>,
    pages: RwLock<Vec<MockPage>>,
    exports: RwLock<HashMap<String, Vec<u8>>>,
    failing_listing_page: RwLock<Option<usize>>,
    calls: RwLock<Vec<Call>>,
    next_id: RwLock<u64>,
}

impl Default for MockContentClient {
    fn default() -> Self {
        Self {
            page_size: 25,
            listings: RwLock::new(HashMap::new()),
            pages: RwLock::new(Vec::new()),
            exports: RwLock::new(HashMap::new()),
            failing_listing_page: RwLock::new(None),
            calls: RwLock::new(Vec::new()),
            next_id: RwLock::new(1000),
        }
    }
}

impl MockContentClient {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of items per listing page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the items listed for `space`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_listing(self, space: impl Into<String>, entries: Vec<SnapshotEntry>) -> Self {
        self.listings.write().unwrap().insert(space.into(), entries);
        self
    }

    /// Add an existing page that title and id lookups can find.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        space: impl Into<String>,
        id: impl Into<String>,
        title: impl Into<String>,
        version: u32,
    ) -> Self {
        self.pages.write().unwrap().push(MockPage {
            space: space.into(),
            parent_id: None,
            content: content(id.into(), title.into(), version, None),
        });
        self
    }

    /// Make the listing request for the zero-based `page_index` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_listing_page(self, page_index: usize) -> Self {
        *self.failing_listing_page.write().unwrap() = Some(page_index);
        self
    }

    /// Make `space` exportable with the given file content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_export(self, space: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.exports.write().unwrap().insert(space.into(), data.into());
        self
    }

    /// All calls made so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.read().unwrap().clone()
    }

    /// Number of listing requests made so far.
    pub fn listing_requests(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ContentPage { .. }))
            .count()
    }

    /// Number of create and update calls made so far.
    pub fn write_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.is_write()).count()
    }

    /// Look up a stored page by title.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn page_titled(&self, title: &str) -> Option<MockPage> {
        self.pages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.content.title == title)
            .cloned()
    }

    fn record(&self, call: Call) {
        self.calls.write().unwrap().push(call);
    }
}

impl ContentClient for MockContentClient {
    fn content_page(
        &self,
        space: &str,
        cursor: Option<&str>,
    ) -> Result<ContentPage, ConfluenceError> {
        self.record(Call::ContentPage {
            space: space.to_owned(),
            cursor: cursor.map(str::to_owned),
        });

        let start = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix("start=")
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or_else(|| ConfluenceError::UnexpectedResponse(format!("bad cursor {c}")))?,
        };

        if *self.failing_listing_page.read().unwrap() == Some(start / self.page_size) {
            return Err(ConfluenceError::HttpResponse {
                status: 503,
                body: "Service Unavailable".to_owned(),
            });
        }

        let listings = self.listings.read().unwrap();
        let Some(all) = listings.get(space) else {
            return Err(ConfluenceError::HttpResponse {
                status: 404,
                body: format!("No space with key : {space}"),
            });
        };

        let end = (start + self.page_size).min(all.len());
        let results: Vec<Content> = all
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|e| {
                let mut c = content(e.id.clone(), e.title.clone(), e.version, None);
                c.links = Some(Links {
                    webui: None,
                    tinyui: Some(e.url.clone()),
                });
                c
            })
            .collect();
        let next = (end < all.len()).then(|| format!("start={end}"));

        Ok(ContentPage {
            size: results.len(),
            results,
            start,
            links: PageLinks { next },
        })
    }

    fn get_by_id(&self, content_id: &str) -> Result<Content, ConfluenceError> {
        self.record(Call::GetById(content_id.to_owned()));
        self.pages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.content.id == content_id)
            .map(|p| p.content.clone())
            .ok_or_else(|| not_found(content_id))
    }

    fn find_pages_by_title(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Vec<Content>, ConfluenceError> {
        self.record(Call::FindByTitle {
            space: space.to_owned(),
            title: title.to_owned(),
        });
        Ok(self
            .pages
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.space == space && p.content.title == title)
            .map(|p| p.content.clone())
            .collect())
    }

    fn create_page(
        &self,
        title: &str,
        space: &str,
        parent_id: &str,
        body: &str,
    ) -> Result<Content, ConfluenceError> {
        self.record(Call::Create {
            title: title.to_owned(),
            space: space.to_owned(),
            parent_id: parent_id.to_owned(),
        });

        let id = {
            let mut next_id = self.next_id.write().unwrap();
            *next_id += 1;
            next_id.to_string()
        };
        let created = content(id, title.to_owned(), 1, Some(body));
        self.pages.write().unwrap().push(MockPage {
            space: space.to_owned(),
            parent_id: Some(parent_id.to_owned()),
            content: created.clone(),
        });
        Ok(created)
    }

    fn put_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Content, ConfluenceError> {
        self.record(Call::Put {
            page_id: page_id.to_owned(),
            version,
        });

        let mut pages = self.pages.write().unwrap();
        let page = pages
            .iter_mut()
            .find(|p| p.content.id == page_id)
            .ok_or_else(|| not_found(page_id))?;

        if version <= page.content.version.number {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: format!(
                    "Version must be incremented on update. Current version is: {}",
                    page.content.version.number
                ),
            });
        }

        page.content = content(page_id.to_owned(), title.to_owned(), version, Some(body));
        Ok(page.content.clone())
    }

    fn export_space(&self, space: &str) -> Result<String, ConfluenceError> {
        self.record(Call::Export(space.to_owned()));
        if self.exports.read().unwrap().contains_key(space) {
            Ok(format!("{EXPORT_SCHEME}{space}"))
        } else {
            Err(not_found(space))
        }
    }

    fn download(&self, reference: &str, destination: &Path) -> Result<u64, ConfluenceError> {
        self.record(Call::Download(reference.to_owned()));
        let data = reference
            .strip_prefix(EXPORT_SCHEME)
            .and_then(|space| self.exports.read().unwrap().get(space).cloned())
            .ok_or_else(|| not_found(reference))?;

        let mut file = create_new_file(destination)?;
        file.write_all(&data)?;
        Ok(data.len() as u64)
    }
}

fn content(id: String, title: String, version: u32, body: Option<&str>) -> Content {
    Content {
        id,
        content_type: "page".to_owned(),
        title,
        version: Version {
            number: version,
            message: None,
        },
        body: body.map(|value| Body {
            storage: Some(Storage {
                value: value.to_owned(),
                representation: "storage".to_owned(),
            }),
        }),
        links: None,
    }
}

fn not_found(what: &str) -> ConfluenceError {
    ConfluenceError::HttpResponse {
        status: 404,
        body: format!("No content found: {what}"),
    }
}
