//! Content source abstraction.
//!
//! [`ContentClient`] is the set of remote operations docdiff needs. Required
//! methods are single requests; the provided methods build the paging,
//! unique-title and version-increment contracts on top of them so every
//! implementation shares the same semantics.

use std::path::Path;

use tracing::info;

use crate::error::ConfluenceError;
use crate::pagination::ContentEntries;
use crate::types::{Content, ContentPage};

/// Remote content operations.
pub trait ContentClient {
    /// Fetch one page of a space listing.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// [`ContentPage::next`] reference afterwards.
    fn content_page(&self, space: &str, cursor: Option<&str>)
    -> Result<ContentPage, ConfluenceError>;

    /// Fetch a content item by id, including its version.
    fn get_by_id(&self, content_id: &str) -> Result<Content, ConfluenceError>;

    /// Find all pages in `space` with exactly this title.
    fn find_pages_by_title(&self, space: &str, title: &str)
    -> Result<Vec<Content>, ConfluenceError>;

    /// Create a page under `parent_id`.
    fn create_page(
        &self,
        title: &str,
        space: &str,
        parent_id: &str,
        body: &str,
    ) -> Result<Content, ConfluenceError>;

    /// Write a page body as `version`.
    fn put_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Content, ConfluenceError>;

    /// Start a PDF export of `space` and return the download reference.
    fn export_space(&self, space: &str) -> Result<String, ConfluenceError>;

    /// Stream `reference` into `destination`, which must not exist yet.
    ///
    /// Returns the number of bytes written.
    fn download(&self, reference: &str, destination: &Path) -> Result<u64, ConfluenceError>;

    /// Iterate over every item in `space`, following continuation links.
    fn list_content(&self, space: &str) -> ContentEntries<'_, Self> {
        ContentEntries::new(self, space)
    }

    /// Find the single page titled `title` in `space`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::AmbiguousTitle`] if several pages match.
    fn get_page_by_title(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Option<Content>, ConfluenceError> {
        let mut pages = self.find_pages_by_title(space, title)?;
        match pages.len() {
            0 | 1 => Ok(pages.pop()),
            count => Err(ConfluenceError::AmbiguousTitle {
                space: space.to_owned(),
                title: title.to_owned(),
                count,
            }),
        }
    }

    /// Replace a page body, keeping its title.
    ///
    /// Reads the current version right before writing and stores the body as
    /// the next version. There is no conflict detection: a concurrent edit in
    /// between is overwritten.
    fn update_page(&self, page_id: &str, body: &str) -> Result<Content, ConfluenceError> {
        let current = self.get_by_id(page_id)?;
        let next = current.version.number + 1;
        info!(
            "Updating page {} from version {} to {}",
            page_id, current.version.number, next
        );
        self.put_page(page_id, &current.title, body, next)
    }
}
