//! Cursor-driven listing iterator.

use std::collections::VecDeque;

use docdiff_snapshot::SnapshotEntry;
use tracing::debug;

use crate::error::ConfluenceError;
use crate::source::ContentClient;
use crate::types::Content;

/// Forward-only iterator over all items of a space.
///
/// Requests pages lazily: the next page is fetched only when the items of
/// the previous one are used up, and only while the previous response carried
/// a `next` link. After an error the iterator yields `None`.
pub struct ContentEntries<'a, C: ContentClient + ?Sized> {
    client: &'a C,
    space: String,
    cursor: Option<String>,
    buffered: VecDeque<Content>,
    pages_fetched: usize,
    exhausted: bool,
}

impl<'a, C: ContentClient + ?Sized> ContentEntries<'a, C> {
    pub(crate) fn new(client: &'a C, space: &str) -> Self {
        Self {
            client,
            space: space.to_owned(),
            cursor: None,
            buffered: VecDeque::new(),
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// Number of listing requests made so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl<C: ContentClient + ?Sized> Iterator for ContentEntries<'_, C> {
    type Item = Result<SnapshotEntry, ConfluenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(content) = self.buffered.pop_front() {
                return Some(Ok(content.into()));
            }
            if self.exhausted {
                return None;
            }

            match self.client.content_page(&self.space, self.cursor.as_deref()) {
                Ok(page) => {
                    self.pages_fetched += 1;
                    debug!(
                        space = %self.space,
                        page = self.pages_fetched,
                        items = page.results.len(),
                        "Fetched listing page"
                    );
                    self.cursor = page.links.next;
                    self.exhausted = self.cursor.is_none();
                    self.buffered.extend(page.results);
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
