//! Content operations for Confluence API.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value, json};
use tracing::info;

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{Content, ContentPage};

/// Items requested per listing page.
const PAGE_LIMIT: usize = 50;

impl ConfluenceClient {
    /// Fetch one page of the space listing.
    ///
    /// Without a cursor this requests the first page; otherwise the cursor is
    /// the `next` link of the previous response.
    pub(crate) fn fetch_content_page(
        &self,
        space: &str,
        cursor: Option<&str>,
    ) -> Result<ContentPage, ConfluenceError> {
        let url = match cursor {
            Some(next) => self.resolve_url(next),
            None => self.listing_url(space),
        };

        info!("Fetching content of space {} ({})", space, url);
        self.get_json(&url)
    }

    /// Get content by ID with its version.
    pub(crate) fn get_content(&self, content_id: &str) -> Result<Content, ConfluenceError> {
        let url = format!(
            "{}/content/{}?expand=version",
            self.api_url(),
            encode(content_id)
        );

        info!("Getting content {}", content_id);
        self.get_json(&url)
    }

    /// Find pages in a space by exact title.
    pub(crate) fn search_by_title(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Vec<Content>, ConfluenceError> {
        let url = self.title_search_url(space, title);

        info!("Looking up page '{}' in space {}", title, space);
        let page: ContentPage = self.get_json(&url)?;
        Ok(page.results)
    }

    /// Create a new page under a parent page.
    pub(crate) fn post_page(
        &self,
        title: &str,
        space: &str,
        parent_id: &str,
        body: &str,
    ) -> Result<Content, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        info!(
            "Creating page '{}' in space {} under {}",
            title, space, parent_id
        );
        let created: Content = self.post_json(&url, &create_payload(title, space, parent_id, body))?;
        info!("Created page {} (id={})", created.title, created.id);
        Ok(created)
    }

    /// Write a page body as the given version.
    pub(crate) fn write_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Content, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), encode(page_id));

        let page: Content = self.put_json(&url, &update_payload(page_id, title, body, version))?;
        info!("Updated page {} to version {}", page_id, page.version.number);
        Ok(page)
    }

    fn listing_url(&self, space: &str) -> String {
        format!(
            "{}/space/{}/content/page?expand=version&limit={PAGE_LIMIT}",
            self.api_url(),
            encode(space)
        )
    }

    fn title_search_url(&self, space: &str, title: &str) -> String {
        format!(
            "{}/content?type=page&spaceKey={}&title={}&expand=version",
            self.api_url(),
            encode(space),
            encode(title)
        )
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn storage_body(body: &str) -> Value {
    json!({
        "storage": {
            "value": body,
            "representation": "storage"
        }
    })
}

fn create_payload(title: &str, space: &str, parent_id: &str, body: &str) -> Value {
    json!({
        "type": "page",
        "title": title,
        "space": {"key": space},
        "ancestors": [{"id": parent_id}],
        "body": storage_body(body)
    })
}

fn update_payload(page_id: &str, title: &str, body: &str, version: u32) -> Value {
    json!({
        "id": page_id,
        "type": "page",
        "title": title,
        "body": storage_body(body),
        "version": {"number": version}
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> ConfluenceClient {
        ConfluenceClient::new("https://wiki.example.com", "u", "p")
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(
            client().listing_url("DOC"),
            "https://wiki.example.com/rest/api/space/DOC/content/page?expand=version&limit=50"
        );
    }

    #[test]
    fn test_title_search_url_encodes_title() {
        assert_eq!(
            client().title_search_url("DOC", "Version 1.2.0"),
            "https://wiki.example.com/rest/api/content?type=page&spaceKey=DOC&title=Version%201%2E2%2E0&expand=version"
        );
    }

    #[test]
    fn test_create_payload() {
        let payload = create_payload("Version 2.0", "DOC", "100", "<p>hi</p>");
        assert_eq!(
            payload,
            json!({
                "type": "page",
                "title": "Version 2.0",
                "space": {"key": "DOC"},
                "ancestors": [{"id": "100"}],
                "body": {"storage": {"value": "<p>hi</p>", "representation": "storage"}}
            })
        );
    }

    #[test]
    fn test_update_payload_carries_version() {
        let payload = update_payload("200", "Version 2.0", "<p>hi</p>", 6);
        assert_eq!(payload["version"]["number"], 6);
        assert_eq!(payload["id"], "200");
        assert_eq!(payload["body"]["storage"]["representation"], "storage");
    }
}
