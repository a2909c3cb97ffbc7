//! Confluence REST API client.
//!
//! Provides a sync HTTP client for the Confluence Server/Data Center REST API
//! with HTTP Basic authentication.

mod content;
mod export;

pub(crate) use export::create_new_file;

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::error::ConfluenceError;
use crate::source::ContentClient;
use crate::types::{Content, ContentPage};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    authorization: String,
}

impl ConfluenceClient {
    /// Create a client for `base_url` with the given credentials.
    ///
    /// Credentials are sent as-is in a Basic `Authorization` header.
    pub fn new(base_url: &str, user: &str, password: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            authorization: basic_auth(user, password),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    /// Turn a server-relative reference into an absolute URL.
    fn resolve_url(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_owned()
        } else {
            format!("{}{}", self.base_url, reference)
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ConfluenceError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .call()?;

        Ok(checked_body(response)?.read_json()?)
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T, ConfluenceError> {
        let payload_bytes = serde_json::to_vec(payload)?;
        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.authorization)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        Ok(checked_body(response)?.read_json()?)
    }

    fn put_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T, ConfluenceError> {
        let payload_bytes = serde_json::to_vec(payload)?;
        let response = self
            .agent
            .put(url)
            .header("Authorization", &self.authorization)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        Ok(checked_body(response)?.read_json()?)
    }
}

impl ContentClient for ConfluenceClient {
    fn content_page(
        &self,
        space: &str,
        cursor: Option<&str>,
    ) -> Result<ContentPage, ConfluenceError> {
        self.fetch_content_page(space, cursor)
    }

    fn get_by_id(&self, content_id: &str) -> Result<Content, ConfluenceError> {
        self.get_content(content_id)
    }

    fn find_pages_by_title(
        &self,
        space: &str,
        title: &str,
    ) -> Result<Vec<Content>, ConfluenceError> {
        self.search_by_title(space, title)
    }

    fn create_page(
        &self,
        title: &str,
        space: &str,
        parent_id: &str,
        body: &str,
    ) -> Result<Content, ConfluenceError> {
        self.post_page(title, space, parent_id, body)
    }

    fn put_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
    ) -> Result<Content, ConfluenceError> {
        self.write_page(page_id, title, body, version)
    }

    fn export_space(&self, space: &str) -> Result<String, ConfluenceError> {
        self.request_export(space)
    }

    fn download(&self, reference: &str, destination: &Path) -> Result<u64, ConfluenceError> {
        self.download_to(reference, destination)
    }
}

/// Build a Basic `Authorization` header value.
fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

/// Return the response body, or the error body as [`ConfluenceError::HttpResponse`].
fn checked_body(
    response: ureq::http::Response<ureq::Body>,
) -> Result<ureq::Body, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth() {
        assert_eq!(basic_auth("admin", "admin"), "Basic YWRtaW46YWRtaW4=");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ConfluenceClient::new("https://wiki.example.com/confluence/", "u", "p");
        assert_eq!(client.base_url(), "https://wiki.example.com/confluence");
        assert_eq!(client.api_url(), "https://wiki.example.com/confluence/rest/api");
    }

    #[test]
    fn test_resolve_url() {
        let client = ConfluenceClient::new("https://wiki.example.com", "u", "p");
        assert_eq!(
            client.resolve_url("/rest/api/space/DOC/content/page?start=25"),
            "https://wiki.example.com/rest/api/space/DOC/content/page?start=25"
        );
        assert_eq!(
            client.resolve_url("https://files.example.com/export.pdf"),
            "https://files.example.com/export.pdf"
        );
    }
}
