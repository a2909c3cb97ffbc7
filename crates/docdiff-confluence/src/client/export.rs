//! Space export and file download.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use serde_json::json;
use tracing::info;

use super::{ConfluenceClient, checked_body};
use crate::error::ConfluenceError;

/// JSON-RPC endpoint of the remote API service.
const RPC_PATH: &str = "/rpc/json-rpc/confluenceservice-v2";

impl ConfluenceClient {
    /// Ask the server to export a space as PDF.
    ///
    /// Returns the URL of the generated file.
    pub(crate) fn request_export(&self, space: &str) -> Result<String, ConfluenceError> {
        let url = format!("{}{RPC_PATH}/exportSpace", self.base_url);

        info!("Exporting space {} as PDF", space);
        let reference: serde_json::Value = self.post_json(&url, &json!([space, "TYPE_PDF"]))?;
        match reference {
            serde_json::Value::String(reference) => Ok(reference),
            other => Err(ConfluenceError::UnexpectedResponse(format!(
                "export returned {other}"
            ))),
        }
    }

    /// Stream a file into `destination`.
    ///
    /// The destination is created before the request is sent and removed again
    /// if the download fails.
    pub(crate) fn download_to(
        &self,
        reference: &str,
        destination: &Path,
    ) -> Result<u64, ConfluenceError> {
        let mut file = create_new_file(destination)?;
        let url = self.resolve_url(reference);

        info!("Downloading {} to {}", url, destination.display());
        let result = self.stream_into(&url, &mut file);
        if result.is_err() {
            drop(file);
            let _ = std::fs::remove_file(destination);
        }
        result
    }

    fn stream_into(&self, url: &str, file: &mut File) -> Result<u64, ConfluenceError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.authorization)
            .call()?;

        let mut reader = checked_body(response)?.into_reader();
        let written = std::io::copy(&mut reader, file)?;
        file.sync_all()?;
        Ok(written)
    }
}

/// Create `path` for writing, failing if it already exists.
pub(crate) fn create_new_file(path: &Path) -> Result<File, ConfluenceError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(ConfluenceError::LocalConflict(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
