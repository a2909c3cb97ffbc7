//! Confluence integration for docdiff.
//!
//! - [`ContentClient`]: the remote operations docdiff relies on, with paging,
//!   unique-title lookup and version-increment updates as provided methods
//! - [`ConfluenceClient`]: sync REST implementation over `ureq`
//! - [`MockContentClient`]: in-memory implementation (behind the `mock` feature)
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), docdiff_confluence::ConfluenceError> {
//! use docdiff_confluence::{ConfluenceClient, ContentClient};
//!
//! let client = ConfluenceClient::new("https://confluence.example.com", "user", "secret");
//!
//! for entry in client.list_content("DOC") {
//!     let entry = entry?;
//!     println!("{} v{}: {}", entry.id, entry.version, entry.title);
//! }
//! # Ok(())
//! # }
//! ```

// API client
mod client;
pub use client::ConfluenceClient;

mod pagination;
pub use pagination::ContentEntries;

mod source;
pub use source::ContentClient;

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::{Call, MockContentClient, MockPage};

// Types
pub mod types;
pub use types::{Content, ContentPage};

// Errors
pub mod error;
pub use error::ConfluenceError;
