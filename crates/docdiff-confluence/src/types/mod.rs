//! Confluence REST API types.

mod content;

pub use content::{Body, Content, ContentPage, Links, PageLinks, Storage, Version};
