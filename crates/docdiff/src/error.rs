//! CLI error types.

use docdiff_config::ConfigError;
use docdiff_confluence::ConfluenceError;
use docdiff_history::PublishError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Validation(String),
}
