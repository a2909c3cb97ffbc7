//! CLI command implementations.

mod export;
mod generate;

pub(crate) use export::ExportArgs;
pub(crate) use generate::GenerateArgs;

use std::path::PathBuf;

use clap::Args;
use docdiff_config::{CliSettings, Config};
use docdiff_confluence::ConfluenceClient;

use crate::error::CliError;
use crate::output::Output;

/// Connection options shared by all commands.
#[derive(Args)]
pub(crate) struct ConnectionArgs {
    /// Path to configuration file (default: auto-discover docdiff.toml).
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Confluence base URL (overrides config).
    #[arg(long, global = true)]
    pub(crate) url: Option<String>,

    /// Confluence user (overrides config).
    #[arg(long, global = true)]
    pub(crate) user: Option<String>,

    /// Confluence password or access token (overrides config).
    #[arg(long, global = true, env = "DOCDIFF_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

impl ConnectionArgs {
    /// Load configuration with these options (and `snapshot_dir`) applied on top.
    fn load_config(&self, snapshot_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            base_url: self.url.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            snapshot_dir,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build a client from validated Confluence settings.
fn create_confluence_client(config: &Config, output: &Output) -> Result<ConfluenceClient, CliError> {
    let conf = config.require_confluence().inspect_err(|_| {
        output.info("\nAdd the following to your docdiff.toml:");
        output.info("\n[confluence]");
        output.info(r#"base_url = "https://confluence.example.com""#);
        output.info(r#"user = "${CONFLUENCE_USER}""#);
        output.info(r#"password = "${CONFLUENCE_PASSWORD}""#);
        output.info("\nor pass --url, --user and --password.\n");
    })?;
    Ok(ConfluenceClient::new(
        &conf.base_url,
        &conf.user,
        &conf.password,
    ))
}
