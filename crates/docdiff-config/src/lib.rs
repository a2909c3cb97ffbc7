//! Configuration management for docdiff.
//!
//! Parses `docdiff.toml` with serde and provides auto-discovery of the config
//! file in parent directories. CLI settings are applied during load via
//! [`CliSettings`] and always take precedence over file values.
//!
//! ## Environment Variable Expansion
//!
//! The following values support `${VAR}` and `${VAR:-default}`:
//!
//! - `confluence.base_url`
//! - `confluence.user`
//! - `confluence.password`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docdiff.toml";

/// Default title of the page that parents all version reports.
pub const DEFAULT_HISTORY_TITLE: &str = "Version History";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override Confluence user.
    pub user: Option<String>,
    /// Override Confluence password.
    pub password: Option<String>,
    /// Override snapshot directory.
    pub snapshot_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection settings.
    pub confluence: ConfluenceConfig,
    /// Raw history settings (paths as strings from TOML).
    history: HistoryConfigRaw,

    /// Resolved history configuration (set after loading).
    #[serde(skip)]
    pub history_resolved: HistoryConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Confluence connection settings.
///
/// Credentials are opaque strings passed through to the client.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence server base URL.
    pub base_url: String,
    /// User name.
    pub user: String,
    /// Password or personal access token.
    pub password: String,
}

impl ConfluenceConfig {
    /// Validate that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or the URL has
    /// no http(s) scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.user, "confluence.user")?;
        require_non_empty(&self.password, "confluence.password")?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HistoryConfigRaw {
    page_title: Option<String>,
    snapshot_dir: Option<String>,
}

/// Resolved history configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Title of the existing page that parents the per-label reports.
    pub page_title: String,
    /// Directory holding snapshot files.
    pub snapshot_dir: PathBuf,
}

impl HistoryConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            page_title: DEFAULT_HISTORY_TITLE.to_owned(),
            snapshot_dir: base.to_path_buf(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.password`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_PASSWORD`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} is missing (set it in docdiff.toml or on the command line)"
        )));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `docdiff.toml` in the current directory and its parents, falling
    /// back to defaults when none is found.
    ///
    /// File values overridden by `cli_settings` are not expanded, so an unset
    /// `${VAR}` in the file does not fail when the CLI supplies the value.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let no_settings = CliSettings::default();
        let settings = cli_settings.unwrap_or(&no_settings);

        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path, settings)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered, settings)?
        } else {
            Self::default_with_cwd()
        };

        config.apply_cli_settings(settings);
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.confluence.base_url.clone_from(base_url);
        }
        if let Some(user) = &settings.user {
            self.confluence.user.clone_from(user);
        }
        if let Some(password) = &settings.password {
            self.confluence.password.clone_from(password);
        }
        if let Some(snapshot_dir) = &settings.snapshot_dir {
            self.history_resolved.snapshot_dir.clone_from(snapshot_dir);
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Commands that talk to Confluence call this instead of reading the
    /// `confluence` field directly.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if credentials or the URL are missing.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        self.confluence.validate()?;
        Ok(&self.confluence)
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            confluence: ConfluenceConfig::default(),
            history: HistoryConfigRaw::default(),
            history_resolved: HistoryConfig::with_base(base),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path, overrides: &CliSettings) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars(overrides)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values that are always required.
    ///
    /// Confluence credentials are not checked here; see
    /// [`Config::require_confluence`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.history_resolved.page_title, "history.page_title")?;
        if !self.confluence.base_url.is_empty() {
            require_http_url(&self.confluence.base_url, "confluence.base_url")?;
        }
        Ok(())
    }

    /// Expand `${VAR}` references in fields that `overrides` leaves alone.
    fn expand_env_vars(&mut self, overrides: &CliSettings) -> Result<(), ConfigError> {
        let confluence = &mut self.confluence;
        if overrides.base_url.is_none() {
            confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
        }
        if overrides.user.is_none() {
            confluence.user = expand::expand_env(&confluence.user, "confluence.user")?;
        }
        if overrides.password.is_none() {
            confluence.password = expand::expand_env(&confluence.password, "confluence.password")?;
        }
        Ok(())
    }

    /// Resolve the snapshot directory relative to the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.history_resolved = HistoryConfig {
            page_title: self
                .history
                .page_title
                .clone()
                .unwrap_or_else(|| DEFAULT_HISTORY_TITLE.to_owned()),
            snapshot_dir: config_dir.join(self.history.snapshot_dir.as_deref().unwrap_or(".")),
        };
    }
}
