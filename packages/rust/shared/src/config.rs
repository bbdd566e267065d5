//! Application configuration for MacroFind.
//!
//! User config lives at `~/.macrofind/macrofind.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MacroFindError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "macrofind.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".macrofind";

// ---------------------------------------------------------------------------
// Config structs (matching macrofind.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search collaborator settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Which search backend answers the queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchProvider {
    /// Serper Google Search JSON API.
    #[default]
    Serper,
    /// Google results page, parsed from HTML.
    GoogleHtml,
}

impl std::str::FromStr for SearchProvider {
    type Err = MacroFindError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "serper" => Ok(Self::Serper),
            "google-html" => Ok(Self::GoogleHtml),
            other => Err(MacroFindError::config(format!(
                "unknown search provider '{other}': expected 'serper' or 'google-html'"
            ))),
        }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Backend to use.
    #[serde(default)]
    pub provider: SearchProvider,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Override for the provider endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Results requested per query.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl AppConfig {
    /// Reject values no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 {
            return Err(MacroFindError::config("search.max_results must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::default(),
            api_key_env: default_api_key_env(),
            endpoint: None,
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_api_key_env() -> String {
    "SERPER_API_KEY".into()
}
fn default_max_results() -> usize {
    5
}
fn default_timeout_secs() -> u64 {
    15
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.macrofind/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MacroFindError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.macrofind/macrofind.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MacroFindError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        MacroFindError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| MacroFindError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MacroFindError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MacroFindError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the search API key from the env var named in the config.
///
/// Only the Serper provider needs a key.
pub fn resolve_api_key(config: &SearchConfig) -> Result<Option<String>> {
    if config.provider != SearchProvider::Serper {
        return Ok(None);
    }
    let var_name = &config.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(Some(val)),
        _ => Err(MacroFindError::config(format!(
            "search API key not found. Set the {var_name} environment variable,\n\
             or switch to provider = \"google-html\" in the [search] config section"
        ))),
    }
}
