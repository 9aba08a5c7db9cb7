//! Veritas configuration management.
//!
//! Configuration is layered: defaults, then `config.json` in the Veritas home
//! directory, then `VERITAS_*` environment variables. Command-line flags are
//! applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use veritas_client::DEFAULT_SERVER_URL;

use crate::error::ConfigError;

// ============================================================
// CONSTANTS
// ============================================================

/// Configuration file name
pub const CONFIG_FILE: &str = "config.json";

/// Client state file name (holds the theme preference)
pub const STATE_FILE: &str = "state.json";

/// Log directory name
pub const LOGS_DIR: &str = "logs";

/// Overrides the Veritas home directory.
pub const ENV_HOME: &str = "VERITAS_HOME";
pub const ENV_SERVER_URL: &str = "VERITAS_SERVER_URL";
pub const ENV_MODEL_LOADED: &str = "VERITAS_MODEL_LOADED";
pub const ENV_REQUEST_TIMEOUT: &str = "VERITAS_REQUEST_TIMEOUT";

// ============================================================
// TYPES
// ============================================================

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VeritasConfig {
    /// Base URL of the classification backend.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Whether the backend reported its model as loaded. Unset means not
    /// loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_loaded: Option<bool>,

    /// Transport timeout for one analysis request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for VeritasConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            model_loaded: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl VeritasConfig {
    /// Gets the Veritas home directory: `$VERITAS_HOME`, else `~/.veritas`.
    pub fn home_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(home) = std::env::var(ENV_HOME)
            && !home.is_empty()
        {
            return Ok(PathBuf::from(home));
        }
        dirs::home_dir()
            .map(|home| home.join(".veritas"))
            .ok_or(ConfigError::NoHomeDir)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::home_dir()?.join(CONFIG_FILE))
    }

    /// Path of the file holding the theme preference.
    pub fn state_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::home_dir()?.join(STATE_FILE))
    }

    pub fn log_dir() -> Result<PathBuf, ConfigError> {
        Ok(Self::home_dir()?.join(LOGS_DIR))
    }

    /// Loads the config file from the home directory and applies environment
    /// overrides. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Loads configuration from a specific file. A missing file yields
    /// defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `VERITAS_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL).filter(|v| !v.is_empty()) {
            self.server_url = url;
        }
        if let Some(value) = lookup(ENV_MODEL_LOADED) {
            self.model_loaded = Some(parse_bool(ENV_MODEL_LOADED, &value)?);
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_REQUEST_TIMEOUT.to_string(),
                        value: value.clone(),
                    })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Whether analysis is possible at all this session.
    pub fn model_available(&self) -> bool {
        self.model_loaded.unwrap_or(false)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
