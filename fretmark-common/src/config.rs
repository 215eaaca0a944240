//! Configuration loading and server URL resolution

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the analysis server URL
pub const SERVER_ENV_VAR: &str = "FRETMARK_SERVER";

/// Compiled default: the analysis backend's development bind address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Contents of `~/.config/fretmark/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the analysis server
    pub server_url: Option<String>,
}

impl TomlConfig {
    /// Parse a config file, tolerating a missing file (returns defaults)
    pub fn load(path: &PathBuf) -> Result<TomlConfig> {
        if !path.exists() {
            tracing::debug!("Config file not found: {}", path.display());
            return Ok(TomlConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: String,
}

impl ServerConfig {
    /// Resolve the server base URL in priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. `FRETMARK_SERVER` environment variable
    /// 3. `server_url` in the TOML config file
    /// 4. Compiled default (fallback)
    ///
    /// A missing or unreadable config file never aborts resolution.
    pub fn resolve(cli_arg: Option<&str>) -> ServerConfig {
        if let Some(url) = cli_arg {
            return ServerConfig {
                base_url: normalize(url),
            };
        }

        if let Ok(url) = std::env::var(SERVER_ENV_VAR) {
            if !url.is_empty() {
                return ServerConfig {
                    base_url: normalize(&url),
                };
            }
        }

        if let Some(path) = default_config_path() {
            match TomlConfig::load(&path) {
                Ok(config) => {
                    if let Some(url) = config.server_url {
                        return ServerConfig {
                            base_url: normalize(&url),
                        };
                    }
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable config file: {}", e);
                }
            }
        }

        ServerConfig {
            base_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

/// Platform config file path, `~/.config/fretmark/config.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fretmark").join("config.toml"))
}

/// Strip a trailing slash so endpoint paths can be appended uniformly
fn normalize(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
