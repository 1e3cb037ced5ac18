use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.getcortexapp.com";
pub const API_KEY_ENV: &str = "CORTEX_API_KEY";
pub const BASE_URL_ENV: &str = "CORTEX_BASE_URL";

#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default)]
    connection: FileConnection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConnection {
    /// Cortex API token
    api_key: Option<String>,

    /// API root (default: https://api.getcortexapp.com)
    base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Apply environment overrides. A variable that is set wins even when empty.
    pub fn resolve(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.resolve(|name| std::env::var(name).ok())
    }

    /// Read the `[connection]` section of a TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let mut config = ConnectionConfig::default();
        if let Some(key) = file.connection.api_key {
            config.api_key = Some(key);
        }
        if let Some(url) = file.connection.base_url {
            config.base_url = url;
        }
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cortex-catalog").join("config.toml"))
    }

    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. `explicit` file, or the user config file when it exists
    ///
    /// An explicit path must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("loading config from {}", path.display());
                    Self::load_file(&path)?
                }
                None => ConnectionConfig::default(),
            },
        };
        Ok(config.with_env_overrides())
    }

    /// The API key, if one is set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().with_context(|| {
            format!(
                "No Cortex API key configured: set {} or api_key under [connection] in the config file",
                API_KEY_ENV
            )
        })
    }
}
