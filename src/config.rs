use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_CHANNEL_INFOS, DEFAULT_MAX_TRACKED_CONVERSATIONS,
    DEFAULT_PAGE_SIZE,
};

/// Environment variable that overrides `api.token`
pub const TOKEN_ENV_VAR: &str = "SWITCHBOARD_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Fixed REST page size used for every tab
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Restrict the "all" tab to recently completed conversations
    #[serde(default = "default_true")]
    pub only_recently_completed: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            only_recently_completed: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Bound on identities held by the realtime cache
    #[serde(default = "default_max_tracked_conversations")]
    pub max_tracked_conversations: u64,
    #[serde(default = "default_max_channel_infos")]
    pub max_channel_infos: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_tracked_conversations: default_max_tracked_conversations(),
            max_channel_infos: default_max_channel_infos(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_tracked_conversations() -> u64 {
    DEFAULT_MAX_TRACKED_CONVERSATIONS
}

fn default_max_channel_infos() -> u64 {
    DEFAULT_MAX_CHANNEL_INFOS
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("switchboard");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at {}\n\
                 Please create a config file. Example:\n\n\
                 [api]\n\
                 base_url = \"https://support.example.com/v1\"\n\n\
                 [sync]\n\
                 page_size = 20",
                path.display()
            );
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            config.api.token = Some(token);
        }

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.sync.page_size == 0 {
            anyhow::bail!("sync.page_size must be greater than zero");
        }
        Ok(config)
    }

    /// Create the config directory, which also holds the log file.
    pub fn ensure_dirs() -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}
