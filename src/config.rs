//! Configuration for websift

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Crawler configuration
    #[serde(default)]
    pub crawl: CrawlConfig,
    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Crawler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum pages to visit in one crawl; 0 means unlimited
    #[serde(default = "default_page_cap")]
    pub page_cap: usize,
    /// How many times a failing URL is re-queued before being given up on
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default number of results returned
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding crawl snapshots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_page_cap() -> usize {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_user_agent() -> String {
    concat!("websift/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_top_k() -> usize {
    10
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_cap: default_page_cap(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            search: SearchConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields, reporting every violation at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.crawl.user_agent.is_empty() {
            errors.push("user_agent must not be empty".to_string());
        }
        if self.crawl.timeout_secs == 0 {
            errors.push("timeout_secs must be positive".to_string());
        }
        if self.search.top_k == 0 {
            errors.push("top_k must be positive".to_string());
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            errors.push("data_dir must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}
