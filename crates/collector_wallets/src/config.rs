//! Runtime configuration for the wallet core.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use collector_cache::{CacheStore, FileCache, MemoryCache, ResultCache};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::adapters::{AdapterRegistry, AdapterServices};
use crate::http::ReqwestFetcher;
use crate::wallet::DEFAULT_CURRENCY;

/// Settings stored at `~/.collector/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Upper bound on each outbound HTTP request.
    pub request_timeout_secs: u64,
    /// Fiat currency used when none is requested.
    pub default_currency: String,
    /// Lifetime of in-memory cache entries; `None` keeps them until overwritten.
    pub cache_ttl_secs: Option<u64>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            default_currency: DEFAULT_CURRENCY.into(),
            cache_ttl_secs: Some(300),
        }
    }
}

impl CollectorConfig {
    /// `~/.collector`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".collector"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Results cached between runs of the `collector` binary.
    pub fn cache_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("cache.json"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Registry over an in-memory cache with the configured TTL, for
    /// long-running processes.
    pub fn build_registry(&self) -> Result<AdapterRegistry> {
        self.build_registry_with_store(Arc::new(MemoryCache::new(self.cache_ttl())))
    }

    /// Registry over a [`FileCache`] at `path`, so cached results outlive the
    /// process.
    pub fn build_file_registry(&self, path: &Path) -> Result<AdapterRegistry> {
        self.build_registry_with_store(Arc::new(FileCache::open(path, self.cache_ttl())))
    }

    /// Registry whose adapters share a `reqwest` fetcher with the configured
    /// timeout and `store`.
    pub fn build_registry_with_store(&self, store: Arc<dyn CacheStore>) -> Result<AdapterRegistry> {
        let http = ReqwestFetcher::new(self.request_timeout())
            .context("Failed to build HTTP client")?;
        let cache = ResultCache::new(store);
        Ok(AdapterRegistry::new(AdapterServices::new(Arc::new(http), cache)))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Load config from a JSON file, or return defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<CollectorConfig>(&data) {
                    Ok(config) => return config,
                    Err(e) => warn!("Corrupt config file, using defaults: {e}"),
                },
                Err(e) => warn!("Cannot read config file, using defaults: {e}"),
            }
        }
        Self::default()
    }
}
