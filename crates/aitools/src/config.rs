use std::path::PathBuf;

use aitools_core::query::DEFAULT_STALE_SECS;
use chrono::Duration;

use crate::prelude::*;

/// Local development backend
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Directory name used under the platform config and cache dirs
const APP_DIR: &str = "aitools";

/// Client configuration resolved from the environment and CLI flags
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub api_url: String,
    pub stale_after: Duration,
    pub offline: bool,
    /// Holds `auth-storage.json`
    pub config_dir: PathBuf,
    /// Holds `queries.json`
    pub cache_dir: PathBuf,
}

impl CatalogConfig {
    /// Defaults rooted at the given directories
    pub fn from_dirs(config_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            stale_after: Duration::seconds(DEFAULT_STALE_SECS),
            offline: false,
            config_dir,
            cache_dir,
        }
    }

    /// Load configuration from the environment.
    ///
    /// `AITOOLS_CONFIG_DIR` and `AITOOLS_CACHE_DIR` override the platform
    /// directories.
    pub fn from_env() -> Result<Self> {
        let config_dir = match std::env::var("AITOOLS_CONFIG_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs_next::config_dir()
                .ok_or_eyre("Unable to determine config directory")?
                .join(APP_DIR),
        };

        let cache_dir = match std::env::var("AITOOLS_CACHE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs_next::cache_dir()
                .ok_or_eyre("Unable to determine cache directory")?
                .join(APP_DIR),
        };

        Ok(Self::from_dirs(config_dir, cache_dir))
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        stale_secs: Option<i64>,
        offline: bool,
    ) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(secs) = stale_secs {
            self.stale_after = Duration::try_seconds(secs.max(0)).unwrap_or(Duration::MAX);
        }
        self.offline = self.offline || offline;
        self
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join("queries.json")
    }
}
