//! Runtime configuration.
//!
//! Built from defaults, then overridden by environment variables:
//!
//! | Variable                      | Field            | Default                   |
//! |-------------------------------|------------------|---------------------------|
//! | `KEYWARD_API_URL`             | `api_base_url`   | `https://api.hypixel.net` |
//! | `KEYWARD_DATA_DIR`            | `data_dir`       | `~/.keyward`              |
//! | `KEYWARD_PROMPT_TIMEOUT_SECS` | `prompt_timeout` | 30 seconds                |

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::adapters::FileKeyStore;
use crate::error::StorageError;
use crate::key::prompt::DEFAULT_PROMPT_TIMEOUT;
use crate::key::DEFAULT_API_URL;

pub const ENV_API_URL: &str = "KEYWARD_API_URL";
pub const ENV_DATA_DIR: &str = "KEYWARD_DATA_DIR";
pub const ENV_PROMPT_TIMEOUT_SECS: &str = "KEYWARD_PROMPT_TIMEOUT_SECS";

/// Configuration for the key manager.
///
/// # Example
///
/// ```ignore
/// use keyward::config::Config;
///
/// let config = Config::default()
///     .with_api_base_url("http://localhost:8080")
///     .with_prompt_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the remote authority
    pub api_base_url: String,
    /// Directory holding the key record (default: `~/.keyward`)
    pub data_dir: Option<PathBuf>,
    /// How long features wait for a key
    pub prompt_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            prompt_timeout: DEFAULT_PROMPT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_prompt_timeout(mut self, timeout: Duration) -> Self {
        self.prompt_timeout = timeout;
        self
    }

    /// Defaults overridden by `KEYWARD_*` environment variables.
    ///
    /// An unparseable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                config = config.with_api_base_url(url);
            }
        }

        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.is_empty() {
                config = config.with_data_dir(dir);
            }
        }

        if let Ok(secs) = std::env::var(ENV_PROMPT_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(secs) => config = config.with_prompt_timeout(Duration::from_secs(secs)),
                Err(e) => warn!(
                    value = %secs,
                    error = %e,
                    "Ignoring invalid {}",
                    ENV_PROMPT_TIMEOUT_SECS
                ),
            }
        }

        config
    }

    /// The key store for the configured data directory.
    pub fn key_store(&self) -> Result<FileKeyStore, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(FileKeyStore::in_dir(dir)),
            None => FileKeyStore::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_DATA_DIR);
        std::env::remove_var(ENV_PROMPT_TIMEOUT_SECS);
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.api_base_url, "https://api.hypixel.net");
        assert_eq!(config.data_dir, None);
        assert_eq!(config.prompt_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_api_base_url("http://localhost:1234")
            .with_data_dir("/tmp/keyward-test")
            .with_prompt_timeout(Duration::from_secs(5));

        assert_eq!(config.api_base_url, "http://localhost:1234");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/keyward-test")));
        assert_eq!(config.prompt_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_key_store_uses_data_dir() {
        let config = Config::default().with_data_dir("/tmp/keyward-test");
        let store = config.key_store().unwrap();
        assert_eq!(
            store.record_path(),
            PathBuf::from("/tmp/keyward-test/localdata.json")
        );
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var(ENV_API_URL, "http://localhost:9999");
        std::env::set_var(ENV_DATA_DIR, "/tmp/keyward-env");
        std::env::set_var(ENV_PROMPT_TIMEOUT_SECS, "7");

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.api_base_url, "http://localhost:9999");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/keyward-env")));
        assert_eq!(config.prompt_timeout, Duration::from_secs(7));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout_falls_back() {
        clear_env();
        std::env::set_var(ENV_PROMPT_TIMEOUT_SECS, "soon");

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.prompt_timeout, DEFAULT_PROMPT_TIMEOUT);
    }

    #[test]
    #[serial]
    fn test_from_env_empty_is_default() {
        clear_env();
        assert_eq!(Config::from_env(), Config::default());
    }
}
