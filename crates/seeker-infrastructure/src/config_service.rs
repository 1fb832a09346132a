//! Client configuration loading.
//!
//! Resolves the effective [`ClientConfig`]: `config.toml` first, then
//! environment overrides on top.

use seeker_core::Result;
use seeker_core::config::ClientConfig;

use crate::paths::SeekerPaths;
use crate::storage::ConfigStorage;

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "SEEKER_API_URL";
/// Overrides `stream_path`.
pub const ENV_STREAM_PATH: &str = "SEEKER_STREAM_PATH";

pub struct ConfigService {
    storage: ConfigStorage,
}

impl ConfigService {
    pub fn new(paths: &SeekerPaths) -> Result<Self> {
        Ok(Self {
            storage: ConfigStorage::new(paths.config_file()?),
        })
    }

    /// Loads the effective configuration from the file and the process
    /// environment. A missing file yields the defaults.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Like [`ConfigService::load`], with an explicit environment lookup.
    pub fn load_with_env<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.storage.load()?.unwrap_or_default();
        apply_env_overrides(&mut config, lookup);
        tracing::debug!(
            api_base_url = %config.api_base_url,
            stream_path = %config.stream_path,
            "Loaded client config"
        );
        Ok(config)
    }

    /// Writes `config` back to `config.toml`.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.storage.save(config)?;
        Ok(())
    }
}

fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }
    if let Some(path) = lookup(ENV_STREAM_PATH).filter(|v| !v.trim().is_empty()) {
        config.stream_path = path.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seeker_core::config::{DEFAULT_API_BASE_URL, DEFAULT_STREAM_PATH};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(&SeekerPaths::new(Some(temp_dir.path()))).unwrap();

        let config = service.load_with_env(env(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.stream_path, DEFAULT_STREAM_PATH);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(&SeekerPaths::new(Some(temp_dir.path()))).unwrap();
        service
            .save(&ClientConfig {
                api_base_url: "https://from-file.test".into(),
                stream_path: "/file/stream".into(),
                request_timeout_secs: 7,
            })
            .unwrap();

        let config = service
            .load_with_env(env(&[(ENV_API_URL, "https://from-env.test"), (ENV_STREAM_PATH, " ")]))
            .unwrap();
        assert_eq!(config.api_base_url, "https://from-env.test");
        assert_eq!(config.stream_path, "/file/stream");
        assert_eq!(config.request_timeout_secs, 7);
    }
}
