//! Loading one environment's config from one app dir.
//!
//! Candidate files are tried in precedence order (see
//! [`crate::paths::candidate_paths`]); the first one that exists wins and
//! must not be empty.

use super::enumerate::is_wildcard;
use super::store::ConfigStore;
use crate::error::{ConfigError, Result};
use crate::format;
use crate::paths::candidate_paths;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-through cache of decoded stores, keyed by resolved file path.
///
/// Entries are never invalidated, so a cache must not outlive writes to the
/// files it holds.
#[derive(Debug, Clone, Default)]
pub struct StoreCache {
    stores: HashMap<PathBuf, ConfigStore>,
}

impl StoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&ConfigStore> {
        self.stores.get(path)
    }

    pub fn insert(&mut self, path: PathBuf, store: ConfigStore) {
        self.stores.insert(path, store);
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

/// A store together with the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub store: ConfigStore,
}

/// Loads config files, optionally through a [`StoreCache`].
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    cache: Option<StoreCache>,
}

impl ConfigLoader {
    /// A loader that reads every file it selects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve repeated loads of the same file from `cache`.
    pub fn with_cache(mut self, cache: StoreCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&StoreCache> {
        self.cache.as_ref()
    }

    /// First candidate path that exists on disk.
    pub fn find_config_file(&self, app_dir: &Path, env: &str) -> Result<PathBuf> {
        if is_wildcard(env) {
            return Err(ConfigError::WildcardEnvironment {
                env: env.to_string(),
            });
        }

        for path in candidate_paths(app_dir, env)? {
            if path.is_file() {
                debug!(path = %path.display(), env = %env, "Selected config file");
                return Ok(path);
            }
        }

        Err(ConfigError::ConfigFileNotFound {
            env: env.to_string(),
            dir: app_dir.to_path_buf(),
        })
    }

    /// Load the config for `env` from `app_dir`.
    pub fn load(&mut self, app_dir: &Path, env: &str) -> Result<LoadedConfig> {
        let path = self.find_config_file(app_dir, env)?;

        if let Some(store) = self.cache.as_ref().and_then(|c| c.get(&path)) {
            debug!(path = %path.display(), "Config cache hit");
            return Ok(LoadedConfig {
                store: store.clone(),
                path,
            });
        }

        let store = Self::read_store(&path)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(path.clone(), store.clone());
        }

        Ok(LoadedConfig { path, store })
    }

    /// Read and decode one file, rejecting whitespace-only content.
    pub fn read_store(path: &Path) -> Result<ConfigStore> {
        let bytes = std::fs::read(path).map_err(|e| ConfigError::io(path, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ConfigError::EmptyConfigFile {
                path: path.to_path_buf(),
            });
        }

        let map = format::decode_file(path, &bytes)?;
        Ok(ConfigStore::from_map(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_env_file_wins_over_json() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "APP_FROM=env\n").unwrap();
        fs::write(temp.path().join("config.json"), r#"{"APP_FROM":"json"}"#).unwrap();

        let loaded = ConfigLoader::new().load(temp.path(), "dev").unwrap();
        assert_eq!(loaded.path, temp.path().join(".env"));
        assert_eq!(loaded.store.get("APP_FROM"), Some("env"));
    }

    #[test]
    fn test_env_specific_json_before_fallback() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), r#"{"APP_FROM":"fallback"}"#).unwrap();
        fs::write(temp.path().join("config.dev.json"), r#"{"APP_FROM":"dev"}"#).unwrap();

        let loaded = ConfigLoader::new().load(temp.path(), "dev").unwrap();
        assert_eq!(loaded.store.get("APP_FROM"), Some("dev"));
    }

    #[test]
    fn test_fallback_only_for_dev() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), r#"{"APP_A":"a"}"#).unwrap();

        assert!(ConfigLoader::new().load(temp.path(), "dev").is_ok());
        let err = ConfigLoader::new().load(temp.path(), "prod").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileNotFound { ref env, .. } if env == "prod"));
    }

    #[test]
    fn test_sh_and_yaml_formats() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".env.prod.sh"),
            "#!/bin/sh\nAPP_MODE=\"prod\"\n",
        )
        .unwrap();
        fs::write(temp.path().join("config.stage.yaml"), "APP_MODE: stage\n").unwrap();

        let mut loader = ConfigLoader::new();
        assert_eq!(loader.load(temp.path(), "prod").unwrap().store.get("APP_MODE"), Some("prod"));
        assert_eq!(loader.load(temp.path(), "stage").unwrap().store.get("APP_MODE"), Some("stage"));
    }

    #[test]
    fn test_empty_file_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.dev.json"), "  \n\t").unwrap();

        let err = ConfigLoader::new().load(temp.path(), "dev").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyConfigFile { .. }));
    }

    #[test]
    fn test_decode_error_names_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.dev.json"), r#"{"APP_A": ["x"]}"#).unwrap();

        let err = ConfigLoader::new().load(temp.path(), "dev").unwrap_err();
        assert!(matches!(err, ConfigError::Decode { .. }));
        assert!(err.to_string().contains("config.dev.json"));
    }

    #[test]
    fn test_wildcard_rejected() {
        let temp = TempDir::new().unwrap();
        let err = ConfigLoader::new().load(temp.path(), "*").unwrap_err();
        assert!(matches!(err, ConfigError::WildcardEnvironment { .. }));
    }

    #[test]
    fn test_cache_serves_second_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.dev.json");
        fs::write(&path, r#"{"APP_A":"first"}"#).unwrap();

        let mut loader = ConfigLoader::new().with_cache(StoreCache::new());
        assert_eq!(loader.load(temp.path(), "dev").unwrap().store.get("APP_A"), Some("first"));

        fs::write(&path, r#"{"APP_A":"second"}"#).unwrap();
        assert_eq!(loader.load(temp.path(), "dev").unwrap().store.get("APP_A"), Some("first"));
        assert_eq!(loader.cache().unwrap().len(), 1);

        // Without a cache the new content is read
        assert_eq!(
            ConfigLoader::new().load(temp.path(), "dev").unwrap().store.get("APP_A"),
            Some("second")
        );
    }
}
