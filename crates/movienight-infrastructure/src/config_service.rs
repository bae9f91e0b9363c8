//! Configuration service implementation.
//!
//! Loads the root configuration from `~/.config/movienight/config.toml`,
//! applies environment overrides, and caches the result.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use movienight_core::MovieNightError;
use movienight_core::config::RootConfig;
use movienight_core::error::Result;

use crate::paths::MovieNightPaths;

/// Environment variable overriding `catalog.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService for the default config file location.
    pub fn new() -> Result<Self> {
        let path = MovieNightPaths::config_file().map_err(|e| MovieNightError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a ConfigService reading a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults. A file that does not parse is a
    /// configuration error.
    pub fn get_config(&self) -> Result<RootConfig> {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_config()?;
        apply_env_overrides(&mut loaded, std::env::var(API_KEY_ENV).ok());

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    /// Directory for the local storage file: the configured one, or the
    /// platform data directory.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = self.get_config()?.storage.dir {
            return Ok(dir);
        }
        MovieNightPaths::data_dir().map_err(|e| MovieNightError::config(e.to_string()))
    }

    fn load_config(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", self.path);
            return Ok(RootConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            MovieNightError::config(format!("Failed to read {:?}: {}", self.path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            MovieNightError::config(format!("Failed to parse {:?}: {}", self.path, e))
        })
    }
}

/// Applies environment overrides. An empty value is ignored.
fn apply_env_overrides(config: &mut RootConfig, api_key: Option<String>) {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.catalog.api_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movienight_core::config::DEFAULT_BASE_URL;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let mut expected = RootConfig::default();
        apply_env_overrides(&mut expected, std::env::var(API_KEY_ENV).ok());
        assert_eq!(service.get_config().unwrap(), expected);
    }

    #[test]
    fn test_reads_file_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [catalog]
            language = "de-DE"

            [storage]
            dir = "/tmp/movienight-test"
            "#,
        )
        .unwrap();
        let service = ConfigService::with_path(path.clone());

        let config = service.get_config().unwrap();
        assert_eq!(config.catalog.language, "de-DE");
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            service.storage_dir().unwrap(),
            PathBuf::from("/tmp/movienight-test")
        );

        // Cached until invalidated
        fs::write(&path, "[catalog]\nlanguage = \"fr-FR\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().catalog.language, "de-DE");
        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().catalog.language, "fr-FR");
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[catalog\napi_key = ").unwrap();

        let err = ConfigService::with_path(path).get_config().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_env_override() {
        let mut config = RootConfig::default();
        apply_env_overrides(&mut config, Some("from-env".to_string()));
        assert_eq!(config.catalog.api_key, "from-env");

        apply_env_overrides(&mut config, Some("  ".to_string()));
        assert_eq!(config.catalog.api_key, "from-env");
    }
}
