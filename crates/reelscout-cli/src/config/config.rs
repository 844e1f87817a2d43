//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB API settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// TMDB API configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Overrides the API base URL (e.g. a self-hosted proxy).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Parses the configured base URL, if any.
    ///
    /// A trailing slash is added so relative endpoint paths join under it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is not a valid URL.
    pub fn base_url(&self) -> Result<Option<Url>> {
        let Some(raw) = self.tmdb.base_url.as_deref() else {
            return Ok(None);
        };
        let normalized = if raw.ends_with('/') {
            String::from(raw)
        } else {
            format!("{raw}/")
        };
        let url = Url::parse(&normalized)
            .with_context(|| format!("invalid tmdb.base_url in config: {raw}"))?;
        Ok(Some(url))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.tmdb.base_url.is_none());
        assert!(config.base_url().unwrap().is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            tmdb: TmdbConfig {
                base_url: Some(String::from("http://localhost:8080/3/")),
            },
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                base_url: Some(String::from("http://localhost:8080/3")),
            },
        };

        // Act
        let url = config.base_url().unwrap().unwrap();

        // Assert
        assert_eq!(url.as_str(), "http://localhost:8080/3/");
    }

    #[test]
    fn test_invalid_base_url_is_error() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                base_url: Some(String::from("not a url")),
            },
        };

        // Act
        let result = config.base_url();

        // Assert
        assert!(result.unwrap_err().to_string().contains("invalid tmdb.base_url"));
    }
}
