//! Config directory resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolves the config directory.
///
/// - If `dir` is `Some`, returns it unchanged.
/// - Otherwise returns `~/.config/reelscout`.
fn resolve_config_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.clone());
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home).join(".config").join("reelscout"))
}

/// Resolves the config file path (`{config_dir}/config.toml`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(resolve_config_dir(dir)?.join("config.toml"))
}

/// Resolves the credential file path (`{config_dir}/credentials.toml`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_credentials_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(resolve_config_dir(dir)?.join("credentials.toml"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/myproject");

        // Act
        let config = resolve_config_path(Some(&dir)).unwrap();
        let credentials = resolve_credentials_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(config, PathBuf::from("/tmp/myproject/config.toml"));
        assert_eq!(credentials, PathBuf::from("/tmp/myproject/credentials.toml"));
    }

    #[test]
    fn test_resolve_default() {
        // Arrange & Act
        let config = resolve_config_path(None).unwrap();
        let credentials = resolve_credentials_path(None).unwrap();

        // Assert
        assert!(config.ends_with(".config/reelscout/config.toml"));
        assert!(credentials.ends_with(".config/reelscout/credentials.toml"));
    }
}
