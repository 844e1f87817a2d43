//! API key storage.
//!
//! The client never touches storage directly; a `CredentialStore` is
//! injected at construction time. `FileCredentialStore` persists the key
//! to a per-user TOML file, `MemoryCredentialStore` keeps it in memory.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::error::TmdbError;

/// Persistent holder of a single API key.
///
/// Writes are last-write-wins and are not coordinated with in-flight reads.
#[allow(clippy::module_name_repetitions)]
pub trait CredentialStore: Debug + Send + Sync {
    /// Returns true if a non-empty key is stored or a fallback is configured.
    fn has_credential(&self) -> bool;

    /// Returns the stored key, falling back to the configured fallback.
    ///
    /// # Errors
    ///
    /// Returns `TmdbError::MissingCredential` if neither is present, or
    /// `TmdbError::Storage` if the backing storage cannot be read and no
    /// fallback is configured.
    fn credential(&self) -> Result<String, TmdbError>;

    /// Trims and stores the key. No format validation happens here.
    ///
    /// # Errors
    ///
    /// Returns `TmdbError::Storage` if the key cannot be persisted.
    fn set_credential(&self, key: &str) -> Result<(), TmdbError>;

    /// Removes the stored key. The fallback is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `TmdbError::Storage` if the backing storage cannot be updated.
    fn clear_credential(&self) -> Result<(), TmdbError>;
}

/// Returns the trimmed key, or `None` if it is blank.
fn non_blank(key: Option<&str>) -> Option<String> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
}

// --- In-memory ---

/// In-memory credential store.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct MemoryCredentialStore {
    key: RwLock<Option<String>>,
    fallback: Option<String>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a fallback key used when nothing is stored.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Option<&str>) -> Self {
        self.fallback = non_blank(fallback);
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn has_credential(&self) -> bool {
        let key = self.key.read().unwrap_or_else(PoisonError::into_inner);
        key.is_some() || self.fallback.is_some()
    }

    fn credential(&self) -> Result<String, TmdbError> {
        let key = self.key.read().unwrap_or_else(PoisonError::into_inner);
        key.clone()
            .or_else(|| self.fallback.clone())
            .ok_or(TmdbError::MissingCredential)
    }

    fn set_credential(&self, key: &str) -> Result<(), TmdbError> {
        let mut slot = self.key.write().unwrap_or_else(PoisonError::into_inner);
        *slot = non_blank(Some(key));
        Ok(())
    }

    fn clear_credential(&self) -> Result<(), TmdbError> {
        let mut slot = self.key.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

// --- File-backed ---

/// On-disk layout of the credential file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Credential store persisted as plain-text TOML.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FileCredentialStore {
    path: PathBuf,
    fallback: Option<String>,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: None,
        }
    }

    /// Sets a fallback key used when the file holds no key.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Option<&str>) -> Self {
        self.fallback = non_blank(fallback);
        self
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the key stored in the file, ignoring the fallback.
    ///
    /// # Errors
    ///
    /// Returns `TmdbError::Storage` if the file exists but cannot be read or parsed.
    pub fn stored_credential(&self) -> Result<Option<String>, TmdbError> {
        Ok(non_blank(self.read_file()?.api_key.as_deref()))
    }

    fn storage_error(&self, message: impl Into<String>) -> TmdbError {
        TmdbError::Storage {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    fn read_file(&self) -> Result<CredentialFile, TmdbError> {
        if !self.path.exists() {
            return Ok(CredentialFile::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| self.storage_error(format!("failed to read: {e}")))?;
        toml::from_str(&content).map_err(|e| self.storage_error(format!("failed to parse: {e}")))
    }

    fn write_file(&self, file: &CredentialFile) -> Result<(), TmdbError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| self.storage_error(format!("failed to create directory: {e}")))?;
        }
        let content = toml::to_string_pretty(file)
            .map_err(|e| self.storage_error(format!("failed to serialize: {e}")))?;
        std::fs::write(&self.path, content)
            .map_err(|e| self.storage_error(format!("failed to write: {e}")))
    }
}

impl CredentialStore for FileCredentialStore {
    fn has_credential(&self) -> bool {
        match self.stored_credential() {
            Ok(Some(_)) => true,
            Ok(None) => self.fallback.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "credential file unreadable");
                self.fallback.is_some()
            }
        }
    }

    fn credential(&self) -> Result<String, TmdbError> {
        match self.stored_credential() {
            Ok(Some(key)) => Ok(key),
            Ok(None) => self.fallback.clone().ok_or(TmdbError::MissingCredential),
            Err(e) => {
                let Some(fallback) = self.fallback.clone() else {
                    return Err(e);
                };
                tracing::warn!(error = %e, "credential file unreadable, using fallback");
                Ok(fallback)
            }
        }
    }

    fn set_credential(&self, key: &str) -> Result<(), TmdbError> {
        let file = CredentialFile {
            api_key: non_blank(Some(key)),
        };
        self.write_file(&file)?;
        tracing::debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    fn clear_credential(&self) -> Result<(), TmdbError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.write_file(&CredentialFile::default())?;
        tracing::debug!(path = %self.path.display(), "credential cleared");
        Ok(())
    }
}
