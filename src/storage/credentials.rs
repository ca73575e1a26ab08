//! API key storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tokio::io::AsyncWriteExt;

use super::{config_dir, read_optional, StorageError};

/// Name of the stored secret.
pub const API_KEY_NAME: &str = "geminiApiKey";

/// Environment variable that takes precedence over the stored key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const CREDENTIALS_FILE: &str = "credentials.toml";

/// Read-only access to the scoring API key.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The stored key, or `None` when none is configured.
    async fn api_key(&self) -> Result<Option<String>, StorageError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Credentials {
    #[serde(rename = "geminiApiKey", default, skip_serializing_if = "Option::is_none")]
    gemini_api_key: Option<String>,
}

/// TOML file holding the API key.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    env_override: bool,
}

impl FileCredentialStore {
    /// Store in the user's config directory, honouring `GEMINI_API_KEY`.
    pub fn default_location() -> Self {
        Self {
            path: config_dir().join(CREDENTIALS_FILE),
            env_override: true,
        }
    }

    /// Store at an explicit path, ignoring the environment.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_override: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key from the file only, ignoring the environment.
    pub async fn stored_key(&self) -> Result<Option<String>, StorageError> {
        let Some(contents) = read_optional(&self.path).await? else {
            return Ok(None);
        };
        let creds: Credentials = toml::from_str(&contents).map_err(|e| StorageError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(creds.gemini_api_key.filter(|k| !k.is_empty()))
    }

    /// Save the API key, replacing any previous one.
    pub async fn set_api_key(&self, key: &str) -> Result<(), StorageError> {
        let creds = Credentials {
            gemini_api_key: Some(key.trim().to_string()),
        };
        let contents =
            toml::to_string(&creds).map_err(|e| StorageError::Serialize(e.to_string()))?;
        write_secret(&self.path, &contents)
            .await
            .map_err(|source| StorageError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!("Saved API key to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored key.
    pub async fn clear(&self) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn api_key(&self) -> Result<Option<String>, StorageError> {
        if self.env_override {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                if !key.is_empty() {
                    debug!("Using API key from {}", API_KEY_ENV);
                    return Ok(Some(key));
                }
            }
        }
        self.stored_key().await
    }
}

/// Write a file readable only by its owner, creating parent directories.
async fn write_secret(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    // mode only applies on creation; tighten files that already existed
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    file.write_all(contents.as_bytes()).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::at(dir.path().join("credentials.toml"));
        assert_eq!(store.api_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_read_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::at(dir.path().join("nested/credentials.toml"));

        store.set_api_key("  abc123 ").await.unwrap();
        assert_eq!(store.api_key().await.unwrap().as_deref(), Some("abc123"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(API_KEY_NAME));

        assert!(store.clear().await.unwrap());
        assert!(!store.clear().await.unwrap());
        assert_eq!(store.api_key().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileCredentialStore::at(&path);
        store.set_api_key("abc").await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let fresh = FileCredentialStore::at(dir.path().join("new/credentials.toml"));
        fresh.set_api_key("abc").await.unwrap();
        let mode = std::fs::metadata(fresh.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_empty_key_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "geminiApiKey = \"\"\n").unwrap();
        assert_eq!(FileCredentialStore::at(path).api_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "geminiApiKey = ").unwrap();
        assert!(matches!(
            FileCredentialStore::at(path).api_key().await,
            Err(StorageError::Parse { .. })
        ));
    }
}
