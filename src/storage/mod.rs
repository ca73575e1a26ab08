//! Persistent per-user storage: the API key and the most recent result.

mod credentials;
mod last_result;

pub use credentials::{CredentialStore, FileCredentialStore, API_KEY_ENV, API_KEY_NAME};
pub use last_result::{LastResultStore, StoredOutcome};

use std::path::PathBuf;

use thiserror::Error;

/// Application directory name under the user's config and data dirs.
const APP_DIR: &str = "ethiscan";

/// Errors from reading or writing stored files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize: {0}")]
    Serialize(String),
}

/// Per-user config directory, e.g. `~/.config/ethiscan`.
/// Falls back gracefully: config dir -> home dir -> current dir.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Per-user data directory, e.g. `~/.local/share/ethiscan`.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Write a file, creating parent directories as needed.
async fn write_file(path: &std::path::Path, contents: &str) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, contents).await.map_err(io_err)
}

/// Read a file, treating "not found" as absent.
async fn read_optional(path: &std::path::Path) -> Result<Option<String>, StorageError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
