//! Local storage for per-visitor client state.
//!
//! The cart, wishlist and customer session each persist as one JSON value
//! under a fixed key. [`LocalStorage`] abstracts where those values live:
//!
//! - [`MemoryStorage`] - process memory, shared between clones
//! - [`FileStorage`] - one `<key>.json` file per key in a directory
//! - [`tower_sessions::Session`] - the visitor's HTTP session, which gives
//!   every storefront visitor their own storage
//!
//! Writes are last-writer-wins; nothing coordinates concurrent writers.

use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_sessions::Session;

/// Storage keys used by the storefront stores.
pub mod keys {
    /// Key for the signed-in customer session.
    pub const SESSION: &str = "fernhouse.session";

    /// Key for the cart line items.
    pub const CART: &str = "fernhouse.cart";

    /// Key for the wishlist items.
    pub const WISHLIST: &str = "fernhouse.wishlist";
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a storage file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded.
    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// The visitor session rejected the operation.
    #[error("session storage error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The key cannot be used as a file name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A key/value store of JSON values.
pub trait LocalStorage: Send + Sync {
    /// Read the value under `key`, if any.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<Value>, StorageError>> + Send;

    /// Replace the value under `key`.
    fn save(&self, key: &str, value: Value) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage. Clones share the same values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for storage files. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(key)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, path = %path.display(), error = %e, "Ignoring unreadable storage file");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let bytes = serde_json::to_vec(&value)?;
        let dir = self.dir.clone();

        // Each write gets its own temp file, then replaces the key's file
        // in one rename; overlapping saves leave the last one in place.
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

impl LocalStorage for Session {
    async fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.get::<Value>(key).await?)
    }

    async fn save(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.insert(key, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove::<Value>(key).await?;
        Ok(())
    }
}
