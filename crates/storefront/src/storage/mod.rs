//! Local key-value storage for store snapshots.
//!
//! Each store persists its whole state as one JSON document under its own
//! key. Reads are tolerant: a missing, unreadable, or malformed document is
//! logged and treated as absent, so a corrupted snapshot never prevents the
//! storefront from starting.
//!
//! ## Keys
//!
//! ```text
//! cart       → Cart JSON
//! favorites  → FavoritesSet JSON
//! user       → User JSON (no credential)
//! ```

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key names.
pub mod keys {
    /// Cart snapshot.
    pub const CART: &str = "cart";
    /// Favorites snapshot.
    pub const FAVORITES: &str = "favorites";
    /// Authenticated user snapshot.
    pub const USER: &str = "user";
}

/// Errors from storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be used as a storage name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A lock guarding the backend was poisoned by a panic.
    #[error("storage lock poisoned")]
    Poisoned,

    /// The snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string key-value store.
///
/// Implementations use interior locking so a shared handle can be used from
/// several stores at once.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage handle shared by every store in a storefront.
pub type SharedStorage = Arc<dyn KeyValueStorage>;

/// Read and decode the snapshot under `key`.
///
/// # Errors
///
/// Returns `StorageError` if the backend fails or the document is malformed.
pub fn read_snapshot<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

/// Encode `value` and write it under `key`.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the write fails.
pub fn write_snapshot<T: Serialize>(
    storage: &dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

/// Read the snapshot under `key`, discarding it on any failure.
///
/// Failures are logged at `warn` and reported as `None`.
pub fn load_or_discard<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> Option<T> {
    match read_snapshot(storage, key) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable snapshot");
            None
        }
    }
}

/// Write the snapshot under `key`, logging a failure instead of returning it.
pub fn persist_or_log<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, value: &T) {
    if let Err(e) = write_snapshot(storage, key, value) {
        tracing::warn!(key, error = %e, "Failed to persist snapshot");
    }
}

/// Remove the snapshot under `key`, logging a failure instead of returning it.
pub fn remove_or_log(storage: &dyn KeyValueStorage, key: &str) {
    if let Err(e) = storage.remove(key) {
        tracing::warn!(key, error = %e, "Failed to remove snapshot");
    }
}

/// A backend that fails every call.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStorage;

#[cfg(test)]
impl FailingStorage {
    fn error(key: &str) -> StorageError {
        StorageError::Io {
            key: key.to_owned(),
            source: std::io::Error::other("disk unavailable"),
        }
    }
}

#[cfg(test)]
impl KeyValueStorage for FailingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(Self::error(key))
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(Self::error(key))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Err(Self::error(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Snapshot {
        count: u32,
    }

    #[test]
    fn test_snapshot_round_trip() {
        let storage = MemoryStorage::new();
        write_snapshot(&storage, "k", &Snapshot { count: 3 }).unwrap();
        let back: Option<Snapshot> = read_snapshot(&storage, "k").unwrap();
        assert_eq!(back, Some(Snapshot { count: 3 }));
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let storage = MemoryStorage::new();
        let back: Option<Snapshot> = read_snapshot(&storage, "k").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn test_malformed_snapshot_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set("k", "{not json").unwrap();
        assert!(matches!(
            read_snapshot::<Snapshot>(&storage, "k"),
            Err(StorageError::Serialization(_))
        ));
        assert!(load_or_discard::<Snapshot>(&storage, "k").is_none());
    }

    #[test]
    fn test_failing_backend_is_swallowed() {
        let storage = FailingStorage;
        persist_or_log(&storage, "k", &Snapshot { count: 1 });
        remove_or_log(&storage, "k");
        assert!(load_or_discard::<Snapshot>(&storage, "k").is_none());
        assert!(matches!(
            write_snapshot(&storage, "k", &Snapshot { count: 1 }),
            Err(StorageError::Io { .. })
        ));
    }
}
