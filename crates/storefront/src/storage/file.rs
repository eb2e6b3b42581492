//! File-backed storage: one `<key>.json` document per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStorage, StorageError};

/// Stores each key as a JSON file under a data directory.
///
/// The directory is created on first write. Writes go to a temporary file
/// that is renamed over the target, so a crash mid-write leaves the previous
/// snapshot in place.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document holding `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` unless the key is a non-empty run of
    /// ASCII letters, digits, `-` and `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        fs::create_dir_all(&self.dir).map_err(io_error(key))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_error(key))?;
        fs::rename(&tmp, &path).map_err(io_error(key))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_reads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path().join("data"));
        assert!(storage.get("cart").unwrap().is_none());
        storage.remove("cart").unwrap();
    }

    #[test]
    fn test_set_creates_key_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        let storage = FileStorage::new(&dir);

        storage.set("cart", r#"{"items":[]}"#).unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("cart.json")).unwrap(),
            r#"{"items":[]}"#
        );
        assert_eq!(
            storage.get("cart").unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );

        storage.remove("cart").unwrap();
        assert!(!dir.join("cart.json").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path());
        for key in ["", "../cart", "a/b", "cart.json"] {
            assert!(matches!(
                storage.set(key, "{}"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }
}
