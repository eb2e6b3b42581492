//! Integration tests for the EcoShop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecoshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - login, cart, and favorites across reloads
//! - `persistence` - snapshot layout and recovery from bad data
//!
//! Each test gets its own [`TestContext`] with a scratch data directory, so
//! tests can run in parallel.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use ecoshop_storefront::auth::UserDirectory;
use ecoshop_storefront::catalog::Catalog;
use ecoshop_storefront::config::{PricingConfig, StorageBackend, StorefrontConfig};
use ecoshop_storefront::error::Result;
use ecoshop_storefront::state::Storefront;
use ecoshop_storefront::storage::{FileStorage, SharedStorage};

/// A scratch data directory for one test, removed on drop.
#[derive(Debug)]
pub struct TestContext {
    data_dir: PathBuf,
    _root: TempDir,
}

impl TestContext {
    /// A fresh context. The data directory itself is not created until the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the scratch root cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let root = TempDir::with_prefix("ecoshop-it-")?;
        Ok(Self {
            data_dir: root.path().join("data"),
            _root: root,
        })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File-backed configuration pointing at this context's directory.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            storage: StorageBackend::File,
            data_dir: self.data_dir.clone(),
            ..StorefrontConfig::default()
        }
    }

    /// A storefront over this context's directory, as a new process would
    /// open it.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled dataset is invalid.
    pub fn open(&self) -> Result<Storefront> {
        Storefront::new(&self.config())
    }

    /// A storefront with a caller-supplied directory and pricing.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled catalog is invalid.
    pub fn open_with(
        &self,
        directory: UserDirectory,
        pricing: PricingConfig,
    ) -> Result<Storefront> {
        let catalog = Arc::new(Catalog::bundled()?);
        Ok(Storefront::with_parts(
            self.storage(),
            catalog,
            directory,
            pricing,
        ))
    }

    /// A file storage handle on this context's directory.
    #[must_use]
    pub fn storage(&self) -> SharedStorage {
        Arc::new(FileStorage::new(&self.data_dir))
    }

    /// Path of the snapshot file for `key`.
    #[must_use]
    pub fn snapshot_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    /// Overwrite the snapshot for `key` with raw text.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write_raw(&self, key: &str, contents: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::write(self.snapshot_path(key), contents)
    }

    /// Read the snapshot for `key` as JSON, if present.
    #[must_use]
    pub fn read_json(&self, key: &str) -> Option<serde_json::Value> {
        let text = std::fs::read_to_string(self.snapshot_path(key)).ok()?;
        serde_json::from_str(&text).ok()
    }
}
