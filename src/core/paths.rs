//! core::paths
//!
//! Centralized path routing for folio storage locations.
//!
//! # Architecture
//!
//! Every on-disk location used by the file-backed stores and the data-dir
//! config is computed here. No other module joins file names onto the data
//! directory.
//!
//! # Storage Layout
//!
//! All data lives under the data directory:
//! - `config.toml` - Data-dir configuration (overrides global config)
//! - `counters.json` / `counters.lock` - Token counters
//! - `cache.json` / `cache.lock` - Expiring entries (edit locks)
//! - `documents.json` / `documents.lock` - Document records
//! - `versions/<document_id>.jsonl` - Append-only version logs
//!
//! # Example
//!
//! ```
//! use folio::core::paths::FolioPaths;
//! use std::path::PathBuf;
//!
//! let paths = FolioPaths::new(PathBuf::from("/var/lib/folio"));
//!
//! assert_eq!(
//!     paths.config_path(),
//!     PathBuf::from("/var/lib/folio/config.toml")
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::core::types::DocumentId;

/// Centralized path routing for folio storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolioPaths {
    /// Root of all stored data.
    pub data_dir: PathBuf,
}

impl FolioPaths {
    /// Create paths rooted at `data_dir`.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Get the data directory as a Path reference.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the path to the data-dir configuration file.
    ///
    /// This is `<data_dir>/config.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// This is `<data_dir>/counters.json`.
    pub fn counters_path(&self) -> PathBuf {
        self.data_dir.join("counters.json")
    }

    /// This is `<data_dir>/counters.lock`.
    pub fn counters_lock_path(&self) -> PathBuf {
        self.data_dir.join("counters.lock")
    }

    /// This is `<data_dir>/cache.json`.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("cache.json")
    }

    /// This is `<data_dir>/cache.lock`.
    pub fn cache_lock_path(&self) -> PathBuf {
        self.data_dir.join("cache.lock")
    }

    /// This is `<data_dir>/documents.json`.
    pub fn documents_path(&self) -> PathBuf {
        self.data_dir.join("documents.json")
    }

    /// This is `<data_dir>/documents.lock`.
    pub fn documents_lock_path(&self) -> PathBuf {
        self.data_dir.join("documents.lock")
    }

    /// Get the directory holding version logs.
    ///
    /// This is `<data_dir>/versions/`.
    pub fn versions_dir(&self) -> PathBuf {
        self.data_dir.join("versions")
    }

    /// Get the version log of one document.
    ///
    /// This is `<data_dir>/versions/<document_id>.jsonl`.
    pub fn version_log_path(&self, document: DocumentId) -> PathBuf {
        self.versions_dir().join(format!("{}.jsonl", document))
    }

    /// This is `<data_dir>/versions/<document_id>.lock`.
    pub fn version_lock_path(&self, document: DocumentId) -> PathBuf {
        self.versions_dir().join(format!("{}.lock", document))
    }

    /// Ensure the directory structure exists.
    ///
    /// # Errors
    ///
    /// Returns an IO error if directory creation fails.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(self.versions_dir())?;
        Ok(())
    }
}
