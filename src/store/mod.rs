//! store
//!
//! Storage collaborators for the article core.
//!
//! # Architecture
//!
//! The core talks to storage only through the traits in [`traits`]. Two
//! backends implement all of them:
//!
//! - [`memory`]: process-local, for tests and embedding
//! - [`file`]: a data directory shared safely between processes
//!
//! [`Stores`] bundles one implementation of each trait so callers can pass
//! a single value around.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use folio::core::clock::SystemClock;
//! use folio::store::Stores;
//!
//! let stores = Stores::in_memory(Arc::new(SystemClock));
//! assert_eq!(stores.counters.increment("demo").unwrap(), 1);
//! ```

pub mod file;
pub mod memory;
pub mod traits;

pub use file::{FileCounterStore, FileDocumentStore, FileExpiringStore, FileVersionStore};
pub use memory::{MemoryCounterStore, MemoryDocumentStore, MemoryExpiringStore, MemoryVersionStore};
pub use traits::{CounterStore, DocumentStore, ExpiringStore, StoreError, VersionStore};

use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::paths::FolioPaths;

/// One implementation of each store trait.
#[derive(Clone)]
pub struct Stores {
    pub counters: Arc<dyn CounterStore>,
    pub cache: Arc<dyn ExpiringStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub versions: Arc<dyn VersionStore>,
}

impl Stores {
    /// Process-local stores.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            counters: Arc::new(MemoryCounterStore::new()),
            cache: Arc::new(MemoryExpiringStore::new(clock.clone())),
            documents: Arc::new(MemoryDocumentStore::new(clock)),
            versions: Arc::new(MemoryVersionStore::new()),
        }
    }

    /// File-backed stores rooted at `paths.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the data directory cannot be
    /// created.
    pub fn open(paths: &FolioPaths, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        paths.ensure_dirs().map_err(|e| {
            StoreError::Unavailable(format!(
                "cannot create data dir {}: {}",
                paths.data_dir().display(),
                e
            ))
        })?;
        Ok(Self {
            counters: Arc::new(FileCounterStore::new(paths)),
            cache: Arc::new(FileExpiringStore::new(paths, clock.clone())),
            documents: Arc::new(FileDocumentStore::new(paths, clock)),
            versions: Arc::new(FileVersionStore::new(paths)),
        })
    }
}
