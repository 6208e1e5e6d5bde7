//! core::ops::allocator
//!
//! Scope-unique public tokens for new documents.
//!
//! # Invariants
//!
//! - Each scope has one counter, `scopes/<scope>/article_next_id`
//! - A token is the decimal form of the value returned by the counter's
//!   atomic increment, so no two documents in a scope share a token
//! - Allocation happens once per document, on the creation path only;
//!   calling it again for the same document burns a counter value
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use folio::core::ops::allocator::TokenAllocator;
//! use folio::core::types::ScopeId;
//! use folio::store::MemoryCounterStore;
//!
//! let allocator = TokenAllocator::new(Arc::new(MemoryCounterStore::new()));
//! let scope = ScopeId::new("acme").unwrap();
//!
//! assert_eq!(allocator.allocate(&scope).unwrap().as_str(), "1");
//! assert_eq!(allocator.allocate(&scope).unwrap().as_str(), "2");
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::core::types::{ScopeId, Token};
use crate::store::{CounterStore, StoreError};

/// Name of the per-scope counter that feeds tokens.
pub const ARTICLE_COUNTER: &str = "article_next_id";

/// Counter key for a scope's token sequence.
///
/// # Example
///
/// ```
/// use folio::core::ops::allocator::counter_key;
/// use folio::core::types::ScopeId;
///
/// let scope = ScopeId::new("acme").unwrap();
/// assert_eq!(counter_key(&scope), "scopes/acme/article_next_id");
/// ```
pub fn counter_key(scope: &ScopeId) -> String {
    format!("scopes/{}/{}", scope, ARTICLE_COUNTER)
}

/// Mints tokens from a counter store.
#[derive(Clone)]
pub struct TokenAllocator {
    counters: Arc<dyn CounterStore>,
}

impl TokenAllocator {
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Mint the next token for `scope`.
    ///
    /// # Errors
    ///
    /// Propagates the counter store's error unchanged; an unreachable store
    /// surfaces as [`StoreError::Unavailable`] and the caller must not
    /// create the document.
    pub fn allocate(&self, scope: &ScopeId) -> Result<Token, StoreError> {
        let value = self.counters.increment(&counter_key(scope))?;
        if value == 0 {
            return Err(StoreError::Corrupt(format!(
                "counter for scope {} returned zero",
                scope
            )));
        }
        let token = Token::from_sequence(value);
        debug!(scope = %scope, token = %token, "allocated token");
        Ok(token)
    }

    /// The most recently minted sequence value for `scope`, if any.
    pub fn last_allocated(&self, scope: &ScopeId) -> Result<Option<u64>, StoreError> {
        self.counters.current(&counter_key(scope))
    }
}
