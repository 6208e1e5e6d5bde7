//! engine
//!
//! Composes the editing primitives into caller-facing operations.
//!
//! # Architecture
//!
//! The engine sits between the CLI and the core:
//!
//! ```text
//! cli -> engine::Articles -> core::ops -> store
//! ```
//!
//! Command handlers receive a [`Context`] built from global flags, load
//! configuration through it, and then call [`Articles`]. No handler talks
//! to a store directly.

pub mod articles;

pub use articles::{ArticleError, Articles, DocumentDraft, Edit};

use std::path::PathBuf;

use crate::core::config::{Config, ConfigError};
use crate::core::types::{ScopeId, TypeError};

/// Scope used when none is given.
pub const DEFAULT_SCOPE: &str = "default";

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone)]
pub struct Context {
    /// Data directory override (`--data-dir`).
    pub data_dir: Option<PathBuf>,
    /// Scope that owns the documents being worked on.
    pub scope: String,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            data_dir: None,
            scope: DEFAULT_SCOPE.to_string(),
            debug: false,
            quiet: false,
        }
    }
}

impl Context {
    /// The validated scope.
    pub fn scope(&self) -> Result<ScopeId, TypeError> {
        ScopeId::new(self.scope.as_str())
    }

    /// Load configuration, honoring the data directory override.
    pub fn config(&self) -> Result<Config, ConfigError> {
        Config::load(self.data_dir.as_deref())
    }

    /// Open the article facade for this context.
    pub fn articles(&self) -> Result<Articles, ArticleError> {
        let config = self.config()?;
        Articles::open(&config)
    }
}
