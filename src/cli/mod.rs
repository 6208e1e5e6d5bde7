//! cli
//!
//! Command-line interface layer for Folio.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT touch stores directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that call [`crate::engine::Articles`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::engine;
use anyhow::Result;

/// Run an already-parsed command line.
///
/// `main.rs` parses first so it can set up logging from the global flags,
/// then hands the parsed command line here.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = engine::Context {
        data_dir: cli.data_dir.clone(),
        scope: cli.scope.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
