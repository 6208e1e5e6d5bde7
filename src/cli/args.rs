//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--data-dir <path>`: Use this data directory
//! - `--scope <scope>`: Scope that owns the documents (default: `default`)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio - collaborative article drafts from the command line
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store documents, counters and locks in this directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Scope (workspace) that owns the documents
    #[arg(long, short = 's', global = true, default_value = "default")]
    pub scope: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new draft and print its token
    #[command(
        name = "new",
        after_help = "\
WORKFLOW EXAMPLES:
    # Start an empty draft
    folio new

    # Import a post from an old site
    folio new --title \"Hello\" --body-file hello.md --old-url /2019/05/hello"
    )]
    New {
        /// Initial title (may be left blank)
        #[arg(long)]
        title: Option<String>,

        /// Initial body
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the initial body from a file
        #[arg(long, value_name = "PATH")]
        body_file: Option<PathBuf>,

        /// Location of the document in a previous system
        #[arg(long)]
        old_url: Option<String>,
    },

    /// Show a document
    Show {
        /// Document token
        #[arg(required_unless_present = "old_url")]
        token: Option<String>,

        /// Find the document by its previous location instead
        #[arg(long, conflicts_with = "token")]
        old_url: Option<String>,

        /// Print only the body
        #[arg(long)]
        body_only: bool,
    },

    /// Save changes to a document
    #[command(
        name = "edit",
        long_about = "Save changes to a document.\n\n\
            Every edit counts as a save, which marks the document as having \
            changes not yet captured in a version. Pass --snapshot to record a \
            version right after saving.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Retitle a document as editor u7
    folio edit 12 --title \"Launch notes\" --editor u7

    # Replace the body and snapshot it
    folio edit 12 --body-file notes.md --snapshot"
    )]
    Edit {
        /// Document token
        token: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the new body from a file
        #[arg(long, value_name = "PATH")]
        body_file: Option<PathBuf>,

        /// Editor making the change
        #[arg(long)]
        editor: Option<String>,

        /// Record a version after saving
        #[arg(long)]
        snapshot: bool,
    },

    /// Mark yourself as the active editor of a document
    #[command(
        name = "lock",
        long_about = "Mark an editor as active on a document.\n\n\
            The lock is advisory and expires after the configured TTL \
            (10 seconds by default) unless refreshed. Acquiring always \
            succeeds and replaces any previous holder."
    )]
    Lock {
        /// Document token
        token: String,

        /// Editor taking the lock
        #[arg(long)]
        editor: String,
    },

    /// Clear your edit lock on a document
    Unlock {
        /// Document token
        token: String,

        /// Editor releasing the lock
        #[arg(long)]
        editor: String,
    },

    /// Show who is editing a document
    Who {
        /// Document token
        token: String,
    },

    /// Record a version of a document's current content
    Snapshot {
        /// Document token
        token: String,

        /// Editor the version is attributed to (defaults to the scope)
        #[arg(long)]
        editor: Option<String>,
    },

    /// List versions of a document, newest first
    Versions {
        /// Document token
        token: String,
    },

    /// Change a document's status
    #[command(
        name = "status",
        after_help = "\
WORKFLOW EXAMPLES:
    # Publish (stamps the publication time)
    folio status 12 publish

    # Move to trash
    folio status 12 trash"
    )]
    Status {
        /// Document token
        token: String,

        /// New status: draft, publish or trash
        status: String,
    },

    /// List documents in the scope
    List {
        /// draft, publish, trash or all (default: everything but trash)
        #[arg(long)]
        status: Option<String>,
    },

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        after_help = "\
KEYS:
    data_dir           Where documents are stored (global only)
    lock.ttl_secs      Edit lock lifetime in seconds
    display.untitled   Placeholder for blank titles"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    folio completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    folio completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
        /// Write to the global config instead of the data-dir config
        #[arg(long)]
        global: bool,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
