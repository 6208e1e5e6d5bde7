//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT touch stores directly.

mod completion;
mod config_cmd;
mod edit;
mod list;
mod lock;
mod new;
mod show;
mod snapshot;
mod status;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use edit::edit;
pub use list::list;
pub use lock::{lock, unlock, who};
pub use new::new;
pub use show::show;
pub use snapshot::{snapshot, versions};
pub use status::status;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, ConfigAction};
use crate::core::article::Document;
use crate::core::types::{EditorId, ScopeId, Token};
use crate::engine::{Articles, Context};
use crate::ui::output::Verbosity;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::New {
            title,
            body,
            body_file,
            old_url,
        } => new::new(ctx, title, body, body_file, old_url),
        Command::Show {
            token,
            old_url,
            body_only,
        } => show::show(ctx, token.as_deref(), old_url.as_deref(), body_only),
        Command::Edit {
            token,
            title,
            body,
            body_file,
            editor,
            snapshot,
        } => edit::edit(
            ctx,
            &token,
            title,
            body,
            body_file,
            editor.as_deref(),
            snapshot,
        ),
        Command::Lock { token, editor } => lock::lock(ctx, &token, &editor),
        Command::Unlock { token, editor } => lock::unlock(ctx, &token, &editor),
        Command::Who { token } => lock::who(ctx, &token),
        Command::Snapshot { token, editor } => snapshot::snapshot(ctx, &token, editor.as_deref()),
        Command::Versions { token } => snapshot::versions(ctx, &token),
        Command::Status { token, status } => status::status(ctx, &token, &status),
        Command::List { status } => list::list(ctx, status.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value, global } => config_cmd::set(ctx, &key, &value, global),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Open the article facade and resolve the scope.
fn open(ctx: &Context) -> Result<(Articles, ScopeId)> {
    let scope = ctx.scope().context("Invalid --scope")?;
    let articles = ctx.articles().context("Failed to open data directory")?;
    Ok((articles, scope))
}

fn verbosity(ctx: &Context) -> Verbosity {
    Verbosity::from_flags(ctx.quiet, ctx.debug)
}

/// Find a document by the token given on the command line.
fn load(articles: &Articles, scope: &ScopeId, token: &str) -> Result<Document> {
    let token = Token::new(token).with_context(|| format!("Invalid token '{}'", token))?;
    Ok(articles.find(scope, &token)?)
}

fn parse_editor(editor: Option<&str>) -> Result<Option<EditorId>> {
    editor
        .map(|e| EditorId::new(e).with_context(|| format!("Invalid editor '{}'", e)))
        .transpose()
}

/// Body from `--body` or `--body-file`, if either was given.
fn read_body(body: Option<String>, body_file: Option<PathBuf>) -> Result<Option<String>> {
    match (body, body_file) {
        (Some(body), _) => Ok(Some(body)),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_flag_wins_over_nothing() {
        assert_eq!(read_body(Some("x".into()), None).unwrap(), Some("x".into()));
        assert_eq!(read_body(None, None).unwrap(), None);
    }

    #[test]
    fn body_file_is_read() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("body.md");
        std::fs::write(&path, "from file").unwrap();
        assert_eq!(
            read_body(None, Some(path)).unwrap(),
            Some("from file".to_string())
        );
    }

    #[test]
    fn missing_body_file_errors() {
        assert!(read_body(None, Some(PathBuf::from("/no/such/file"))).is_err());
    }

    #[test]
    fn editor_parsing() {
        assert_eq!(parse_editor(None).unwrap(), None);
        assert!(parse_editor(Some("u7")).unwrap().is_some());
        assert!(parse_editor(Some("a b")).is_err());
    }
}
