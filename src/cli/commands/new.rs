//! new command - Create a draft and mint its token

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{open, read_body, verbosity};
use crate::engine::{Context, DocumentDraft};
use crate::ui::output;

/// Create a new draft in the context's scope.
///
/// Prints the new token. In quiet mode the token is the only output, so
/// scripts can capture it.
pub fn new(
    ctx: &Context,
    title: Option<String>,
    body: Option<String>,
    body_file: Option<PathBuf>,
    old_url: Option<String>,
) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let draft = DocumentDraft {
        title: title.unwrap_or_default(),
        body: read_body(body, body_file)?.unwrap_or_default(),
        old_url,
    };

    let doc = articles
        .create(&scope, draft)
        .context("Failed to create document")?;

    if ctx.quiet {
        output::value(doc.token());
    } else {
        output::success(
            format!(
                "Created document {} in scope {} ({})",
                doc.token(),
                scope,
                articles.display_title(&doc)
            ),
            verbosity(ctx),
        );
    }
    Ok(())
}
