//! snapshot and versions commands - Version history

use anyhow::{Context as _, Result};

use super::{load, open, parse_editor, verbosity};
use crate::engine::Context;
use crate::ui::output;

/// Record a version of a document's current content.
pub fn snapshot(ctx: &Context, token: &str, editor: Option<&str>) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let editor = parse_editor(editor)?;
    let mut doc = load(&articles, &scope, token)?;

    let version = articles
        .append_version(&mut doc, editor.as_ref())
        .context("Failed to record version")?;

    output::success(
        format!(
            "Recorded version {} of document {} by {}",
            version.id,
            doc.token(),
            version.actor
        ),
        verbosity(ctx),
    );
    Ok(())
}

/// List versions, newest first.
pub fn versions(ctx: &Context, token: &str) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let doc = load(&articles, &scope, token)?;
    let versions = articles.versions(&doc)?;

    if versions.is_empty() {
        output::print(
            format!("No versions of document {}", doc.token()),
            verbosity(ctx),
        );
        return Ok(());
    }

    let lines: Vec<String> = versions
        .iter()
        .map(|v| {
            let title = if v.title.trim().is_empty() {
                "(untitled)"
            } else {
                v.title.as_str()
            };
            format!("{}  {}  {}  {}", v.created_at, v.id, v.actor, title)
        })
        .collect();
    output::value(output::format_list(&lines, ""));
    Ok(())
}
