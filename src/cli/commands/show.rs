//! show command - Print a document with its lock and version state

use anyhow::{bail, Result};

use super::{load, open};
use crate::engine::Context;
use crate::ui::output;

/// Show a document found by token or by its old URL.
pub fn show(
    ctx: &Context,
    token: Option<&str>,
    old_url: Option<&str>,
    body_only: bool,
) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let doc = match (token, old_url) {
        (Some(token), _) => load(&articles, &scope, token)?,
        (None, Some(old_url)) => articles.find_by_old_url(&scope, old_url)?,
        (None, None) => bail!("Pass a token or --old-url"),
    };

    if body_only {
        output::value(&doc.body);
        return Ok(());
    }

    let editing = articles
        .lock_holder(doc.id())
        .map(|e| e.to_string())
        .unwrap_or_else(|| "nobody".to_string());
    let sync = if articles.has_unsaved_version(&doc) {
        "unsaved changes"
    } else {
        "up to date"
    };

    output::value(format!("Token:      {}", doc.token()));
    output::value(format!("Title:      {}", articles.display_title(&doc)));
    output::value(format!("Status:     {}", doc.status()));
    output::value(format!(
        "Saves:      {} (versioned at {}, {})",
        doc.save_count(),
        doc.last_version_save_count(),
        sync
    ));
    output::value(format!(
        "Published:  {}",
        output::format_timestamp(doc.published_at())
    ));
    output::value(format!("Editing:    {}", editing));
    if let Some(editor) = doc.last_edit_editor() {
        output::value(format!("Last edit:  {}", editor));
    }
    if let Some(old_url) = &doc.old_url {
        output::value(format!("Old URL:    {}", old_url));
    }
    output::value(format!("Created:    {}", doc.created_at()));
    output::value(format!("Updated:    {}", doc.updated_at()));
    output::value(format!("Id:         {}", doc.id()));

    if !doc.body.is_empty() {
        output::value("");
        output::value(&doc.body);
    }
    Ok(())
}
