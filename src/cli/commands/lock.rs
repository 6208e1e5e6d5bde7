//! lock, unlock, who commands - Advisory edit lock

use anyhow::{Context as _, Result};

use super::{load, open, verbosity};
use crate::core::types::EditorId;
use crate::engine::Context;
use crate::ui::output;

fn editor(editor: &str) -> Result<EditorId> {
    EditorId::new(editor).with_context(|| format!("Invalid editor '{}'", editor))
}

/// Record `editor` as active on a document.
///
/// A lock store outage is reported as a warning; the command still exits 0
/// because editing does not depend on the lock.
pub fn lock(ctx: &Context, token: &str, editor_id: &str) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let editor = editor(editor_id)?;
    let doc = load(&articles, &scope, token)?;
    let verbosity = verbosity(ctx);

    let previous = articles.lock_holder(doc.id());
    if articles.acquire_lock(doc.id(), &editor) {
        match previous {
            Some(prev) if prev != editor => output::success(
                format!("{} now editing document {} (was {})", editor, doc.token(), prev),
                verbosity,
            ),
            _ => output::success(
                format!(
                    "{} editing document {} for {}s",
                    editor,
                    doc.token(),
                    articles.edit_lock().ttl().as_secs()
                ),
                verbosity,
            ),
        }
    } else {
        output::warn("lock store unavailable; continuing unlocked", verbosity);
    }
    Ok(())
}

/// Clear `editor`'s lock on a document.
pub fn unlock(ctx: &Context, token: &str, editor_id: &str) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let editor = editor(editor_id)?;
    let doc = load(&articles, &scope, token)?;

    if articles.release_lock(doc.id(), &editor) {
        output::success(
            format!("Released lock on document {}", doc.token()),
            verbosity(ctx),
        );
    } else {
        output::print(
            format!("{} does not hold the lock on document {}", editor, doc.token()),
            verbosity(ctx),
        );
    }
    Ok(())
}

/// Print who is editing a document, or "unlocked".
pub fn who(ctx: &Context, token: &str) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let doc = load(&articles, &scope, token)?;

    match articles.lock_holder(doc.id()) {
        Some(holder) => output::value(holder),
        None => output::value("unlocked"),
    }
    Ok(())
}
