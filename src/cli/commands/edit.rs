//! edit command - Save title/body changes

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use super::{load, open, parse_editor, read_body, verbosity};
use crate::engine::{Context, Edit};
use crate::ui::output;

/// Apply an edit and count it as a save.
///
/// Warns (without refusing) when another editor holds the edit lock.
pub fn edit(
    ctx: &Context,
    token: &str,
    title: Option<String>,
    body: Option<String>,
    body_file: Option<PathBuf>,
    editor: Option<&str>,
    snapshot: bool,
) -> Result<()> {
    let body = read_body(body, body_file)?;
    if title.is_none() && body.is_none() {
        bail!("Nothing to change; pass --title, --body or --body-file");
    }

    let (articles, scope) = open(ctx)?;
    let editor = parse_editor(editor)?;
    let mut doc = load(&articles, &scope, token)?;
    let verbosity = verbosity(ctx);

    if let Some(holder) = articles.lock_holder(doc.id()) {
        if editor.as_ref() != Some(&holder) {
            output::warn(
                format!("{} is currently editing document {}", holder, doc.token()),
                verbosity,
            );
        }
    }

    articles
        .save(&mut doc, Edit { title, body }, editor.as_ref())
        .context("Failed to save document")?;

    if snapshot {
        articles
            .append_version(&mut doc, editor.as_ref())
            .context("Saved, but failed to record a version")?;
        output::success(
            format!("Saved and versioned document {}", doc.token()),
            verbosity,
        );
    } else {
        output::success(
            format!(
                "Saved document {} (save {})",
                doc.token(),
                doc.save_count()
            ),
            verbosity,
        );
    }
    Ok(())
}
