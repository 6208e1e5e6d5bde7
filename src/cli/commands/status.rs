//! status command - Move a document through draft/publish/trash

use anyhow::{Context as _, Result};

use super::{load, open, verbosity};
use crate::core::article::Status;
use crate::engine::Context;
use crate::ui::output;

/// Change a document's status.
pub fn status(ctx: &Context, token: &str, status: &str) -> Result<()> {
    let to: Status = status.parse()?;
    let (articles, scope) = open(ctx)?;
    let mut doc = load(&articles, &scope, token)?;

    let change = articles
        .transition_status(&mut doc, to)
        .context("Failed to change status")?;

    let message = if !change.changed() {
        format!("Document {} is already {}", doc.token(), change.to)
    } else if change.published {
        format!(
            "Document {} published at {}",
            doc.token(),
            output::format_timestamp(doc.published_at())
        )
    } else {
        format!("Document {}: {} -> {}", doc.token(), change.from, change.to)
    };
    output::success(message, verbosity(ctx));
    Ok(())
}
