//! list command - Documents in a scope, filtered by status

use anyhow::Result;

use super::open;
use crate::core::article::StatusFilter;
use crate::engine::Context;
use crate::ui::output;

/// List documents in token order.
///
/// `--status` accepts draft, publish, trash or all. Anything else, or no
/// value, shows everything except trash.
pub fn list(ctx: &Context, status: Option<&str>) -> Result<()> {
    let (articles, scope) = open(ctx)?;
    let docs = articles.list(&scope, StatusFilter::parse(status))?;

    for doc in &docs {
        let marker = if articles.has_unsaved_version(doc) {
            "*"
        } else {
            " "
        };
        output::value(format!(
            "{:>6} {} {:<8} {}",
            doc.token(),
            marker,
            doc.status(),
            articles.display_title(doc)
        ));
    }
    Ok(())
}
