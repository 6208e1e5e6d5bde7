//! config command - Get, set, or list configuration values

use anyhow::{Context as _, Result};

use super::verbosity;
use crate::core::config::KEYS;
use crate::engine::Context;
use crate::ui::output;

/// Print the effective value of a key.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = ctx.config().context("Failed to load config")?;
    output::value(config.get(key)?);
    Ok(())
}

/// Set a key in the data-dir config, or the global config with `--global`.
pub fn set(ctx: &Context, key: &str, value: &str, global: bool) -> Result<()> {
    let config = ctx.config().context("Failed to load config")?;

    let path = if global || key == "data_dir" {
        let mut updated = config.global.clone();
        updated.set(key, value)?;
        config
            .write_global(&updated)
            .context("Failed to write config")?
    } else {
        let mut updated = config.local.clone().unwrap_or_default();
        updated.set(key, value)?;
        config
            .write_local(&updated)
            .context("Failed to write config")?
    };

    output::success(
        format!("Set {} = {} in {}", key, value, path.display()),
        verbosity(ctx),
    );
    Ok(())
}

/// List all effective configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.config().context("Failed to load config")?;

    output::print("# Effective Configuration", verbosity(ctx));
    for key in KEYS {
        output::value(format!("{} = {}", key, config.get(key)?));
    }

    if let Some(path) = config.global_config_loaded_from() {
        output::print(format!("# global: {}", path.display()), verbosity(ctx));
    }
    if let Some(path) = config.local_config_loaded_from() {
        output::print(format!("# data dir: {}", path.display()), verbosity(ctx));
    }
    Ok(())
}
