//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$FOLIO_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/folio/config.toml`
//! 3. `~/.folio/config.toml` (canonical write location)
//!
//! # Data-Dir Config
//!
//! Located at `<data_dir>/config.toml`. It may override `[lock]` and
//! `[display]` but cannot move the data directory it lives in.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the lock TTL must be
//! positive, the title placeholder must not be blank).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Keys accepted by `folio config get/set`.
pub const KEYS: &[&str] = &["data_dir", "lock.ttl_secs", "display.untitled"];

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// data_dir = "/var/lib/folio"
///
/// [lock]
/// ttl_secs = 10
///
/// [display]
/// untitled = "Untitled"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Where documents, counters and locks are stored
    pub data_dir: Option<PathBuf>,

    /// Edit-lock settings
    pub lock: Option<LockConfig>,

    /// Presentation settings
    pub display: Option<DisplayConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "data_dir cannot be empty".to_string(),
                ));
            }
        }
        validate_sections(&self.lock, &self.display)
    }

    /// Set a value by dotted key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownKey` or `ConfigError::InvalidValue`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key == "data_dir" {
            self.data_dir = Some(PathBuf::from(value));
        } else {
            set_section_value(&mut self.lock, &mut self.display, key, value)?;
        }
        self.validate()
    }
}

/// Data-dir configuration, overriding global values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataDirConfig {
    pub lock: Option<LockConfig>,
    pub display: Option<DisplayConfig>,
}

impl DataDirConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sections(&self.lock, &self.display)
    }

    /// Set a value by dotted key.
    ///
    /// # Errors
    ///
    /// `data_dir` is global-only and is rejected here.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key == "data_dir" {
            return Err(ConfigError::InvalidValue(
                "data_dir can only be set in the global config".to_string(),
            ));
        }
        set_section_value(&mut self.lock, &mut self.display, key, value)?;
        self.validate()
    }
}

/// Edit-lock settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    /// Seconds before an unrefreshed lock marker lapses
    pub ttl_secs: Option<u64>,
}

/// Presentation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Shown in place of a blank title
    pub untitled: Option<String>,
}

fn validate_sections(
    lock: &Option<LockConfig>,
    display: &Option<DisplayConfig>,
) -> Result<(), ConfigError> {
    if let Some(ttl) = lock.as_ref().and_then(|l| l.ttl_secs) {
        if ttl == 0 {
            return Err(ConfigError::InvalidValue(
                "lock.ttl_secs must be greater than zero".to_string(),
            ));
        }
    }

    if let Some(untitled) = display.as_ref().and_then(|d| d.untitled.as_deref()) {
        if untitled.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "display.untitled cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

fn set_section_value(
    lock: &mut Option<LockConfig>,
    display: &mut Option<DisplayConfig>,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match key {
        "lock.ttl_secs" => {
            let ttl = value.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "lock.ttl_secs must be a whole number of seconds, got '{}'",
                    value
                ))
            })?;
            lock.get_or_insert_with(LockConfig::default).ttl_secs = Some(ttl);
        }
        "display.untitled" => {
            display.get_or_insert_with(DisplayConfig::default).untitled = Some(value.to_string());
        }
        other => return Err(ConfigError::UnknownKey(other.to_string())),
    }
    Ok(())
}
