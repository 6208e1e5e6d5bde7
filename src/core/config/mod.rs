//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Folio has two configuration scopes:
//! - **Global**: User-level settings, including where data lives
//! - **Data dir**: Overrides stored next to the data they apply to
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Data-dir config file
//! 4. CLI flags (not handled here, except `--data-dir`)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$FOLIO_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/folio/config.toml`
//! 3. `~/.folio/config.toml` (canonical write location)
//!
//! # Data Directory
//!
//! Resolved in order: `--data-dir`, `$FOLIO_DATA_DIR`, global `data_dir`,
//! then the platform data directory (`dirs::data_dir()/folio`).
//!
//! # Example
//!
//! ```no_run
//! use folio::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Data dir: {}", config.data_dir().display());
//! println!("Lock TTL: {:?}", config.lock_ttl());
//! println!("Untitled: {}", config.untitled());
//! ```

pub mod schema;

pub use schema::{DataDirConfig, DisplayConfig, GlobalConfig, LockConfig, KEYS};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::article::DEFAULT_UNTITLED;
use crate::core::ops::DEFAULT_LOCK_TTL;
use crate::core::paths::FolioPaths;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "FOLIO_DATA_DIR";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown config key '{0}', expected one of: data_dir, lock.ttl_secs, display.untitled")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,

    #[error("no data directory: pass --data-dir or set FOLIO_DATA_DIR")]
    NoDataDir,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically. Data-dir config
/// overrides global config.
#[derive(Debug, Clone)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Data-dir configuration (if present)
    pub local: Option<DataDirConfig>,
    data_dir: PathBuf,
    global_path: Option<PathBuf>,
    local_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// `data_dir_flag` is the `--data-dir` override, if given.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(data_dir_flag: Option<&Path>) -> Result<Config, ConfigError> {
        let (global, global_path) = Self::load_global()?;
        let env_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        let data_dir = resolve_data_dir(data_dir_flag, env_dir, &global)?;
        Self::load_with(global, global_path, data_dir)
    }

    /// Combine an already-loaded global config with the data-dir config
    /// found under `data_dir`.
    pub fn load_with(
        global: GlobalConfig,
        global_path: Option<PathBuf>,
        data_dir: PathBuf,
    ) -> Result<Config, ConfigError> {
        global.validate()?;

        let local_path = FolioPaths::new(data_dir.clone()).config_path();
        let (local, local_path) = if local_path.exists() {
            let local: DataDirConfig = read_config(&local_path)?;
            local.validate()?;
            (Some(local), Some(local_path))
        } else {
            (None, None)
        };

        Ok(Config {
            global,
            local,
            data_dir,
            global_path,
            local_path,
        })
    }

    /// Load global configuration from standard locations.
    pub fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $FOLIO_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/folio/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("folio/config.toml");
            if path.exists() {
                let config = read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.folio/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".folio/config.toml");
            if path.exists() {
                let config = read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((GlobalConfig::default(), None))
    }

    /// Get the path global config is written to.
    ///
    /// The file it was loaded from if any, else `$FOLIO_CONFIG` if set,
    /// else `~/.folio/config.toml`.
    pub fn global_write_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.global_path {
            return Ok(path.clone());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".folio/config.toml"))
    }

    /// Write global config atomically.
    pub fn write_global(&self, config: &GlobalConfig) -> Result<PathBuf, ConfigError> {
        let path = self.global_write_path()?;
        write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write data-dir config atomically to `<data_dir>/config.toml`.
    pub fn write_local(&self, config: &DataDirConfig) -> Result<PathBuf, ConfigError> {
        let path = FolioPaths::new(self.data_dir.clone()).config_path();
        write_config_atomic(&path, config)?;
        Ok(path)
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// The resolved data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path routing for the resolved data directory.
    pub fn paths(&self) -> FolioPaths {
        FolioPaths::new(self.data_dir.clone())
    }

    /// Lifetime of an edit-lock marker.
    ///
    /// Defaults to 10 seconds if not configured.
    pub fn lock_ttl(&self) -> Duration {
        let local = self
            .local
            .as_ref()
            .and_then(|c| c.lock.as_ref())
            .and_then(|l| l.ttl_secs);
        let global = self.global.lock.as_ref().and_then(|l| l.ttl_secs);
        local
            .or(global)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LOCK_TTL)
    }

    /// Placeholder shown for blank titles.
    ///
    /// Defaults to "Untitled" if not configured.
    pub fn untitled(&self) -> &str {
        let local = self
            .local
            .as_ref()
            .and_then(|c| c.display.as_ref())
            .and_then(|d| d.untitled.as_deref());
        let global = self
            .global
            .display
            .as_ref()
            .and_then(|d| d.untitled.as_deref());
        local.or(global).unwrap_or(DEFAULT_UNTITLED)
    }

    /// Effective value of a dotted key, as shown by `config get`.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "data_dir" => Ok(self.data_dir.display().to_string()),
            "lock.ttl_secs" => Ok(self.lock_ttl().as_secs().to_string()),
            "display.untitled" => Ok(self.untitled().to_string()),
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded data-dir config file.
    pub fn local_config_loaded_from(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }
}

/// Pick the data directory by precedence.
///
/// # Errors
///
/// Returns `ConfigError::NoDataDir` when nothing names a directory and the
/// platform has no data directory.
pub fn resolve_data_dir(
    flag: Option<&Path>,
    env: Option<PathBuf>,
    global: &GlobalConfig,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = env.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    if let Some(dir) = &global.data_dir {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|d| d.join("folio"))
        .ok_or(ConfigError::NoDataDir)
}

/// Read and parse a config file.
fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a config file atomically.
fn write_config_atomic<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

    // Same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(contents.as_bytes())
        .map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

    file.sync_all().map_err(|e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load_in(temp: &TempDir, global: GlobalConfig) -> Config {
        Config::load_with(global, None, temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let config = load_in(&temp, GlobalConfig::default());

        assert_eq!(config.lock_ttl(), Duration::from_secs(10));
        assert_eq!(config.untitled(), "Untitled");
        assert_eq!(config.data_dir(), temp.path());
        assert!(config.local_config_loaded_from().is_none());
    }

    #[test]
    fn global_values_apply() {
        let temp = TempDir::new().unwrap();
        let global = GlobalConfig {
            lock: Some(LockConfig { ttl_secs: Some(30) }),
            ..Default::default()
        };
        let config = load_in(&temp, global);
        assert_eq!(config.lock_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn data_dir_config_overrides_global() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("config.toml"),
            r#"
            [display]
            untitled = "Sans titre"
            "#,
        )
        .unwrap();

        let global = GlobalConfig {
            lock: Some(LockConfig { ttl_secs: Some(30) }),
            display: Some(DisplayConfig {
                untitled: Some("(untitled)".to_string()),
            }),
            ..Default::default()
        };
        let config = load_in(&temp, global);

        assert_eq!(config.untitled(), "Sans titre");
        assert_eq!(config.lock_ttl(), Duration::from_secs(30));
        assert!(config.local_config_loaded_from().is_some());
    }

    #[test]
    fn invalid_data_dir_config_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "[lock]\nttl_secs = 0\n").unwrap();

        let result = Config::load_with(GlobalConfig::default(), None, temp.path().to_path_buf());
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "colour = \"blue\"\n").unwrap();

        let result = Config::load_with(GlobalConfig::default(), None, temp.path().to_path_buf());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn write_local_atomic() {
        let temp = TempDir::new().unwrap();
        let config = load_in(&temp, GlobalConfig::default());

        let mut local = DataDirConfig::default();
        local.set("lock.ttl_secs", "45").unwrap();
        let path = config.write_local(&local).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());
        let reloaded = load_in(&temp, GlobalConfig::default());
        assert_eq!(reloaded.lock_ttl(), Duration::from_secs(45));
    }

    #[test]
    fn get_reports_effective_values() {
        let temp = TempDir::new().unwrap();
        let config = load_in(&temp, GlobalConfig::default());
        assert_eq!(config.get("lock.ttl_secs").unwrap(), "10");
        assert_eq!(config.get("display.untitled").unwrap(), "Untitled");
        assert!(matches!(config.get("nope"), Err(ConfigError::UnknownKey(_))));
    }

    mod data_dir_resolution {
        use super::*;

        #[test]
        fn flag_wins() {
            let global = GlobalConfig {
                data_dir: Some(PathBuf::from("/from/config")),
                ..Default::default()
            };
            let dir = resolve_data_dir(
                Some(Path::new("/from/flag")),
                Some(PathBuf::from("/from/env")),
                &global,
            )
            .unwrap();
            assert_eq!(dir, PathBuf::from("/from/flag"));
        }

        #[test]
        fn env_beats_config() {
            let global = GlobalConfig {
                data_dir: Some(PathBuf::from("/from/config")),
                ..Default::default()
            };
            let dir = resolve_data_dir(None, Some(PathBuf::from("/from/env")), &global).unwrap();
            assert_eq!(dir, PathBuf::from("/from/env"));
        }

        #[test]
        fn empty_env_is_ignored() {
            let global = GlobalConfig {
                data_dir: Some(PathBuf::from("/from/config")),
                ..Default::default()
            };
            let dir = resolve_data_dir(None, Some(PathBuf::new()), &global).unwrap();
            assert_eq!(dir, PathBuf::from("/from/config"));
        }
    }
}
