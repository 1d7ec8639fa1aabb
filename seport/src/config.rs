//! Configuration for the seport library.
//!
//! Configuration is merged from explicit overrides, environment
//! variables, and an optional YAML file, in that order of precedence:
//!
//! 1. Builder overrides (typically CLI flags)
//! 2. `SEPORT_SEMANAGE`, `SEPORT_MLS_RANGE`, `SEPORT_NORELOAD`
//! 3. `~/.config/seport/config.yaml`
//! 4. Built-in defaults

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the `semanage` binary.
    pub semanage_path: PathBuf,

    /// MLS/MCS range applied to additions unless overridden per call.
    pub default_mls_range: String,

    /// Whether mutations reload the active policy by default.
    pub reload: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            semanage_path: PathBuf::from("semanage"),
            default_mls_range: crate::binding::DEFAULT_MLS_RANGE.into(),
            reload: true,
        }
    }
}

/// On-disk configuration schema; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    semanage_path: Option<PathBuf>,
    default_mls_range: Option<String>,
    reload: Option<bool>,
}

/// Builder merging configuration sources.
///
/// # Examples
///
/// ```
/// use seport::ConfigBuilder;
///
/// let config = ConfigBuilder::new().build().unwrap();
/// assert_eq!(config.default_mls_range, "s0");
/// assert!(config.reload);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    semanage_path: Option<PathBuf>,
    default_mls_range: Option<String>,
    reload: Option<bool>,
}

impl ConfigBuilder {
    /// Creates a builder with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads configuration from an explicit file instead of the default
    /// location. Unlike the default location, an explicit file must exist.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Overrides the `semanage` binary path.
    #[must_use]
    pub fn with_semanage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.semanage_path = Some(path.into());
        self
    }

    /// Overrides the default MLS/MCS range.
    #[must_use]
    pub fn with_default_mls_range(mut self, mls_range: impl Into<String>) -> Self {
        self.default_mls_range = Some(mls_range.into());
        self
    }

    /// Overrides the default reload policy.
    #[must_use]
    pub fn with_reload(mut self, reload: bool) -> Self {
        self.reload = Some(reload);
        self
    }

    /// Resolves the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given configuration file cannot
    /// be read, or if any configuration file fails to parse.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        // File layer.
        let file = match &self.config_file {
            Some(path) => Some(read_config_file(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(read_config_file(&path)?),
                _ => None,
            },
        };
        if let Some(file) = file {
            if let Some(path) = file.semanage_path {
                config.semanage_path = path;
            }
            if let Some(mls_range) = file.default_mls_range {
                config.default_mls_range = mls_range;
            }
            if let Some(reload) = file.reload {
                config.reload = reload;
            }
        }

        // Environment layer.
        if let Ok(path) = env::var("SEPORT_SEMANAGE") {
            if !path.trim().is_empty() {
                config.semanage_path = PathBuf::from(path);
            }
        }
        if let Ok(mls_range) = env::var("SEPORT_MLS_RANGE") {
            if !mls_range.trim().is_empty() {
                config.default_mls_range = mls_range;
            }
        }
        if let Ok(noreload) = env::var("SEPORT_NORELOAD") {
            if matches!(noreload.trim(), "1" | "true" | "yes") {
                config.reload = false;
            }
        }

        // Explicit overrides.
        if let Some(path) = self.semanage_path {
            config.semanage_path = path;
        }
        if let Some(mls_range) = self.default_mls_range {
            config.default_mls_range = mls_range;
        }
        if let Some(reload) = self.reload {
            config.reload = reload;
        }

        Ok(config)
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

fn default_config_path() -> Option<PathBuf> {
    home::home_dir().map(|dir| dir.join(".config").join("seport").join("config.yaml"))
}
