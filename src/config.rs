//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/genealogy/genealogy.toml`
//! 3. Local config: `<dir>/.genealogy.toml`
//! 4. Environment variables: `GENEALOGY_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ::config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{SettingsError, SettingsResult};

/// What `create_with_parents` does when handed an empty parent list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyParentsPolicy {
    /// Fail with `GenealogyError::EmptyParents`
    #[default]
    Reject,
    /// Return success without creating anything
    Ignore,
}

impl FromStr for EmptyParentsPolicy {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("reject") {
            Ok(Self::Reject)
        } else if s.eq_ignore_ascii_case("ignore") {
            Ok(Self::Ignore)
        } else {
            Err(SettingsError::InvalidPolicy(s.to_string()))
        }
    }
}

impl fmt::Display for EmptyParentsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

/// Behavioural settings of a genealogy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub empty_parents: EmptyParentsPolicy,
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub empty_parents: Option<EmptyParentsPolicy>,
}

/// Get the XDG config directory for genealogy.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "genealogy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("genealogy.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".genealogy.toml")
}

/// Environment source for `GENEALOGY_*` overrides.
///
/// Nested keys use `__`; the prefix itself is joined with a single `_`.
pub fn env_source() -> Environment {
    Environment::with_prefix("GENEALOGY")
        .prefix_separator("_")
        .separator("__")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> SettingsResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            empty_parents: overlay.empty_parents.unwrap_or(self.empty_parents),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.genealogy.toml`
    pub fn load(local_dir: Option<&Path>) -> SettingsResult<Self> {
        Self::load_with(global_config_path().as_deref(), local_dir, env_source())
    }

    /// Load settings from explicit sources.
    ///
    /// Missing files are skipped; unreadable or malformed ones are errors.
    #[instrument(level = "debug", skip(env))]
    pub fn load_with(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
        env: Environment,
    ) -> SettingsResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables
        current = current.apply_env_overrides(env)?;

        debug!(empty_parents = %current.empty_parents, "settings loaded");
        Ok(current)
    }

    fn apply_env_overrides(mut self, env: Environment) -> SettingsResult<Self> {
        let config = Config::builder().add_source(env).build()?;
        if let Ok(val) = config.get_string("empty_parents") {
            self.empty_parents = val.parse()?;
        }
        Ok(self)
    }
}
