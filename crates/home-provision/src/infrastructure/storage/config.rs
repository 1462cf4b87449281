//! TOML-based provisioning configuration.
//!
//! Read from `/etc/iot-home/provision.toml` by default:
//!
//! ```toml
//! [provision]
//! log_level = "info"
//! # root = "/mnt/sdcard"
//! dry_run = false
//!
//! [[targets]]
//! path = "/boot/config.txt"
//! owner = "root"
//! group = "root"
//! mode = "755"
//! directive = "dtparam=i2c_arm=on"
//!
//! [[targets]]
//! path = "/etc/modules"
//! mode = "644"
//! directive = "i2c-dev"
//! # pattern = '^#\s*(i2c-dev)$'
//! ```
//!
//! # Serde default values
//!
//! Every field except `path` and `directive` has a `#[serde(default = ...)]`
//! helper, and a file without any `[[targets]]` gets the built-in I2C plan.
//! When the file does not exist at all, [`ProvisionConfig::default`] is used.

use std::path::{Path, PathBuf};

use home_core::{EditRule, FileMode, RuleError, TargetFile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::provision::ProvisionTarget;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/iot-home/provision.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A target's directive or pattern is not usable.
    #[error("invalid rule for {path}: {source}")]
    Rule {
        path: PathBuf,
        #[source]
        source: RuleError,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level provisioning configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvisionConfig {
    #[serde(default)]
    pub provision: ProvisionSettings,
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetEntry>,
}

/// Run-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvisionSettings {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Alternate root that all target paths are re-anchored under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub dry_run: bool,
}

/// One file to edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetEntry {
    pub path: PathBuf,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default = "default_mode")]
    pub mode: FileMode,
    /// Line that must be present and uncommented.
    pub directive: String,
    /// Custom normalize pattern; group 1 must capture the directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_owner() -> String {
    "root".to_string()
}
fn default_group() -> String {
    "root".to_string()
}
fn default_mode() -> FileMode {
    FileMode::RW_R_R
}

/// The I2C plan: enable the ARM I2C bus and load the `i2c-dev` module.
fn default_targets() -> Vec<TargetEntry> {
    vec![
        TargetEntry {
            path: PathBuf::from("/boot/config.txt"),
            owner: default_owner(),
            group: default_group(),
            mode: FileMode::RWX_RX_RX,
            directive: "dtparam=i2c_arm=on".to_string(),
            pattern: None,
        },
        TargetEntry {
            path: PathBuf::from("/etc/modules"),
            owner: default_owner(),
            group: default_group(),
            mode: default_mode(),
            directive: "i2c-dev".to_string(),
            pattern: None,
        },
    ]
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            provision: ProvisionSettings::default(),
            targets: default_targets(),
        }
    }
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            root: None,
            dry_run: false,
        }
    }
}

impl TargetEntry {
    /// Compiles this entry into a target plus edit rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rule`] if the directive or pattern is invalid.
    pub fn to_target(&self) -> Result<ProvisionTarget, ConfigError> {
        let rule = match &self.pattern {
            Some(pattern) => EditRule::with_pattern(&self.directive, pattern),
            None => EditRule::uncomment(&self.directive),
        }
        .map_err(|source| ConfigError::Rule {
            path: self.path.clone(),
            source,
        })?;

        let file = TargetFile::new(&self.path, &self.owner, &self.group, self.mode);
        Ok(ProvisionTarget::new(file, rule))
    }
}

impl ProvisionConfig {
    /// Builds the ordered plan, re-anchoring every path under `root` when one
    /// is given (`root` takes precedence over `provision.root`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rule`] for the first invalid target entry.
    pub fn plan(&self, root: Option<&Path>) -> Result<Vec<ProvisionTarget>, ConfigError> {
        let root = root.or(self.provision.root.as_deref());
        self.targets
            .iter()
            .map(|entry| {
                let target = entry.to_target()?;
                Ok(match root {
                    Some(root) => target.rebased(root),
                    None => target,
                })
            })
            .collect()
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads the configuration at `path`, returning [`ProvisionConfig::default`]
/// if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<ProvisionConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProvisionConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
