//! Scan configuration loaded from TOML.
//!
//! Every setting is optional and the defaults reproduce the plain engine
//! behavior: nothing is filtered, an unreadable file aborts the scan, and
//! reports are printed as text.
//!
//! # Configuration File Format
//!
//! ```toml
//! [scan]
//! on_hash_error = "abort"   # or "ignore"
//!
//! [filters]
//! skip_hidden = false
//! exclude = ["*.swp", "~*"]
//!
//! [report]
//! format = "text"           # or "json"
//! ```

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_NAME: &str = ".sortdeskrc.toml";

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What the scanner does when a validated file cannot be hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFailurePolicy {
    /// Stop the whole scan with an error.
    #[default]
    Abort,
    /// Log a warning, record the file as ignored and keep going.
    Ignore,
}

/// Report rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub filters: FilterRules,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSection {
    #[serde(default)]
    pub on_hash_error: HashFailurePolicy,
}

/// Entries matching these rules are skipped during enumeration, exactly like
/// directories: they never show up in any part of the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Skip entries whose name starts with `.`.
    #[serde(default)]
    pub skip_hidden: bool,

    /// Glob patterns matched against the file name (e.g. `"*.swp"`).
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub format: ReportFormat,
}

impl ScanConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided (must exist)
    /// 2. `.sortdeskrc.toml` in the current directory
    /// 3. `~/.config/sortdesk/config.toml`
    /// 4. Defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed, or if an
    /// explicitly provided file does not exist.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_NAME);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortdesk")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&content).map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Pre-compile the filter rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlobPattern`] for the first bad pattern.
    pub fn compile_filters(&self) -> Result<EntryFilter, ConfigError> {
        EntryFilter::new(&self.filters)
    }
}

/// Compiled form of [`FilterRules`].
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    skip_hidden: bool,
    exclude: Vec<Pattern>,
}

impl EntryFilter {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude = rules
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            exclude,
        })
    }

    /// Returns `true` if the entry at `path` takes part in the scan.
    pub fn allows(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        !self
            .exclude
            .iter()
            .any(|pattern| pattern.matches(&file_name))
    }
}
