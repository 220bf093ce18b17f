//! User configuration for renumbering.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default quiet period before a burst of edits triggers a pass
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading the configuration file.
    #[error("I/O error reading {path}: {error}")]
    Io {
        /// Path to the file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        error: io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("invalid config {path}: {error}")]
    Parse {
        path: PathBuf,
        error: toml::de::Error,
    },
}

/// How the 4-character number field is padded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberPadding {
    /// `   7:` as written by the controller
    #[default]
    Space,
    /// `0007:`
    Zero,
}

impl NumberPadding {
    /// Right-align `number` in a 4-character field
    pub fn format(self, number: usize) -> String {
        match self {
            NumberPadding::Space => format!("{:>4}", number),
            NumberPadding::Zero => format!("{:04}", number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Renumber automatically as the document changes. Manual passes run regardless.
    pub auto_line_renumber: bool,
    /// Debounce delay for change events, in milliseconds
    pub debounce_ms: u64,
    pub number_padding: NumberPadding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_line_renumber: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            number_padding: NumberPadding::Space,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(error) => Err(ConfigError::Io { path: path.to_path_buf(), error }),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
