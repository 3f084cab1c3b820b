//! Posting defaults read from ~/.config/postfit/config.toml.
//!
//! Holds the limit, the truncation marker and the debug switch. Command-line
//! flags take precedence; anything left unset here keeps its built-in value.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::text::{PostTextError, ValidateOptions, DEFAULT_LIMIT, ELLIPSIS};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Values parsed but are not usable as post options.
    #[error("Invalid value in config file: {0}")]
    Invalid(#[from] PostTextError),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Posting defaults. Any subset of keys may appear in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weighted-length ceiling applied when no `--limit` is given.
    pub limit: usize,

    /// Single-character truncation marker.
    pub ellipsis: char,

    /// Emit the diagnostic report for every validation.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            ellipsis: ELLIPSIS,
            debug: false,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["limit", "ellipsis", "debug"];

    /// Default location: `$HOME/.config/postfit/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("postfit")
                .join("config.toml"),
        )
    }

    /// Reads posting defaults from `path`.
    ///
    /// A missing or blank file means defaults. Unrecognised keys are logged
    /// and skipped. Values that could never produce a valid post (a zero
    /// limit, a marker that normalization would erase) are rejected with
    /// `ConfigError::Invalid`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Size cap before reading
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Raw table pass only to spot misspelled keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.options().check()?;
        tracing::info!(
            path = %path.display(),
            limit = config.limit,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Per-call options carrying these settings.
    pub fn options(&self) -> ValidateOptions {
        ValidateOptions {
            limit: self.limit,
            ellipsis: self.ellipsis,
            debug: self.debug,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
