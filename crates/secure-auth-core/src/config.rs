//! Configuration types and loading for the authentication dialog.
//!
//! Configuration is loaded from `~/.config/secure-auth/config.toml`.
//!
//! # Error Handling
//!
//! - If the config file doesn't exist, default values are returned.
//! - If the config file exists but is invalid, an error is returned (fail fast).
//!
//! # Example Configuration
//!
//! ```toml
//! [dialog]
//! max_input_len = 256         # UTF-16 code units
//! mask_char = "*"
//! caption_label = "authentication"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::secret::{DEFAULT_MASK_CHAR, MAX_INPUT_LEN};

/// Label used for the dialog caption when none is configured.
pub const DEFAULT_CAPTION_LABEL: &str = "authentication";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but holds unusable values.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Dialog configuration.
    pub dialog: DialogConfig,
}

/// Settings for the secret entry dialog.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DialogConfig {
    /// Maximum secret length in UTF-16 code units (default: 256).
    pub max_input_len: usize,
    /// Glyph painted in place of each character while masked (default: `*`).
    pub mask_char: char,
    /// Fixed part of the window caption (default: "authentication").
    pub caption_label: String,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            max_input_len: MAX_INPUT_LEN,
            mask_char: DEFAULT_MASK_CHAR,
            caption_label: DEFAULT_CAPTION_LABEL.to_string(),
        }
    }
}

impl DialogConfig {
    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_len == 0 {
            return Err(ConfigError::Invalid(
                "dialog.max_input_len must be at least 1".to_string(),
            ));
        }
        if self.mask_char.is_control() || self.mask_char.is_whitespace() {
            return Err(ConfigError::Invalid(
                "dialog.mask_char must be a visible character".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Returns the default configuration file path.
    ///
    /// Returns `~/.config/secure-auth/config.toml` using `dirs::config_dir()`,
    /// or `None` if the config directory cannot be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("secure-auth").join("config.toml"))
    }

    /// Load configuration from the default path.
    ///
    /// - Returns `Ok(Config::default())` if no config file exists.
    /// - Returns `Err` if the file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.dialog.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_values() {
        let config = Config::default();

        assert_eq!(config.dialog.max_input_len, MAX_INPUT_LEN);
        assert_eq!(config.dialog.mask_char, '*');
        assert_eq!(config.dialog.caption_label, "authentication");
        assert!(config.dialog.validate().is_ok());
    }

    #[test]
    fn load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[dialog]
max_input_len = 64
mask_char = "•"
caption_label = "HMAC key"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).expect("Should parse");

        assert_eq!(config.dialog.max_input_len, 64);
        assert_eq!(config.dialog.mask_char, '•');
        assert_eq!(config.dialog.caption_label, "HMAC key");
    }

    #[test]
    fn load_partial_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[dialog]
max_input_len = 32
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).expect("Should parse");

        assert_eq!(config.dialog.max_input_len, 32);
        assert_eq!(config.dialog.mask_char, '*');
        assert_eq!(config.dialog.caption_label, "authentication");
    }

    #[test]
    fn load_empty_config_returns_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = Config::load_from(file.path()).expect("Should parse empty file");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_invalid_config_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let result = Config::load_from(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file_returns_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn zero_length_limit_is_rejected() {
        let result = Config::parse("[dialog]\nmax_input_len = 0\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Invalid(_)));
    }

    #[test]
    fn invisible_mask_char_is_rejected() {
        let result = Config::parse("[dialog]\nmask_char = \" \"\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Invalid(_)));

        let result = Config::parse("[dialog]\nmask_char = \"\\t\"\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Invalid(_)));
    }

    #[test]
    fn default_path_returns_config_dir() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("secure-auth/config.toml"));
        }
    }
}
