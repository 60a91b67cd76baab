//! TOML-based configuration for the client binary.
//!
//! Holds connection defaults only — the device itself owns all token state.
//! Fields absent from the file fall back to `#[serde(default)]` values, so
//! the binary works on first run with no config file at all.
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"   # optional; omit to auto-detect
//! baud = 115200
//! probe_on_startup = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

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
}

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub serial: SerialConfig,
}

/// Serial connection defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Fixed port to use. When absent, the binary runs the detection probe
    /// across all enumerated ports instead.
    #[serde(default)]
    pub port: Option<String>,

    /// Baud rate for the session.
    #[serde(default = "default_baud")]
    pub baud: u32,

    /// Whether to probe for the device at startup when no port is fixed.
    #[serde(default = "default_probe_on_startup")]
    pub probe_on_startup: bool,
}

fn default_baud() -> u32 {
    115_200
}

fn default_probe_on_startup() -> bool {
    true
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: default_baud(),
            probe_on_startup: default_probe_on_startup(),
        }
    }
}

impl ClientConfig {
    /// Loads the config from `path`, or returns defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ClientConfig::load_or_default(Path::new("/nonexistent/tokendock.toml"))
            .expect("missing file must not be an error");
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.serial.baud, 115_200);
        assert!(config.serial.probe_on_startup);
        assert!(config.serial.port.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: ClientConfig = toml::from_str(
            r#"
            [serial]
            port = "/dev/ttyUSB0"
            baud = 9600
            probe_on_startup = false
            "#,
        )
        .unwrap();
        assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.serial.baud, 9600);
        assert!(!config.serial.probe_on_startup);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [serial]
            baud = 57600
            "#,
        )
        .unwrap();
        assert_eq!(config.serial.baud, 57_600);
        assert!(config.serial.probe_on_startup);
        assert!(config.serial.port.is_none());
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
