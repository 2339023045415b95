//! Spool Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use spool_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[listener]\nport = 50100").unwrap();
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [listener]
//! port = 50100
//! ```
//!
//! # Example Full Config
//!
//! See `configs/example.toml` for all available options.

mod error;
mod listener;
mod logging;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use listener::ListenerConfig;
pub use logging::{LogConfig, LogFormat, LogLevel};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TCP listener settings (bind address, socket options)
    pub listener: ListenerConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        Ok(config)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.listener.port, 50100);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_minimal_config() {
        let toml = r#"
[listener]
port = 6000
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.listener.port, 6000);
        assert_eq!(config.listener.address, "0.0.0.0");
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[listener]
address = "127.0.0.1"
port = 6000
read_buffer_size = 32768
nodelay = false
keepalive = true
socket_buffer_size = 131072

[log]
level = "debug"
format = "json"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.listener.address, "127.0.0.1");
        assert_eq!(config.listener.port, 6000);
        assert_eq!(config.listener.read_buffer_size, 32768);
        assert!(!config.listener.nodelay);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("invalid { toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Config::from_file("does/not/exist.toml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
