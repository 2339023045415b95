//! Logging configuration
//!
//! Governs spool's own diagnostic output (the tracing subscriber the
//! binary installs), not the log records ingested from clients.

use serde::Deserialize;

/// Verbosity of spool's own diagnostics
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-chunk parser tracing
    Trace,
    /// Connection and handshake detail
    Debug,
    /// Startup, shutdown and per-process lifecycle (default)
    #[default]
    Info,
    /// Suspicious but non-fatal conditions
    Warn,
    /// Failures only
    Error,
}

impl LogLevel {
    /// Directive string for the tracing env filter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Shape of the diagnostic output
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines (default)
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// Logging section of the configuration file
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Verbosity (trace, debug, info, warn, error).
    /// Default: info
    pub level: LogLevel,

    /// Output shape (console, json).
    /// Default: console
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_info_console() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
    }

    #[test]
    fn test_section_parses() {
        let toml = r#"
level = "warn"
format = "json"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_every_level_has_a_filter_directive() {
        for (name, level) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let config: LogConfig = toml::from_str(&format!("level = \"{name}\"")).unwrap();
            assert_eq!(config.level, level);
            assert_eq!(config.level.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        assert!(toml::from_str::<LogConfig>(r#"level = "verbose""#).is_err());
    }
}
