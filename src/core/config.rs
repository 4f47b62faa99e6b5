//! Writer manager configuration

use super::{error::Result, severity::Severity};
use serde::{Deserialize, Serialize};

/// Prefix used when the configuration does not name one.
pub const DEFAULT_PREFIX: &str = "vectors";

/// Default capacity of the async message queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Threshold and prefix for one writer manager.
///
/// Parsed from JSON such as `{"Level": "warn", "Prefix": "api"}`; `Level` may
/// also be the numeric severity value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    #[serde(rename = "Level", alias = "level")]
    pub level: Severity,
    #[serde(rename = "Prefix", alias = "prefix")]
    pub prefix: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            level: Severity::Debug,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl WriterConfig {
    /// Parse a JSON configuration; an empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = WriterConfig::from_json("").unwrap();
        assert_eq!(config.level, Severity::Debug);
        assert_eq!(config.prefix, DEFAULT_PREFIX);
    }

    #[test]
    fn test_partial_config() {
        let config = WriterConfig::from_json(r#"{"Level": 6}"#).unwrap();
        assert_eq!(config.level, Severity::Warn);
        assert_eq!(config.prefix, DEFAULT_PREFIX);

        let config = WriterConfig::from_json(r#"{"prefix": "api", "level": "info"}"#).unwrap();
        assert_eq!(config.level, Severity::Info);
        assert_eq!(config.prefix, "api");
    }

    #[test]
    fn test_malformed_config() {
        let err = WriterConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));

        let err = WriterConfig::from_json(r#"{"Level": 40}"#).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }
}
