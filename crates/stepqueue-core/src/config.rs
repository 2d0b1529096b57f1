//! Queue configuration loaded from TOML.
//!
//! ```toml
//! name = "playground"
//! tick_delay_ms = 0
//! log_faults = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Shows up in logs and status views.
    pub name: String,

    /// Delay behind `tick()` when running on tokio. Zero means "next turn".
    pub tick_delay_ms: u64,

    /// Install a `LogReporter` unless another reporter is set explicitly.
    pub log_faults: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: "serial".to_string(),
            tick_delay_ms: 0,
            log_faults: true,
        }
    }
}

impl QueueConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), name = %config.name, "loaded queue config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = QueueConfig::from_toml_str("").unwrap();
        assert_eq!(config, QueueConfig::default());
        assert_eq!(config.tick_delay(), Duration::ZERO);
    }

    #[test]
    fn parses_all_fields() {
        let config = QueueConfig::from_toml_str(
            r#"
            name = "playground"
            tick_delay_ms = 15
            log_faults = false
            "#,
        )
        .unwrap();
        assert_eq!(config.name, "playground");
        assert_eq!(config.tick_delay(), Duration::from_millis(15));
        assert!(!config.log_faults);
    }

    #[test]
    fn rejects_empty_name() {
        let err = QueueConfig::from_toml_str("name = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = QueueConfig::from_toml_str("timeout_ms = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = QueueConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
