//! Engine configuration.
//!
//! Loaded from TOML at process start; every field has a default so an empty
//! document is a valid configuration.

use crate::MAX_WORKER_THREADS;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// EngineConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Size of the resolver worker pool.
    pub worker_threads: usize,

    /// Prefix for worker thread names.
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            thread_name: "linkgraph-worker".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.worker_threads > MAX_WORKER_THREADS {
            return Err(ConfigError::Invalid(format!(
                "worker_threads {} exceeds max {MAX_WORKER_THREADS}",
                self.worker_threads
            )));
        }
        if self.thread_name.is_empty() {
            return Err(ConfigError::Invalid("thread_name is empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn parses_worker_threads() {
        let config = EngineConfig::from_toml_str("worker_threads = 8").unwrap();

        assert_eq!(config.worker_threads, 8);
        assert_eq!(config.thread_name, "linkgraph-worker");
    }

    #[test]
    fn rejects_zero_workers() {
        let err = EngineConfig::from_toml_str("worker_threads = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = EngineConfig::from_toml_str("workers = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
