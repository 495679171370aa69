//! Engine configuration
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Query engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Emit QUERY_* log lines (default: false)
    #[serde(default)]
    pub log_queries: bool,

    /// Queries slower than this log QUERY_SLOW (default: 1000)
    #[serde(default = "default_slow_query_threshold_ms")]
    pub slow_query_threshold_ms: u64,

    /// Fail queries whose final result exceeds this many rows (default: none)
    #[serde(default)]
    pub max_result_rows: Option<usize>,
}

fn default_slow_query_threshold_ms() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_queries: false,
            slow_query_threshold_ms: default_slow_query_threshold_ms(),
            max_result_rows: None,
        }
    }
}

impl EngineConfig {
    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON config document
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Config with query logging turned on
    pub fn with_logging(mut self) -> Self {
        self.log_queries = true;
        self
    }

    /// Config with a result size cap
    pub fn with_max_result_rows(mut self, max: usize) -> Self {
        self.max_result_rows = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(!config.log_queries);
        assert_eq!(config.slow_query_threshold_ms, 1000);
        assert_eq!(config.max_result_rows, None);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(
            EngineConfig::from_json_str("{}").unwrap(),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_partial_document() {
        let config = EngineConfig::from_json_str(r#"{"max_result_rows": 500}"#).unwrap();
        assert_eq!(config.max_result_rows, Some(500));
        assert_eq!(config.slow_query_threshold_ms, 1000);
    }

    #[test]
    fn test_invalid_document() {
        let err = EngineConfig::from_json_str(r#"{"log_queries": "yes"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_queries": true, "slow_query_threshold_ms": 50}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(config.log_queries);
        assert_eq!(config.slow_query_threshold_ms, 50);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/livequery.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_logging()
            .with_max_result_rows(10);
        assert!(config.log_queries);
        assert_eq!(config.max_result_rows, Some(10));
    }
}
