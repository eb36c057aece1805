// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer configuration.
//!
//! Supports both programmatic and file-based configuration.
//!
//! ```toml
//! strategy = "reflection_only"
//! max_items_in_object_graph = 10000
//! ```

use crate::strategy::StrategyMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default item quota per read or write operation.
pub const DEFAULT_MAX_ITEMS_IN_OBJECT_GRAPH: usize = 65_536;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Process-level serializer settings, fixed once contracts are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializerConfig {
    /// Which strategy builds the collection procedures.
    #[serde(default)]
    pub strategy: StrategyMode,

    /// Maximum items read or written by one top-level operation.
    #[serde(default = "default_max_items")]
    pub max_items_in_object_graph: usize,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS_IN_OBJECT_GRAPH
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyMode::default(),
            max_items_in_object_graph: DEFAULT_MAX_ITEMS_IN_OBJECT_GRAPH,
        }
    }
}

impl SerializerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the strategy mode.
    pub fn with_strategy(mut self, strategy: StrategyMode) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the item quota.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items_in_object_graph = max_items;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items_in_object_graph == 0 {
            return Err(ConfigError::Invalid(
                "max_items_in_object_graph must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SerializerConfig::default();
        assert_eq!(config.strategy, StrategyMode::Compiled);
        assert_eq!(config.max_items_in_object_graph, 65_536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = SerializerConfig::from_toml_str(
            r#"
            strategy = "reflection_only"
            max_items_in_object_graph = 10
            "#,
        )
        .expect("parse");
        assert_eq!(config.strategy, StrategyMode::ReflectionOnly);
        assert_eq!(config.max_items_in_object_graph, 10);
    }

    #[test]
    fn test_parse_defaults_and_unknown_fields() {
        let config = SerializerConfig::from_toml_str("").expect("empty is default");
        assert_eq!(config, SerializerConfig::default());

        assert!(matches!(
            SerializerConfig::from_toml_str("strategy = \"jit\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            SerializerConfig::from_toml_str("verbose = true"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_invalid_quota() {
        let err = SerializerConfig::from_toml_str("max_items_in_object_graph = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "strategy = \"compiled\"").expect("write");
        let config = SerializerConfig::from_file(file.path()).expect("load");
        assert_eq!(config.strategy, StrategyMode::Compiled);

        assert!(matches!(
            SerializerConfig::from_file("/nonexistent/contract-json.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
