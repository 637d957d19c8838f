//! Engine configuration.
//!
//! A JSON document holding the externally owned records the engine
//! consumes:
//!
//! ```json
//! {
//!   "default_strict": false,
//!   "rules": [ { "dialect": "cohere", "rule_name": "...", "rule_type": "custom", ... } ],
//!   "field_mappings": [ { "from_dialect": "claude", "to_dialect": "openai", "mapping": [...] } ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use toolbridge_core::{FieldMapping, ValidationRule};
use toolbridge_validate::{compile_rules, RuleError};

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {reason}")]
    Io {
        /// Config path
        path: String,
        /// OS error
        reason: String,
    },
    /// Not a valid config document
    #[error("invalid config: {0}")]
    Parse(String),
    /// A custom rule does not compile
    #[error("invalid config: {0}")]
    Rule(#[from] RuleError),
}

/// Records and defaults the engine runs with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Strictness used when a request does not say
    pub default_strict: bool,
    /// Validation rules; only `custom` rules are interpreted
    pub rules: Vec<ValidationRule>,
    /// Field mappings applied after encode
    pub field_mappings: Vec<FieldMapping>,
}

impl EngineConfig {
    /// Load from a JSON file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is invalid
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// Parse from JSON text. Custom rules are compiled eagerly.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a config document or a custom
    /// rule does not compile
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        compile_rules(&config.rules)?;
        Ok(config)
    }
}
