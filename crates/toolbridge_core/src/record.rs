//! Configuration records owned by an external store.
//!
//! The engine only reads these; loading and persisting them is the
//! caller's business.

use crate::dialect::DialectTag;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Value transform applied by a field mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Copy the value unchanged
    #[default]
    Identity,
    /// Render the value as a JSON string
    ToString,
    /// Lowercase string values
    Lowercase,
    /// Uppercase string values
    Uppercase,
}

impl Transform {
    /// Apply the transform. Case transforms leave non-strings untouched.
    #[must_use]
    pub fn apply(&self, value: &Value) -> Value {
        match (self, value) {
            (Self::Identity, v) => v.clone(),
            (Self::ToString, Value::String(s)) => Value::String(s.clone()),
            (Self::ToString, v) => Value::String(v.to_string()),
            (Self::Lowercase, Value::String(s)) => Value::String(s.to_lowercase()),
            (Self::Uppercase, Value::String(s)) => Value::String(s.to_uppercase()),
            (Self::Lowercase | Self::Uppercase, v) => v.clone(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::ToString => "to_string",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
        };
        f.write_str(name)
    }
}

/// One `canonical_path -> dialect_path` rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Dotted path into the canonical JSON projection
    pub canonical_path: String,
    /// Dotted path into the encoded target document
    pub dialect_path: String,
    /// Transform applied on the way
    #[serde(default)]
    pub transform: Transform,
}

/// Ordered field rewrites between two dialects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Source dialect
    pub from_dialect: DialectTag,
    /// Target dialect
    pub to_dialect: DialectTag,
    /// Rewrites, applied in order
    pub mapping: Vec<MappingEntry>,
}

impl FieldMapping {
    /// Check if the mapping applies to a conversion
    #[must_use]
    pub fn applies(&self, source: DialectTag, target: DialectTag) -> bool {
        self.from_dialect == source && self.to_dialect == target
    }
}

/// Rule category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Field must be present
    Required,
    /// Field may be present
    Optional,
    /// Field must follow a format
    Format,
    /// Interpreted by the custom rule engine
    Custom,
}

/// Externally supplied validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Dialect the rule applies to
    pub dialect: DialectTag,
    /// Unique rule name, used as message prefix
    pub rule_name: String,
    /// Rule category
    pub rule_type: RuleType,
    /// Rule body
    #[serde(default)]
    pub definition: Value,
    /// Message reported when the rule fails
    pub error_message: String,
}

impl ValidationRule {
    /// Whether the custom rule engine should run this rule for `target`
    #[must_use]
    pub fn is_custom_for(&self, target: DialectTag) -> bool {
        self.rule_type == RuleType::Custom && self.dialect == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_apply() {
        assert_eq!(Transform::Identity.apply(&json!(3)), json!(3));
        assert_eq!(Transform::ToString.apply(&json!(3)), json!("3"));
        assert_eq!(Transform::ToString.apply(&json!("a")), json!("a"));
        assert_eq!(Transform::Uppercase.apply(&json!("Get")), json!("GET"));
        assert_eq!(Transform::Lowercase.apply(&json!(true)), json!(true));
    }

    #[test]
    fn test_field_mapping_deserialize() {
        let mapping: FieldMapping = serde_json::from_value(json!({
            "from_dialect": "anthropic",
            "to_dialect": "openai",
            "mapping": [
                {"canonical_path": "name", "dialect_path": "metadata.tool", "transform": "uppercase"},
                {"canonical_path": "description", "dialect_path": "summary"}
            ]
        }))
        .unwrap();
        assert!(mapping.applies(DialectTag::Claude, DialectTag::OpenAI));
        assert!(!mapping.applies(DialectTag::OpenAI, DialectTag::Claude));
        assert_eq!(mapping.mapping[1].transform, Transform::Identity);
    }

    #[test]
    fn test_rule_is_custom_for() {
        let rule: ValidationRule = serde_json::from_value(json!({
            "dialect": "gemini",
            "rule_name": "short_name",
            "rule_type": "custom",
            "definition": {"check": "max_length", "field": "name", "value": 16},
            "error_message": "name too long"
        }))
        .unwrap();
        assert!(rule.is_custom_for(DialectTag::Gemini));
        assert!(!rule.is_custom_for(DialectTag::OpenAI));
    }
}
