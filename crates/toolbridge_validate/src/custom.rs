//! Custom rules supplied as configuration.
//!
//! A rule's `definition` is a JSON object tagged by `check`:
//!
//! ```json
//! {"check": "max_length", "field": "description", "value": 1024, "severity": "warning"}
//! ```
//!
//! Definitions are compiled once; evaluating a compiled rule never fails.

use regex::Regex;
use serde::Deserialize;
use toolbridge_core::{
    CanonicalSchema, Diagnostic, DialectTag, FieldPath, Kind, ParamKind, Severity,
    ValidationRule, Visit,
};
use tracing::debug;

/// A custom rule definition that cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Definition does not match any known check
    #[error("rule '{rule}': invalid definition: {reason}")]
    InvalidDefinition {
        /// Rule name
        rule: String,
        /// Parse failure
        reason: String,
    },
    /// `pattern` is not a valid regex
    #[error("rule '{rule}': invalid pattern: {reason}")]
    InvalidPattern {
        /// Rule name
        rule: String,
        /// Regex compile failure
        reason: String,
    },
    /// `forbid_kind` names an unknown type
    #[error("rule '{rule}': unknown kind '{kind}'")]
    UnknownKind {
        /// Rule name
        rule: String,
        /// The unknown type name
        kind: String,
    },
}

/// Top-level text field a check can look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    /// The tool name
    Name,
    /// The tool description
    Description,
}

impl TextField {
    fn read<'a>(&self, schema: &'a CanonicalSchema) -> &'a str {
        match self {
            Self::Name => &schema.name,
            Self::Description => schema.description_text(),
        }
    }

    fn path(&self) -> FieldPath {
        match self {
            Self::Name => FieldPath::root("name"),
            Self::Description => FieldPath::root("description"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
enum Definition {
    MaxLength { field: TextField, value: usize },
    Pattern { field: TextField, pattern: String },
    MaxProperties { value: usize },
    RequirePropertyDescriptions,
    ForbidKind { kind: String },
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(flatten)]
    definition: Definition,
    #[serde(default)]
    severity: Option<Severity>,
}

#[derive(Debug, Clone)]
enum CompiledCheck {
    MaxLength { field: TextField, value: usize },
    Pattern { field: TextField, regex: Regex },
    MaxProperties { value: usize },
    RequirePropertyDescriptions,
    ForbidKind { kind: Kind },
}

/// A custom rule ready to evaluate
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: String,
    dialect: DialectTag,
    message: String,
    severity: Severity,
    check: CompiledCheck,
}

impl CompiledRule {
    /// Compile a rule definition
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the definition is unknown or malformed
    pub fn compile(rule: &ValidationRule) -> Result<Self, RuleError> {
        let body: Body = serde_json::from_value(rule.definition.clone()).map_err(|e| {
            RuleError::InvalidDefinition {
                rule: rule.rule_name.clone(),
                reason: e.to_string(),
            }
        })?;

        let check = match body.definition {
            Definition::MaxLength { field, value } => CompiledCheck::MaxLength { field, value },
            Definition::Pattern { field, pattern } => CompiledCheck::Pattern {
                field,
                regex: Regex::new(&pattern).map_err(|e| RuleError::InvalidPattern {
                    rule: rule.rule_name.clone(),
                    reason: e.to_string(),
                })?,
            },
            Definition::MaxProperties { value } => CompiledCheck::MaxProperties { value },
            Definition::RequirePropertyDescriptions => CompiledCheck::RequirePropertyDescriptions,
            Definition::ForbidKind { kind } => CompiledCheck::ForbidKind {
                kind: Kind::parse(&kind).ok_or_else(|| RuleError::UnknownKind {
                    rule: rule.rule_name.clone(),
                    kind,
                })?,
            },
        };

        Ok(Self {
            name: rule.rule_name.clone(),
            dialect: rule.dialect,
            message: rule.error_message.clone(),
            severity: body.severity.unwrap_or(Severity::Error),
            check,
        })
    }

    /// Rule name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dialect the rule applies to
    #[must_use]
    pub fn dialect(&self) -> DialectTag {
        self.dialect
    }

    /// Evaluate against `schema`, appending findings to `out`
    pub fn evaluate(&self, schema: &CanonicalSchema, out: &mut Vec<Diagnostic>) {
        let before = out.len();
        match &self.check {
            CompiledCheck::MaxLength { field, value } => {
                if field.read(schema).chars().count() > *value {
                    out.push(self.finding(field.path()));
                }
            }
            CompiledCheck::Pattern { field, regex } => {
                if !regex.is_match(field.read(schema)) {
                    out.push(self.finding(field.path()));
                }
            }
            CompiledCheck::MaxProperties { value } => {
                if schema.properties().count() > *value {
                    out.push(self.finding(FieldPath::parameters()));
                }
            }
            CompiledCheck::RequirePropertyDescriptions => schema.walk(|visit| {
                let Visit::Node { path, node, .. } = visit else {
                    return;
                };
                let ParamKind::Object { properties, .. } = &node.kind else {
                    return;
                };
                for (name, child) in properties {
                    let described = schema
                        .node(*child)
                        .and_then(|child| child.description.as_deref())
                        .is_some_and(|text| !text.trim().is_empty());
                    if !described {
                        out.push(self.finding(path.property(name)));
                    }
                }
            }),
            CompiledCheck::ForbidKind { kind } => schema.walk(|visit| {
                if let Visit::Node { path, node, .. } = visit {
                    if node.kind() == *kind {
                        out.push(self.finding(path.clone()));
                    }
                }
            }),
        }
        if out.len() > before {
            debug!(rule = %self.name, findings = out.len() - before, "custom rule failed");
        }
    }

    fn finding(&self, path: FieldPath) -> Diagnostic {
        Diagnostic {
            path,
            severity: self.severity,
            message: format!("{}: {}", self.name, self.message),
        }
    }
}

/// Compile every `Custom` rule in `rules`, keeping their order.
///
/// Rules of other types are skipped.
///
/// # Errors
///
/// Returns the first [`RuleError`]
pub fn compile_rules(rules: &[ValidationRule]) -> Result<Vec<CompiledRule>, RuleError> {
    rules
        .iter()
        .filter(|rule| rule.rule_type == toolbridge_core::RuleType::Custom)
        .map(CompiledRule::compile)
        .collect()
}
