//! Features of the canonical model that some dialects cannot express.
//!
//! The same gap list drives both the encoder (which degrades or refuses)
//! and the validator (which reports), so the two always agree on paths and
//! messages.

use crate::diagnostic::{Diagnostic, FieldPath};
use crate::dialect::DialectTag;
use crate::error::SchemaError;
use crate::schema::{CanonicalSchema, Kind, ParamKind, Visit};

/// A canonical feature a dialect may lack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// An object property, or an array of objects or arrays
    NestedStructure(Kind),
    /// An enum containing a literal that is not a string
    NonStringEnum,
}

impl Feature {
    /// Short noun phrase used in errors
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NestedStructure(Kind::Array) => "arrays of structured items",
            Self::NestedStructure(_) => "nested object parameters",
            Self::NonStringEnum => "non-string enum values",
        }
    }
}

/// One place where a schema uses a feature the target lacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityGap {
    /// Canonical path of the offending node
    pub path: FieldPath,
    /// The missing feature
    pub feature: Feature,
}

impl CapabilityGap {
    /// Explanation shared by encoder warnings and validator diagnostics
    #[must_use]
    pub fn message(&self, dialect: DialectTag) -> String {
        match self.feature {
            Feature::NestedStructure(Kind::Array) => format!(
                "{dialect} cannot represent arrays of structured items; item schema is dropped"
            ),
            Feature::NestedStructure(_) => format!(
                "{dialect} cannot represent nested object parameters; nested structure is dropped"
            ),
            Feature::NonStringEnum => format!(
                "{dialect} requires string enum values; non-string literals are converted to strings"
            ),
        }
    }

    /// Diagnostic for the gap; an error in strict mode, otherwise a warning
    #[must_use]
    pub fn diagnostic(&self, dialect: DialectTag, strict: bool) -> Diagnostic {
        let diag = Diagnostic::warning(self.path.clone(), self.message(dialect));
        if strict { diag.escalate() } else { diag }
    }

    /// Error raised when the encoder refuses to degrade
    #[must_use]
    pub fn into_error(self, dialect: DialectTag) -> SchemaError {
        SchemaError::UnsupportedFeature {
            dialect,
            path: self.path,
            feature: self.feature.describe().to_string(),
        }
    }
}

/// List every capability gap of `schema` against `dialect`, in tree order.
///
/// Nested structure is only checked on top-level properties: a dialect
/// without nesting flattens there and never looks deeper.
#[must_use]
pub fn capability_gaps(schema: &CanonicalSchema, dialect: DialectTag) -> Vec<CapabilityGap> {
    let caps = dialect.capabilities();
    let mut gaps = Vec::new();

    if !caps.nested_structures {
        let params = FieldPath::parameters();
        for (name, id) in schema.properties() {
            let Some(node) = schema.node(id) else {
                continue;
            };
            let nested = match &node.kind {
                ParamKind::Object { .. } => Some(Kind::Object),
                ParamKind::Array { items } => schema
                    .node(*items)
                    .filter(|item| item.kind().is_structured())
                    .map(|_| Kind::Array),
                _ => None,
            };
            if let Some(kind) = nested {
                gaps.push(CapabilityGap {
                    path: params.property(name),
                    feature: Feature::NestedStructure(kind),
                });
            }
        }
    }

    if !caps.non_string_enums {
        schema.walk(|visit| {
            if let Visit::Node { path, node, .. } = visit {
                let mixed = node
                    .enum_values
                    .as_ref()
                    .is_some_and(|values| values.iter().any(|v| !v.is_string()));
                if mixed {
                    gaps.push(CapabilityGap {
                        path: path.clone(),
                        feature: Feature::NonStringEnum,
                    });
                }
            }
        });
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParamNode;
    use serde_json::json;

    fn with_address() -> CanonicalSchema {
        let mut schema = CanonicalSchema::empty("ship", "Ship a parcel");
        let city = schema.arena_mut().push(ParamNode::string());
        let address = schema.add_property("address", ParamNode::object(), true).unwrap();
        schema.arena_mut().add_property(address, "city", city).unwrap();
        schema.add_property("weight", ParamNode::number(), true).unwrap();
        schema
    }

    #[test]
    fn test_cohere_flags_nested_object() {
        let gaps = capability_gaps(&with_address(), DialectTag::Cohere);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].path.as_str(), "parameters.properties.address");
        assert_eq!(gaps[0].feature, Feature::NestedStructure(Kind::Object));

        let diag = gaps[0].diagnostic(DialectTag::Cohere, false);
        assert!(!diag.is_error());
        assert!(diag.message.starts_with("cohere cannot represent nested object"));
        assert!(gaps[0].diagnostic(DialectTag::Cohere, true).is_error());
    }

    #[test]
    fn test_cohere_allows_scalar_arrays() {
        let mut schema = CanonicalSchema::empty("tag", "Tag items");
        let item = schema.arena_mut().push(ParamNode::string());
        schema.add_property("tags", ParamNode::array(item), false).unwrap();
        assert!(capability_gaps(&schema, DialectTag::Cohere).is_empty());

        let row = schema.arena_mut().push(ParamNode::object());
        schema.add_property("rows", ParamNode::array(row), false).unwrap();
        let gaps = capability_gaps(&schema, DialectTag::Cohere);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].feature, Feature::NestedStructure(Kind::Array));
    }

    #[test]
    fn test_nesting_is_fine_elsewhere() {
        for tag in [DialectTag::OpenAI, DialectTag::Claude, DialectTag::Mistral] {
            assert!(capability_gaps(&with_address(), tag).is_empty());
        }
    }

    #[test]
    fn test_gemini_flags_non_string_enum() {
        let mut schema = CanonicalSchema::empty("pick", "Pick a level");
        schema
            .add_property("level", ParamNode::integer().with_enum(vec![json!(1), json!(2)]), true)
            .unwrap();
        schema
            .add_property("mode", ParamNode::string().with_enum(vec![json!("a")]), false)
            .unwrap();

        let gaps = capability_gaps(&schema, DialectTag::Gemini);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].path.as_str(), "parameters.properties.level");

        let err = gaps[0].clone().into_error(DialectTag::Gemini);
        assert_eq!(
            err.to_string(),
            "gemini cannot represent non-string enum values at parameters.properties.level"
        );
    }
}
