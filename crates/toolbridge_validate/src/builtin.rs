//! Built-in structural checks.

use toolbridge_core::{
    capability_gaps, is_identifier, CanonicalSchema, Diagnostic, DialectTag, FieldPath, Kind,
    ParamKind, Visit,
};

/// A built-in check. [`Check::ALL`] is the run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// Name non-empty and identifier-shaped
    Name,
    /// Description non-empty
    Description,
    /// Parameters root is an object
    RootObject,
    /// Every `required` entry names a property; the tree is acyclic
    RequiredProperties,
    /// Target dialect can represent the tree
    Capabilities,
    /// `minimum <= maximum`
    NumericBounds,
    /// Enums are not empty
    EnumNonEmpty,
}

impl Check {
    /// Every built-in check, in run order
    pub const ALL: [Check; 7] = [
        Self::Name,
        Self::Description,
        Self::RootObject,
        Self::RequiredProperties,
        Self::Capabilities,
        Self::NumericBounds,
        Self::EnumNonEmpty,
    ];

    /// Run the check, appending findings to `out`.
    ///
    /// Only [`Check::Capabilities`] looks at `strict`.
    pub fn run(
        &self,
        schema: &CanonicalSchema,
        target: DialectTag,
        strict: bool,
        out: &mut Vec<Diagnostic>,
    ) {
        match self {
            Self::Name => check_name(schema, out),
            Self::Description => {
                let problem = match schema.description.as_deref() {
                    None => Some("description is missing"),
                    Some(text) if text.trim().is_empty() => Some("description is empty"),
                    Some(_) => None,
                };
                if let Some(problem) = problem {
                    out.push(Diagnostic::warning(FieldPath::root("description"), problem));
                }
            }
            Self::RootObject => check_root(schema, out),
            Self::RequiredProperties => check_required(schema, out),
            Self::Capabilities => out.extend(
                capability_gaps(schema, target)
                    .iter()
                    .map(|gap| gap.diagnostic(target, strict)),
            ),
            Self::NumericBounds => schema.walk(|visit| {
                if let Visit::Node { path, node, .. } = visit {
                    if let Some((min, max)) = node.kind.inverted_bounds() {
                        out.push(Diagnostic::error(
                            path.clone(),
                            format!("minimum {min} exceeds maximum {max}"),
                        ));
                    }
                }
            }),
            Self::EnumNonEmpty => schema.walk(|visit| {
                if let Visit::Node { path, node, .. } = visit {
                    if node.enum_values.as_ref().is_some_and(Vec::is_empty) {
                        out.push(Diagnostic::warning(path.field("enum"), "enum is empty"));
                    }
                }
            }),
        }
    }
}

fn check_name(schema: &CanonicalSchema, out: &mut Vec<Diagnostic>) {
    let path = FieldPath::root("name");
    if schema.name.is_empty() {
        out.push(Diagnostic::error(path, "tool name is empty"));
    } else if !is_identifier(&schema.name) {
        out.push(Diagnostic::error(
            path,
            format!(
                "tool name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                schema.name
            ),
        ));
    }
}

fn check_root(schema: &CanonicalSchema, out: &mut Vec<Diagnostic>) {
    let path = FieldPath::parameters();
    match schema.parameters() {
        None => out.push(Diagnostic::error(path, "parameters node is missing")),
        Some(node) if node.kind() != Kind::Object => out.push(Diagnostic::error(
            path,
            format!("parameters must be an object, found {}", node.kind()),
        )),
        Some(_) => {}
    }
}

fn check_required(schema: &CanonicalSchema, out: &mut Vec<Diagnostic>) {
    schema.walk(|visit| match visit {
        Visit::Node { path, node, .. } => {
            if let ParamKind::Object {
                properties,
                required,
                ..
            } = &node.kind
            {
                for (index, name) in required.iter().enumerate() {
                    if !properties.contains_key(name) {
                        out.push(Diagnostic::error(
                            path.required(index),
                            format!("required property '{name}' is not defined in properties"),
                        ));
                    }
                }
            }
        }
        Visit::Cycle { path } => {
            out.push(Diagnostic::error(path.clone(), "cyclic reference"));
        }
        // a dangling root is reported by the root check
        Visit::Dangling { path } if path.as_str() != "parameters" => {
            out.push(Diagnostic::error(path.clone(), "dangling node reference"));
        }
        Visit::Dangling { .. } => {}
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;
    use toolbridge_core::{ParamArena, ParamNode, Severity};

    fn run(check: Check, schema: &CanonicalSchema, target: DialectTag, strict: bool) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        check.run(schema, target, strict, &mut out);
        out
    }

    #[test]
    fn test_name_check() {
        let schema = CanonicalSchema::empty("", "d");
        let diags = run(Check::Name, &schema, DialectTag::OpenAI, false);
        assert_eq!(diags[0].message, "tool name is empty");

        let schema = CanonicalSchema::empty("get-weather", "d");
        let diags = run(Check::Name, &schema, DialectTag::OpenAI, false);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].is_error());
    }

    #[test]
    fn test_description_warning_is_not_escalated() {
        let schema = CanonicalSchema::empty("tool", "   ");
        let diags = run(Check::Description, &schema, DialectTag::OpenAI, true);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].message, "description is empty");
    }

    #[test]
    fn test_missing_description_warns() {
        let mut schema = CanonicalSchema::empty("tool", "d");
        schema.description = None;
        let diags = run(Check::Description, &schema, DialectTag::Gemini, false);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path.as_str(), "description");
        assert_eq!(diags[0].message, "description is missing");
    }

    #[test]
    fn test_root_must_be_object() {
        let mut arena = ParamArena::new();
        let item = arena.push(ParamNode::string());
        let root = arena.push(ParamNode::array(item));
        let schema = CanonicalSchema::new("tool", Some("d".to_string()), arena, root);
        let diags = run(Check::RootObject, &schema, DialectTag::OpenAI, false);
        assert_eq!(diags[0].path.as_str(), "parameters");
    }

    #[test]
    fn test_missing_required_property() {
        let mut schema = CanonicalSchema::empty("get_weather", "Get weather");
        let root = schema.root();
        schema.arena_mut().require(root, "location").unwrap();
        let diags = run(Check::RequiredProperties, &schema, DialectTag::OpenAI, false);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path.as_str(), "parameters.required[0]");
        assert!(diags[0].is_error());
    }

    #[test]
    fn test_cycle_reported_once() {
        let mut schema = CanonicalSchema::empty("loop", "d");
        let root = schema.root();
        schema.arena_mut().add_property(root, "again", root).unwrap();
        let diags = run(Check::RequiredProperties, &schema, DialectTag::OpenAI, false);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path.as_str(), "parameters.properties.again");
        assert_eq!(diags[0].message, "cyclic reference");
    }

    #[test]
    fn test_bounds_and_enum() {
        let mut schema = CanonicalSchema::empty("t", "d");
        schema
            .add_property(
                "n",
                ParamNode::number().with_bounds(Number::from_f64(2.5), Some(1.into())),
                false,
            )
            .unwrap();
        schema.add_property("e", ParamNode::string().with_enum(vec![]), false).unwrap();

        let bounds = run(Check::NumericBounds, &schema, DialectTag::OpenAI, false);
        assert_eq!(bounds.len(), 1);
        assert_eq!(bounds[0].message, "minimum 2.5 exceeds maximum 1");

        let enums = run(Check::EnumNonEmpty, &schema, DialectTag::OpenAI, true);
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].path.as_str(), "parameters.properties.e.enum");
        assert_eq!(enums[0].severity, Severity::Warning);
    }

    #[test]
    fn test_capabilities_respect_strict() {
        let mut schema = CanonicalSchema::empty("ship", "Ship");
        schema.add_property("address", ParamNode::object(), false).unwrap();

        let lenient = run(Check::Capabilities, &schema, DialectTag::Cohere, false);
        assert_eq!(lenient[0].severity, Severity::Warning);
        let strict = run(Check::Capabilities, &schema, DialectTag::Cohere, true);
        assert_eq!(strict[0].severity, Severity::Error);
        assert!(run(Check::Capabilities, &schema, DialectTag::Claude, true).is_empty());
    }
}
