//! Field mappings applied to encoded documents.

use serde_json::{Map, Value};
use toolbridge_core::{Diagnostic, DialectTag, FieldMapping, FieldPath};
use tracing::debug;

/// A field mapping that cannot be written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Path has an empty segment
    #[error("invalid mapping path '{path}'")]
    InvalidPath {
        /// The offending path
        path: String,
    },
    /// An intermediate value exists and is not an object
    #[error("cannot write '{path}': '{segment}' is not an object")]
    NotAnObject {
        /// Target path
        path: String,
        /// Segment that blocks the write
        segment: String,
    },
}

/// Apply every mapping for `source -> target` to `document`.
///
/// Values are read from `canonical`, the canonical JSON projection. A
/// missing source value is reported as a warning and skipped.
///
/// # Errors
///
/// Returns [`MappingError`] if a target path cannot be written
pub fn apply_mappings(
    mappings: &[FieldMapping],
    source: DialectTag,
    target: DialectTag,
    canonical: &Value,
    document: &mut Value,
) -> Result<Vec<Diagnostic>, MappingError> {
    let mut diagnostics = Vec::new();
    for mapping in mappings.iter().filter(|m| m.applies(source, target)) {
        for entry in &mapping.mapping {
            let Some(value) = lookup(canonical, &entry.canonical_path) else {
                diagnostics.push(Diagnostic::warning(
                    FieldPath::from(entry.canonical_path.as_str()),
                    format!(
                        "field mapping source not found; '{}' was not written",
                        entry.dialect_path
                    ),
                ));
                continue;
            };
            debug!(
                from = %entry.canonical_path,
                to = %entry.dialect_path,
                transform = %entry.transform,
                "applying field mapping"
            );
            write(document, &entry.dialect_path, entry.transform.apply(value))?;
        }
    }
    Ok(diagnostics)
}

/// Read a dotted path; numeric segments index arrays
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Write a dotted path, creating intermediate objects
fn write(document: &mut Value, path: &str, value: Value) -> Result<(), MappingError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(MappingError::InvalidPath {
            path: path.to_string(),
        });
    }
    let not_object = |segment: &str| MappingError::NotAnObject {
        path: path.to_string(),
        segment: segment.to_string(),
    };

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| MappingError::InvalidPath {
            path: path.to_string(),
        })?;

    let mut current = document.as_object_mut().ok_or_else(|| not_object("$"))?;
    for segment in parents {
        current = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| not_object(*segment))?;
    }
    current.insert((*last).to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolbridge_core::{MappingEntry, Transform};

    fn mapping(entries: Vec<(&str, &str, Transform)>) -> FieldMapping {
        FieldMapping {
            from_dialect: DialectTag::Claude,
            to_dialect: DialectTag::OpenAI,
            mapping: entries
                .into_iter()
                .map(|(from, to, transform)| MappingEntry {
                    canonical_path: from.to_string(),
                    dialect_path: to.to_string(),
                    transform,
                })
                .collect(),
        }
    }

    fn canonical() -> Value {
        json!({
            "name": "get_weather",
            "description": "Get current weather",
            "parameters": {
                "type": "object",
                "properties": {"location": {"type": "string"}},
                "required": ["location"]
            }
        })
    }

    #[test]
    fn test_apply_creates_intermediate_objects() {
        let mut doc = json!({"name": "get_weather"});
        let diags = apply_mappings(
            &[mapping(vec![
                ("name", "metadata.tool_id", Transform::Uppercase),
                ("parameters.required.0", "metadata.primary", Transform::Identity),
            ])],
            DialectTag::Claude,
            DialectTag::OpenAI,
            &canonical(),
            &mut doc,
        )
        .unwrap();
        assert!(diags.is_empty());
        assert_eq!(
            doc,
            json!({"name": "get_weather", "metadata": {"tool_id": "GET_WEATHER", "primary": "location"}})
        );
    }

    #[test]
    fn test_missing_source_is_warning() {
        let mut doc = json!({});
        let diags = apply_mappings(
            &[mapping(vec![("parameters.examples", "examples", Transform::Identity)])],
            DialectTag::Claude,
            DialectTag::OpenAI,
            &canonical(),
            &mut doc,
        )
        .unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path.as_str(), "parameters.examples");
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_other_directions_are_ignored() {
        let mut doc = json!({});
        apply_mappings(
            &[mapping(vec![("name", "alias", Transform::Identity)])],
            DialectTag::OpenAI,
            DialectTag::Claude,
            &canonical(),
            &mut doc,
        )
        .unwrap();
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_write_through_scalar_fails() {
        let mut doc = json!({"name": "get_weather"});
        let err = apply_mappings(
            &[mapping(vec![("description", "name.text", Transform::Identity)])],
            DialectTag::Claude,
            DialectTag::OpenAI,
            &canonical(),
            &mut doc,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MappingError::NotAnObject {
                path: "name.text".to_string(),
                segment: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_segment_is_invalid() {
        let mut doc = json!({});
        let err = apply_mappings(
            &[mapping(vec![("name", "a..b", Transform::Identity)])],
            DialectTag::Claude,
            DialectTag::OpenAI,
            &canonical(),
            &mut doc,
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::InvalidPath { .. }));
    }
}
