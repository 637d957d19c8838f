//! Cohere tools: `{name, description, parameter_definitions}`.
//!
//! `parameter_definitions` is a flat map from parameter name to
//! `{type, description, required}`. Nested objects, and arrays of objects
//! or arrays, have no spelling here and are flattened or refused.

use serde_json::{Map, Value};
use toolbridge_core::{
    decode_node, CanonicalSchema, DialectTag, FieldPath, NodeEncoder, NodeId, ParamArena,
    ParamNode, SchemaError, SchemaResult,
};

use crate::adapter::{Adapter, EncodeMode, Encoded};
use crate::envelope;

const PARAMS_FIELD: &str = "parameter_definitions";

/// The Cohere adapter
pub const ADAPTER: Adapter = Adapter {
    tag: DialectTag::Cohere,
    decode,
    encode,
    field_mappings: &[
        ("name", "name"),
        ("description", "description"),
        ("parameters", "parameter_definitions"),
        ("parameters.required", "parameter_definitions.*.required"),
    ],
};

/// Decode a Cohere tool, synthesizing an object root from the flat map
///
/// # Errors
///
/// Returns `Decode` on a malformed envelope, a non-object entry or a
/// non-boolean `required` flag
pub fn decode(raw: &Value) -> SchemaResult<CanonicalSchema> {
    let map = envelope::as_object(raw, &envelope::document_path())?;
    let (name, description) = envelope::decode_header(map, &FieldPath::default())?;

    let defs_path = FieldPath::root(PARAMS_FIELD);
    let defs = match map.get(PARAMS_FIELD) {
        Some(Value::Object(defs)) => defs,
        Some(_) => return Err(SchemaError::decode(defs_path, "expected an object")),
        None => return Err(SchemaError::decode(defs_path, "missing field")),
    };

    let mut arena = ParamArena::new();
    let root = arena.push(ParamNode::object());
    for (param, entry) in defs {
        let entry_path = defs_path.field(param);
        let mut entry = envelope::as_object(entry, &entry_path)?.clone();
        let required = match entry.remove("required") {
            None => false,
            Some(Value::Bool(flag)) => flag,
            Some(_) => {
                return Err(SchemaError::decode(
                    entry_path.field("required"),
                    "expected a boolean",
                ));
            }
        };
        let child = decode_node(&Value::Object(entry), &entry_path, &mut arena)?;
        arena.add_property(root, param.clone(), child)?;
        if required {
            arena.require(root, param.clone())?;
        }
    }

    Ok(CanonicalSchema::new(name, description, arena, root))
}

/// Encode as a Cohere tool.
///
/// Nested structure is dropped with a warning in lenient mode and refused
/// in strict mode.
///
/// # Errors
///
/// Returns `UnsupportedFeature` in strict mode, or error on a cyclic tree
pub fn encode(schema: &CanonicalSchema, mode: EncodeMode) -> SchemaResult<Encoded> {
    let diagnostics = envelope::degrade(schema, DialectTag::Cohere, mode)?;
    let encoder = NodeEncoder::new(schema.arena());
    let params = FieldPath::parameters();

    let mut defs = Map::new();
    for (param, id) in schema.properties() {
        let path = params.property(param);
        let flagged = diagnostics.iter().any(|diag| diag.path == path);
        let mut entry = if flagged {
            flatten(schema, id)
        } else {
            encoder.encode(id, &path)?
        };
        entry.insert("required".into(), Value::Bool(schema.is_required(param)));
        defs.insert(param.to_string(), Value::Object(entry));
    }

    let mut doc = envelope::header(schema);
    doc.insert(PARAMS_FIELD.into(), Value::Object(defs));
    Ok(Encoded {
        document: Value::Object(doc),
        diagnostics,
    })
}

/// `{type, description?}` of a node, without its nested structure
fn flatten(schema: &CanonicalSchema, id: NodeId) -> Map<String, Value> {
    let mut entry = Map::new();
    if let Some(node) = schema.node(id) {
        entry.insert("type".into(), Value::String(node.kind().as_str().into()));
        if let Some(description) = &node.description {
            entry.insert("description".into(), Value::String(description.clone()));
        }
    }
    entry
}
