//! Mistral tools: `{type: "function", function: {name, description, parameters}}`.

use serde_json::{Map, Value};
use toolbridge_core::{CanonicalSchema, DialectTag, FieldPath, NodeEncoder, SchemaError, SchemaResult};

use crate::adapter::{Adapter, EncodeMode, Encoded};
use crate::envelope;

/// The Mistral adapter
pub const ADAPTER: Adapter = Adapter {
    tag: DialectTag::Mistral,
    decode,
    encode,
    field_mappings: &[
        ("name", "function.name"),
        ("description", "function.description"),
        ("parameters", "function.parameters"),
    ],
};

/// Decode a Mistral tool definition, unwrapping the function envelope
///
/// # Errors
///
/// Returns `Decode` if `type` is not `"function"`, `function` is not an
/// object, or the inner definition is malformed
pub fn decode(raw: &Value) -> SchemaResult<CanonicalSchema> {
    let map = envelope::as_object(raw, &envelope::document_path())?;

    match map.get("type") {
        Some(Value::String(kind)) if kind == "function" => {}
        Some(other) => {
            return Err(SchemaError::decode(
                FieldPath::root("type"),
                format!("expected \"function\", found {other}"),
            ));
        }
        None => return Err(SchemaError::decode(FieldPath::root("type"), "missing field")),
    }

    let prefix = FieldPath::root("function");
    let inner = match map.get("function") {
        Some(Value::Object(inner)) => inner,
        Some(_) => return Err(SchemaError::decode(prefix, "expected an object")),
        None => return Err(SchemaError::decode(prefix, "missing field")),
    };
    envelope::decode_flat(inner, &prefix, "parameters")
}

/// Encode as a Mistral tool definition, re-wrapping the function envelope
///
/// # Errors
///
/// Returns error if the parameter tree is cyclic
pub fn encode(schema: &CanonicalSchema, _mode: EncodeMode) -> SchemaResult<Encoded> {
    let inner = envelope::encode_flat(schema, "parameters", NodeEncoder::new(schema.arena()))?;
    let mut doc = Map::new();
    doc.insert("type".into(), Value::String("function".into()));
    doc.insert("function".into(), Value::Object(inner));
    Ok(Encoded::clean(Value::Object(doc)))
}
