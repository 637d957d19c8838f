//! Google Gemini function declarations: `{name, description, parameters}`.
//!
//! Same envelope as OpenAI, but enum literals must be strings.

use serde_json::Value;
use toolbridge_core::{CanonicalSchema, DialectTag, NodeEncoder, SchemaError, SchemaResult, Visit};

use crate::adapter::{Adapter, EncodeMode, Encoded};
use crate::envelope;

/// The Gemini adapter
pub const ADAPTER: Adapter = Adapter {
    tag: DialectTag::Gemini,
    decode,
    encode,
    field_mappings: &[
        ("name", "name"),
        ("description", "description"),
        ("parameters", "parameters"),
    ],
};

/// Decode a Gemini function declaration
///
/// # Errors
///
/// Returns `Decode` on a malformed envelope or a non-string enum literal
pub fn decode(raw: &Value) -> SchemaResult<CanonicalSchema> {
    let map = envelope::as_object(raw, &envelope::document_path())?;
    let schema = envelope::decode_flat(map, &Default::default(), "parameters")?;

    let mut first_bad = None;
    schema.walk(|visit| {
        if first_bad.is_some() {
            return;
        }
        if let Visit::Node { path, node, .. } = visit {
            let bad = node
                .enum_values
                .iter()
                .flatten()
                .position(|value| !value.is_string());
            if let Some(index) = bad {
                first_bad = Some(path.field("enum").index(index));
            }
        }
    });

    match first_bad {
        Some(field) => Err(SchemaError::decode(field, "enum values must be strings")),
        None => Ok(schema),
    }
}

/// Encode as a Gemini function declaration.
///
/// Non-string enum literals are stringified with a warning, or refused in
/// strict mode.
///
/// # Errors
///
/// Returns `UnsupportedFeature` in strict mode, or error on a cyclic tree
pub fn encode(schema: &CanonicalSchema, mode: EncodeMode) -> SchemaResult<Encoded> {
    let diagnostics = envelope::degrade(schema, DialectTag::Gemini, mode)?;
    let encoder = NodeEncoder::new(schema.arena()).with_stringified_enums(!diagnostics.is_empty());
    let doc = envelope::encode_flat(schema, "parameters", encoder)?;
    Ok(Encoded {
        document: Value::Object(doc),
        diagnostics,
    })
}
