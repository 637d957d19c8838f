//! Anthropic Claude tools: `{name, description, input_schema}`.

use serde_json::Value;
use toolbridge_core::{CanonicalSchema, DialectTag, NodeEncoder, SchemaResult};

use crate::adapter::{Adapter, EncodeMode, Encoded};
use crate::envelope;

/// The Claude adapter
pub const ADAPTER: Adapter = Adapter {
    tag: DialectTag::Claude,
    decode,
    encode,
    field_mappings: &[
        ("name", "name"),
        ("description", "description"),
        ("parameters", "input_schema"),
    ],
};

/// Decode a Claude tool definition
///
/// # Errors
///
/// Returns `Decode` on a missing or malformed envelope field
pub fn decode(raw: &Value) -> SchemaResult<CanonicalSchema> {
    let map = envelope::as_object(raw, &envelope::document_path())?;
    envelope::decode_flat(map, &Default::default(), "input_schema")
}

/// Encode as a Claude tool definition
///
/// # Errors
///
/// Returns error if the parameter tree is cyclic
pub fn encode(schema: &CanonicalSchema, _mode: EncodeMode) -> SchemaResult<Encoded> {
    let doc = envelope::encode_flat(schema, "input_schema", NodeEncoder::new(schema.arena()))?;
    Ok(Encoded::clean(Value::Object(doc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claude_to_openai_shape() {
        let raw = json!({
            "name": "get_weather",
            "description": "Get current weather",
            "input_schema": {
                "type": "object",
                "properties": {"location": {"type": "string"}},
                "required": ["location"]
            }
        });
        let schema = decode(&raw).unwrap();
        let openai = crate::openai::encode(&schema, EncodeMode::Lenient).unwrap();
        assert_eq!(
            serde_json::to_string(&openai.document).unwrap(),
            r#"{"name":"get_weather","description":"Get current weather","parameters":{"type":"object","properties":{"location":{"type":"string"}},"required":["location"]}}"#
        );
        assert!(openai.diagnostics.is_empty());
    }

    #[test]
    fn test_decode_error_uses_dialect_path() {
        let err = decode(&json!({
            "name": "t",
            "input_schema": {"type": "object", "properties": {"x": {"type": 3}}}
        }))
        .unwrap_err();
        assert_eq!(err.path().as_str(), "input_schema.properties.x.type");
    }

    #[test]
    fn test_rejects_openai_envelope() {
        let err = decode(&json!({
            "name": "t",
            "parameters": {"type": "object"}
        }))
        .unwrap_err();
        assert_eq!(err.path().as_str(), "input_schema");
    }
}
