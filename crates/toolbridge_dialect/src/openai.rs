//! OpenAI function definitions: `{name, description, parameters}`.

use serde_json::Value;
use toolbridge_core::{CanonicalSchema, DialectTag, NodeEncoder, SchemaResult};

use crate::adapter::{Adapter, EncodeMode, Encoded};
use crate::envelope;

/// The OpenAI adapter
pub const ADAPTER: Adapter = Adapter {
    tag: DialectTag::OpenAI,
    decode,
    encode,
    field_mappings: &[
        ("name", "name"),
        ("description", "description"),
        ("parameters", "parameters"),
    ],
};

/// Decode an OpenAI function definition
///
/// # Errors
///
/// Returns `Decode` on a missing or malformed envelope field
pub fn decode(raw: &Value) -> SchemaResult<CanonicalSchema> {
    let map = envelope::as_object(raw, &envelope::document_path())?;
    envelope::decode_flat(map, &Default::default(), "parameters")
}

/// Encode as an OpenAI function definition
///
/// # Errors
///
/// Returns error if the parameter tree is cyclic
pub fn encode(schema: &CanonicalSchema, _mode: EncodeMode) -> SchemaResult<Encoded> {
    let doc = envelope::encode_flat(schema, "parameters", NodeEncoder::new(schema.arena()))?;
    Ok(Encoded::clean(Value::Object(doc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolbridge_core::{Kind, SchemaError};

    #[test]
    fn test_decode_weather() {
        let schema = decode(&json!({
            "name": "get_weather",
            "description": "Get current weather",
            "parameters": {
                "type": "object",
                "properties": {"location": {"type": "string"}},
                "required": ["location"]
            }
        }))
        .unwrap();

        assert_eq!(schema.name, "get_weather");
        assert_eq!(schema.parameters().unwrap().kind(), Kind::Object);
        assert!(schema.is_required("location"));
    }

    #[test]
    fn test_missing_description_stays_missing() {
        let raw = json!({
            "name": "noop",
            "parameters": {"type": "object", "properties": {}}
        });
        let schema = decode(&raw).unwrap();
        assert_eq!(schema.description, None);
        assert_eq!(schema.description_text(), "");
        assert_eq!(encode(&schema, EncodeMode::Lenient).unwrap().document, raw);
    }

    #[test]
    fn test_null_description_is_rejected() {
        let err = decode(&json!({
            "name": "noop",
            "description": null,
            "parameters": {"type": "object"}
        }))
        .unwrap_err();
        assert_eq!(err.path().as_str(), "description");
    }

    #[test]
    fn test_reencode_keeps_what_the_source_wrote() {
        for raw in [
            json!({"name": "t", "parameters": {"type": "object", "properties": {}}}),
            json!({
                "name": "t",
                "description": "",
                "parameters": {
                    "type": "object",
                    "properties": {"meta": {"type": "object"}},
                    "required": []
                }
            }),
            json!({"name": "t", "parameters": {"type": "object"}}),
        ] {
            let out = encode(&decode(&raw).unwrap(), EncodeMode::Lenient).unwrap();
            assert_eq!(out.document, raw);
        }
    }

    #[test]
    fn test_decode_errors() {
        let err = decode(&json!({"description": "x", "parameters": {"type": "object"}})).unwrap_err();
        assert_eq!(err.path().as_str(), "name");

        let err = decode(&json!({"name": "x"})).unwrap_err();
        assert_eq!(err.path().as_str(), "parameters");

        let err = decode(&json!({"name": "x", "parameters": []})).unwrap_err();
        assert!(matches!(err, SchemaError::Decode { .. }));

        let err = decode(&json!("not a tool")).unwrap_err();
        assert_eq!(err.path().as_str(), "$");
    }

    #[test]
    fn test_encode_decode_is_semantic_identity() {
        let raw = json!({
            "name": "search",
            "description": "Search the index",
            "parameters": {
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Terms", "minLength": 1},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 50, "default": 10},
                    "tags": {"type": "array", "items": {"type": "string", "enum": ["a", "b"]}}
                },
                "required": ["query"],
                "additionalProperties": false
            }
        });
        let encoded = encode(&decode(&raw).unwrap(), EncodeMode::Lenient).unwrap();
        assert_eq!(encoded.document, raw);
        assert!(encoded.diagnostics.is_empty());
    }
}
