//! Envelope helpers shared by the adapters.

use serde_json::{Map, Value};
use toolbridge_core::{
    capability_gaps, decode_node, CanonicalSchema, Diagnostic, DialectTag, FieldPath, NodeEncoder,
    ParamArena, SchemaError, SchemaResult,
};
use tracing::warn;

use crate::adapter::EncodeMode;

/// Path used for the document itself
pub(crate) fn document_path() -> FieldPath {
    FieldPath::root("$")
}

/// View `raw` as a JSON object
pub(crate) fn as_object<'a>(raw: &'a Value, at: &FieldPath) -> SchemaResult<&'a Map<String, Value>> {
    raw.as_object()
        .ok_or_else(|| SchemaError::decode(at.clone(), "expected an object"))
}

/// Read the `name` and optional `description` fields under `prefix`
pub(crate) fn decode_header(
    map: &Map<String, Value>,
    prefix: &FieldPath,
) -> SchemaResult<(String, Option<String>)> {
    let name = match map.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(SchemaError::decode(prefix.field("name"), "expected a string")),
        None => return Err(SchemaError::decode(prefix.field("name"), "missing field")),
    };
    let description = match map.get("description") {
        None => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            return Err(SchemaError::decode(
                prefix.field("description"),
                "expected a string",
            ));
        }
    };
    Ok((name, description))
}

/// Decode `{name, description, <params_field>}` under `prefix`
pub(crate) fn decode_flat(
    map: &Map<String, Value>,
    prefix: &FieldPath,
    params_field: &str,
) -> SchemaResult<CanonicalSchema> {
    let (name, description) = decode_header(map, prefix)?;
    let params_path = prefix.field(params_field);
    let params = match map.get(params_field) {
        Some(value @ Value::Object(_)) => value,
        Some(_) => return Err(SchemaError::decode(params_path, "expected an object")),
        None => return Err(SchemaError::decode(params_path, "missing field")),
    };

    let mut arena = ParamArena::new();
    let root = decode_node(params, &params_path, &mut arena)?;
    Ok(CanonicalSchema::new(name, description, arena, root))
}

/// Encode `{name, description, <params_field>}`
pub(crate) fn encode_flat(
    schema: &CanonicalSchema,
    params_field: &str,
    encoder: NodeEncoder<'_>,
) -> SchemaResult<Map<String, Value>> {
    let params = encoder.encode(schema.root(), &FieldPath::parameters())?;
    let mut doc = header(schema);
    doc.insert(params_field.to_string(), Value::Object(params));
    Ok(doc)
}

/// `{name, description?}` of a schema
pub(crate) fn header(schema: &CanonicalSchema) -> Map<String, Value> {
    let mut doc = Map::new();
    doc.insert("name".into(), Value::String(schema.name.clone()));
    if let Some(description) = &schema.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    doc
}

/// Capability gaps of `schema` against `dialect` as warnings.
///
/// In strict mode the first gap is returned as `UnsupportedFeature`
/// instead, before anything is encoded.
pub(crate) fn degrade(
    schema: &CanonicalSchema,
    dialect: DialectTag,
    mode: EncodeMode,
) -> SchemaResult<Vec<Diagnostic>> {
    let gaps = capability_gaps(schema, dialect);
    if mode.is_strict() {
        if let Some(gap) = gaps.into_iter().next() {
            return Err(gap.into_error(dialect));
        }
        return Ok(Vec::new());
    }

    Ok(gaps
        .iter()
        .map(|gap| {
            warn!(%dialect, path = %gap.path, "lossy conversion");
            gap.diagnostic(dialect, false)
        })
        .collect())
}
