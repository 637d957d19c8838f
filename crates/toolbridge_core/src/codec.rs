//! JSON-schema node codec shared by every dialect.
//!
//! All five dialects spell a single parameter node the same way; they only
//! differ in the envelope around the parameters root. This module owns the
//! node spelling and the canonical JSON projection built on it.

use crate::diagnostic::FieldPath;
use crate::error::{SchemaError, SchemaResult};
use crate::schema::{
    CanonicalSchema, Kind, NodeId, ObjectSpelling, ParamArena, ParamKind, ParamNode,
};
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

/// Keywords every node consumes
const COMMON_KEYS: [&str; 3] = ["type", "description", "enum"];

fn consumed_by(kind: Kind) -> &'static [&'static str] {
    match kind {
        Kind::Number | Kind::Integer => &["minimum", "maximum"],
        Kind::Object => &["properties", "required"],
        Kind::Array => &["items"],
        Kind::String | Kind::Boolean | Kind::Null => &[],
    }
}

/// Decode a JSON-schema node (and its subtree) into `arena`.
///
/// `path` is the location of `value` in the source document and is used
/// verbatim for error reporting.
///
/// # Errors
///
/// Returns [`SchemaError::Decode`] when `type` is missing or unknown, or a
/// keyword has the wrong shape.
pub fn decode_node(
    value: &Value,
    path: &FieldPath,
    arena: &mut ParamArena,
) -> SchemaResult<NodeId> {
    let map = value
        .as_object()
        .ok_or_else(|| SchemaError::decode(path.clone(), "expected an object"))?;

    let type_path = path.field("type");
    let type_name = match map.get("type") {
        None => return Err(SchemaError::decode(type_path, "missing field")),
        Some(Value::String(name)) => name,
        Some(_) => return Err(SchemaError::decode(type_path, "expected a string")),
    };
    let kind = Kind::parse(type_name)
        .ok_or_else(|| SchemaError::decode(type_path, format!("unknown type '{type_name}'")))?;

    let description = match map.get("description") {
        None => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            return Err(SchemaError::decode(
                path.field("description"),
                "expected a string",
            ));
        }
    };

    let enum_values = match map.get("enum") {
        None => None,
        Some(Value::Array(values)) => Some(values.clone()),
        Some(_) => return Err(SchemaError::decode(path.field("enum"), "expected an array")),
    };

    let payload = match kind {
        Kind::String => ParamKind::String,
        Kind::Boolean => ParamKind::Boolean,
        Kind::Null => ParamKind::Null,
        Kind::Number => ParamKind::Number {
            minimum: decode_bound(map, "minimum", path)?,
            maximum: decode_bound(map, "maximum", path)?,
        },
        Kind::Integer => ParamKind::Integer {
            minimum: decode_bound(map, "minimum", path)?,
            maximum: decode_bound(map, "maximum", path)?,
        },
        Kind::Object => decode_object(map, path, arena)?,
        Kind::Array => {
            let items = map
                .get("items")
                .ok_or_else(|| SchemaError::decode(path.items(), "missing field"))?;
            ParamKind::Array {
                items: decode_node(items, &path.items(), arena)?,
            }
        }
    };

    let consumed = consumed_by(kind);
    let extensions = map
        .iter()
        .filter(|(key, _)| {
            !COMMON_KEYS.contains(&key.as_str()) && !consumed.contains(&key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(arena.push(ParamNode {
        kind: payload,
        description,
        enum_values,
        extensions,
    }))
}

fn decode_bound(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> SchemaResult<Option<serde_json::Number>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.clone())),
        Some(_) => Err(SchemaError::decode(path.field(key), "expected a number")),
    }
}

fn decode_object(
    map: &Map<String, Value>,
    path: &FieldPath,
    arena: &mut ParamArena,
) -> SchemaResult<ParamKind> {
    let mut properties = IndexMap::new();
    match map.get("properties") {
        None => {}
        Some(Value::Object(entries)) => {
            for (name, child) in entries {
                let id = decode_node(child, &path.property(name), arena)?;
                properties.insert(name.clone(), id);
            }
        }
        Some(_) => {
            return Err(SchemaError::decode(
                path.field("properties"),
                "expected an object",
            ));
        }
    }

    let mut required = IndexSet::new();
    match map.get("required") {
        None => {}
        Some(Value::Array(names)) => {
            for (index, name) in names.iter().enumerate() {
                let name = name
                    .as_str()
                    .ok_or_else(|| SchemaError::decode(path.required(index), "expected a string"))?;
                if !required.insert(name.to_string()) {
                    return Err(SchemaError::decode(
                        path.required(index),
                        format!("duplicate entry '{name}'"),
                    ));
                }
            }
        }
        Some(_) => {
            return Err(SchemaError::decode(
                path.field("required"),
                "expected an array",
            ));
        }
    }

    Ok(ParamKind::Object {
        properties,
        required,
        spelling: ObjectSpelling {
            properties: map.contains_key("properties"),
            required: map.contains_key("required"),
        },
    })
}

/// Renders arena nodes as JSON-schema objects.
///
/// Keys come out as `type, description, enum, minimum, maximum, properties,
/// required, items`, then extensions sorted by key. Empty `properties` and
/// `required` follow the node's [`ObjectSpelling`]. The walk refuses cycles
/// instead of looping.
#[derive(Debug, Clone, Copy)]
pub struct NodeEncoder<'a> {
    arena: &'a ParamArena,
    stringify_enums: bool,
}

impl<'a> NodeEncoder<'a> {
    /// Create an encoder over `arena`
    #[must_use]
    pub fn new(arena: &'a ParamArena) -> Self {
        Self {
            arena,
            stringify_enums: false,
        }
    }

    /// Render every enum literal as a string
    #[must_use]
    pub fn with_stringified_enums(mut self, stringify: bool) -> Self {
        self.stringify_enums = stringify;
        self
    }

    /// Encode the subtree rooted at `id`
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Cycle`] if the subtree references an ancestor
    /// and [`SchemaError::InvalidStructure`] on a dangling id.
    pub fn encode(&self, id: NodeId, path: &FieldPath) -> SchemaResult<Map<String, Value>> {
        self.encode_node(id, path, &mut IndexSet::new())
    }

    fn encode_node(
        &self,
        id: NodeId,
        path: &FieldPath,
        on_path: &mut IndexSet<NodeId>,
    ) -> SchemaResult<Map<String, Value>> {
        if on_path.contains(&id) {
            return Err(SchemaError::Cycle { path: path.clone() });
        }
        let node = self.arena.get(id).ok_or_else(|| {
            SchemaError::invalid(path.clone(), format!("dangling node reference {id}"))
        })?;
        on_path.insert(id);

        let mut out = Map::new();
        out.insert("type".into(), Value::String(node.kind().as_str().into()));
        if let Some(description) = &node.description {
            out.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(values) = &node.enum_values {
            let values = if self.stringify_enums {
                values.iter().map(stringify).collect()
            } else {
                values.clone()
            };
            out.insert("enum".into(), Value::Array(values));
        }

        match &node.kind {
            ParamKind::Number { minimum, maximum } | ParamKind::Integer { minimum, maximum } => {
                if let Some(min) = minimum {
                    out.insert("minimum".into(), Value::Number(min.clone()));
                }
                if let Some(max) = maximum {
                    out.insert("maximum".into(), Value::Number(max.clone()));
                }
            }
            ParamKind::Object {
                properties,
                required,
                spelling,
            } => {
                let mut props = Map::new();
                for (name, child) in properties {
                    let encoded = self.encode_node(*child, &path.property(name), on_path)?;
                    props.insert(name.clone(), Value::Object(encoded));
                }
                if spelling.writes_properties(props.len()) {
                    out.insert("properties".into(), Value::Object(props));
                }
                if spelling.writes_required(required.len()) {
                    let names = required.iter().cloned().map(Value::String).collect();
                    out.insert("required".into(), Value::Array(names));
                }
            }
            ParamKind::Array { items } => {
                let encoded = self.encode_node(*items, &path.items(), on_path)?;
                out.insert("items".into(), Value::Object(encoded));
            }
            ParamKind::String | ParamKind::Boolean | ParamKind::Null => {}
        }

        let mut extensions: Vec<_> = node.extensions.iter().collect();
        extensions.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in extensions {
            out.entry(key.clone()).or_insert_with(|| value.clone());
        }

        on_path.pop();
        Ok(out)
    }
}

fn stringify(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        other => Value::String(other.to_string()),
    }
}

impl CanonicalSchema {
    /// Render as `{name, description?, parameters}`.
    ///
    /// This is the OpenAI spelling and doubles as the dialect-neutral
    /// document form accepted by validation requests.
    ///
    /// # Errors
    ///
    /// Returns error if the parameter tree is cyclic or has dangling ids
    pub fn to_canonical_json(&self) -> SchemaResult<Value> {
        let parameters =
            NodeEncoder::new(self.arena()).encode(self.root(), &FieldPath::parameters())?;
        let mut doc = Map::new();
        doc.insert("name".into(), Value::String(self.name.clone()));
        if let Some(description) = &self.description {
            doc.insert("description".into(), Value::String(description.clone()));
        }
        doc.insert("parameters".into(), Value::Object(parameters));
        Ok(Value::Object(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> SchemaResult<(ParamArena, NodeId)> {
        let mut arena = ParamArena::new();
        let id = decode_node(&value, &FieldPath::parameters(), &mut arena)?;
        Ok((arena, id))
    }

    #[test]
    fn test_decode_object_tree() {
        let (arena, root) = decode(json!({
            "type": "object",
            "properties": {
                "location": {"type": "string", "description": "City"},
                "days": {"type": "integer", "minimum": 1, "maximum": 14}
            },
            "required": ["location"]
        }))
        .unwrap();

        let node = arena.get(root).unwrap();
        let ParamKind::Object { properties, required, .. } = &node.kind else {
            panic!("expected object");
        };
        assert_eq!(properties.keys().collect::<Vec<_>>(), ["location", "days"]);
        assert!(required.contains("location"));
        let days = arena.get(properties["days"]).unwrap();
        assert!(matches!(days.kind, ParamKind::Integer { minimum: Some(_), maximum: Some(_) }));
    }

    #[test]
    fn test_decode_missing_type() {
        let err = decode(json!({"type": "object", "properties": {"x": {"description": "no type"}}}))
            .unwrap_err();
        assert_eq!(err.path().as_str(), "parameters.properties.x.type");
    }

    #[test]
    fn test_decode_unknown_type() {
        let err = decode(json!({"type": "tuple"})).unwrap_err();
        assert!(err.to_string().contains("unknown type 'tuple'"));
    }

    #[test]
    fn test_decode_array_requires_items() {
        let err = decode(json!({"type": "array"})).unwrap_err();
        assert_eq!(err.path().as_str(), "parameters.items");
    }

    #[test]
    fn test_decode_bad_required_entry() {
        let err = decode(json!({"type": "object", "properties": {}, "required": ["a", 3]}))
            .unwrap_err();
        assert_eq!(err.path().as_str(), "parameters.required[1]");
    }

    #[test]
    fn test_decode_rejects_duplicate_required() {
        let err = decode(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "required": ["a", "a"]
        }))
        .unwrap_err();
        assert_eq!(err.path().as_str(), "parameters.required[1]");
        assert!(err.to_string().contains("duplicate entry 'a'"));
    }

    #[test]
    fn test_reencode_keeps_optional_object_keywords() {
        for raw in [
            json!({"type": "object"}),
            json!({"type": "object", "properties": {}}),
            json!({"type": "object", "properties": {}, "required": []}),
            json!({"type": "object", "required": []}),
            json!({
                "type": "object",
                "properties": {"meta": {"type": "object", "additionalProperties": true}}
            }),
        ] {
            let (arena, root) = decode(raw.clone()).unwrap();
            let encoded = NodeEncoder::new(&arena)
                .encode(root, &FieldPath::parameters())
                .unwrap();
            assert_eq!(Value::Object(encoded), raw);
        }
    }

    #[test]
    fn test_unknown_keywords_become_extensions() {
        let (arena, root) = decode(json!({
            "type": "string",
            "format": "date",
            "minimum": 3
        }))
        .unwrap();
        let node = arena.get(root).unwrap();
        // minimum has no slot on a string node, so it is kept verbatim
        assert_eq!(node.extensions.len(), 2);
        assert_eq!(node.extensions["format"], json!("date"));
    }

    #[test]
    fn test_encode_key_order() {
        let (arena, root) = decode(json!({
            "required": ["b"],
            "properties": {
                "b": {"maximum": 9, "type": "number", "default": 2, "description": "B"},
                "a": {"enum": ["x"], "type": "string"}
            },
            "additionalProperties": false,
            "type": "object"
        }))
        .unwrap();

        let encoded = NodeEncoder::new(&arena)
            .encode(root, &FieldPath::parameters())
            .unwrap();
        let text = serde_json::to_string(&Value::Object(encoded)).unwrap();
        assert_eq!(
            text,
            r#"{"type":"object","properties":{"b":{"type":"number","description":"B","maximum":9,"default":2},"a":{"type":"string","enum":["x"]}},"required":["b"],"additionalProperties":false}"#
        );
    }

    #[test]
    fn test_encode_stringifies_enums() {
        let (arena, root) = decode(json!({"type": "integer", "enum": [1, 2]})).unwrap();
        let encoded = NodeEncoder::new(&arena)
            .with_stringified_enums(true)
            .encode(root, &FieldPath::parameters())
            .unwrap();
        assert_eq!(encoded["enum"], json!(["1", "2"]));
    }

    #[test]
    fn test_encode_refuses_cycle() {
        let mut arena = ParamArena::new();
        let placeholder = arena.push(ParamNode::string());
        let list = arena.push(ParamNode::array(placeholder));
        arena.set_items(list, list).unwrap();
        let err = NodeEncoder::new(&arena)
            .encode(list, &FieldPath::parameters())
            .unwrap_err();
        assert_eq!(err.path().as_str(), "parameters.items");
    }

    #[test]
    fn test_canonical_json_without_description() {
        let mut arena = ParamArena::new();
        let root = arena.push(ParamNode::object());
        let schema = CanonicalSchema::new("ping", None, arena, root);
        assert_eq!(
            schema.to_canonical_json().unwrap(),
            json!({"name": "ping", "parameters": {"type": "object", "properties": {}}})
        );
    }

    #[test]
    fn test_canonical_json() {
        let mut schema = CanonicalSchema::empty("ping", "Ping a host");
        schema.add_property("host", ParamNode::string(), true).unwrap();
        assert_eq!(
            schema.to_canonical_json().unwrap(),
            json!({
                "name": "ping",
                "description": "Ping a host",
                "parameters": {
                    "type": "object",
                    "properties": {"host": {"type": "string"}},
                    "required": ["host"]
                }
            })
        );
    }
}
