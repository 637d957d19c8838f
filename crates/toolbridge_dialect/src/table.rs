//! Immutable adapter lookup table.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use toolbridge_core::DialectTag;

use crate::adapter::Adapter;
use crate::{claude, cohere, gemini, mistral, openai};

static STANDARD: Lazy<Arc<AdapterTable>> = Lazy::new(|| {
    Arc::new(
        AdapterTable::new()
            .with_adapter(openai::ADAPTER)
            .with_adapter(claude::ADAPTER)
            .with_adapter(gemini::ADAPTER)
            .with_adapter(mistral::ADAPTER)
            .with_adapter(cohere::ADAPTER),
    )
});

/// Adapters keyed by dialect.
///
/// Built once and then only read; share it with `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AdapterTable {
    adapters: IndexMap<DialectTag, Adapter>,
}

impl AdapterTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: IndexMap::new(),
        }
    }

    /// The process-wide table with all five dialects
    #[must_use]
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD)
    }

    /// Add or replace the adapter for `adapter.tag`
    #[must_use]
    pub fn with_adapter(mut self, adapter: Adapter) -> Self {
        self.adapters.insert(adapter.tag, adapter);
        self
    }

    /// Look up a dialect
    #[must_use]
    pub fn get(&self, tag: DialectTag) -> Option<&Adapter> {
        self.adapters.get(&tag)
    }

    /// Dialects present, in insertion order
    pub fn tags(&self) -> impl Iterator<Item = DialectTag> + '_ {
        self.adapters.keys().copied()
    }

    /// Number of adapters
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Check if the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::EncodeMode;
    use proptest::prelude::*;
    use serde_json::json;
    use toolbridge_core::{CanonicalSchema, ParamNode};

    #[test]
    fn test_standard_table_is_complete() {
        let table = AdapterTable::standard();
        assert_eq!(table.tags().collect::<Vec<_>>(), DialectTag::ALL);
        for tag in DialectTag::ALL {
            assert_eq!(table.get(tag).unwrap().tag, tag);
        }
        assert!(Arc::ptr_eq(&table, &AdapterTable::standard()));
    }

    #[test]
    fn test_partial_table() {
        let table = AdapterTable::new().with_adapter(openai::ADAPTER);
        assert_eq!(table.len(), 1);
        assert!(table.get(DialectTag::Cohere).is_none());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let mut schema = CanonicalSchema::empty("lookup", "Look up a record");
        schema.add_property("zeta", ParamNode::string(), true).unwrap();
        schema.add_property("alpha", ParamNode::integer(), false).unwrap();

        for tag in DialectTag::ALL {
            let adapter = AdapterTable::standard().get(tag).copied().unwrap();
            let first = adapter.encode_schema(&schema, EncodeMode::Lenient).unwrap();
            let second = adapter.encode_schema(&schema, EncodeMode::Lenient).unwrap();
            let first = serde_json::to_string(&first.document).unwrap();
            assert_eq!(first, serde_json::to_string(&second.document).unwrap());
            // properties order is insertion order, not alphabetical
            assert!(first.find("zeta").unwrap() < first.find("alpha").unwrap());
        }
    }

    #[test]
    fn test_every_dialect_decodes_its_own_output() {
        let mut schema = CanonicalSchema::empty("get_weather", "Get current weather");
        schema
            .add_property(
                "unit",
                ParamNode::string().with_enum(vec![json!("celsius"), json!("fahrenheit")]),
                true,
            )
            .unwrap();

        for tag in DialectTag::ALL {
            let adapter = AdapterTable::standard().get(tag).copied().unwrap();
            let encoded = adapter.encode_schema(&schema, EncodeMode::Strict).unwrap();
            let decoded = adapter.decode_document(&encoded.document).unwrap();
            assert_eq!(decoded.name, "get_weather");
            assert!(decoded.is_required("unit"));
        }
    }

    fn description() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[A-Za-z ]{1,16}")
    }

    fn scalar_node() -> impl Strategy<Value = ParamNode> {
        let literals = proptest::collection::vec("[a-z]{1,6}", 1..4);
        prop_oneof![
            (description(), proptest::option::of(literals)).prop_map(|(desc, values)| {
                let mut node = ParamNode::string();
                node.description = desc;
                node.enum_values = values.map(|v| v.into_iter().map(serde_json::Value::from).collect());
                node
            }),
            (description(), -1000i64..1000, 0i64..1000).prop_map(|(desc, min, span)| {
                let mut node = ParamNode::integer().with_bounds(Some(min.into()), Some((min + span).into()));
                node.description = desc;
                node
            }),
            description().prop_map(|desc| {
                let mut node = ParamNode::number();
                node.description = desc;
                node
            }),
            description().prop_map(|desc| {
                let mut node = ParamNode::boolean();
                node.description = desc;
                node
            }),
        ]
    }

    fn flat_schema() -> impl Strategy<Value = CanonicalSchema> {
        (
            "[a-z_][a-z0-9_]{0,12}",
            "[A-Za-z ]{0,24}",
            proptest::collection::btree_map("[a-z][a-z0-9_]{0,8}", (scalar_node(), any::<bool>()), 1..6),
        )
            .prop_map(|(name, description, props)| {
                let mut schema = CanonicalSchema::empty(name, description);
                for (param, (node, required)) in props {
                    schema.add_property(param, node, required).unwrap();
                }
                schema
            })
    }

    fn raw_param() -> impl Strategy<Value = serde_json::Value> {
        let object = (any::<bool>(), any::<bool>()).prop_map(|(properties, required)| {
            let mut node = json!({"type": "object"});
            if properties {
                node["properties"] = json!({});
            }
            if required {
                node["required"] = json!([]);
            }
            node
        });
        prop_oneof![
            (prop_oneof![Just("string"), Just("integer"), Just("boolean")], description())
                .prop_map(|(kind, desc)| {
                    let mut node = json!({"type": kind});
                    if let Some(text) = desc {
                        node["description"] = json!(text);
                    }
                    node
                }),
            object,
        ]
    }

    /// `{name, description?, parameters}` with optional object keywords
    fn raw_tool() -> impl Strategy<Value = serde_json::Value> {
        (
            "[a-z_][a-z0-9_]{0,12}",
            proptest::option::of("[A-Za-z ]{0,24}"),
            proptest::option::of(proptest::collection::btree_map(
                "[a-z][a-z0-9_]{0,8}",
                (raw_param(), any::<bool>()),
                0..5,
            )),
            any::<bool>(),
        )
            .prop_map(|(name, description, props, write_required)| {
                let mut parameters = json!({"type": "object"});
                let mut required = Vec::new();
                if let Some(props) = props {
                    let mut properties = serde_json::Map::new();
                    for (param, (node, is_required)) in props {
                        if is_required {
                            required.push(json!(param));
                        }
                        properties.insert(param, node);
                    }
                    parameters["properties"] = serde_json::Value::Object(properties);
                }
                if write_required || !required.is_empty() {
                    parameters["required"] = serde_json::Value::Array(required);
                }
                let mut tool = json!({"name": name, "parameters": parameters});
                if let Some(text) = description {
                    tool["description"] = json!(text);
                }
                tool
            })
    }

    /// Put a `{name, description?, parameters}` tool in `tag`'s envelope
    fn in_envelope(tag: DialectTag, mut tool: serde_json::Value) -> serde_json::Value {
        match tag {
            DialectTag::Claude => {
                if let Some(map) = tool.as_object_mut() {
                    if let Some(params) = map.remove("parameters") {
                        map.insert("input_schema".into(), params);
                    }
                }
                tool
            }
            DialectTag::Mistral => json!({"type": "function", "function": tool}),
            _ => tool,
        }
    }

    proptest! {
        #[test]
        fn prop_raw_documents_reencode_unchanged(tool in raw_tool()) {
            for tag in [DialectTag::OpenAI, DialectTag::Claude, DialectTag::Gemini, DialectTag::Mistral] {
                let adapter = AdapterTable::standard().get(tag).copied().unwrap();
                let raw = in_envelope(tag, tool.clone());
                let decoded = adapter.decode_document(&raw).unwrap();
                let again = adapter.encode_schema(&decoded, EncodeMode::Lenient).unwrap();
                prop_assert_eq!(again.document, raw);
            }
        }

        #[test]
        fn prop_roundtrip_non_lossy_dialects(schema in flat_schema()) {
            for tag in [DialectTag::OpenAI, DialectTag::Claude, DialectTag::Gemini, DialectTag::Mistral] {
                let adapter = AdapterTable::standard().get(tag).copied().unwrap();
                let encoded = adapter.encode_schema(&schema, EncodeMode::Strict).unwrap();
                prop_assert!(encoded.diagnostics.is_empty());
                let decoded = adapter.decode_document(&encoded.document).unwrap();
                prop_assert_eq!(&decoded, &schema);
            }
        }

        #[test]
        fn prop_reencode_is_semantic_identity(schema in flat_schema()) {
            for tag in DialectTag::ALL {
                let adapter = AdapterTable::standard().get(tag).copied().unwrap();
                let raw = adapter.encode_schema(&schema, EncodeMode::Lenient).unwrap().document;
                let decoded = adapter.decode_document(&raw).unwrap();
                let again = adapter.encode_schema(&decoded, EncodeMode::Lenient).unwrap().document;
                prop_assert_eq!(again, raw);
            }
        }
    }
}
