//! Provider descriptions for listing endpoints.

use indexmap::IndexMap;
use serde::Serialize;
use toolbridge_core::{DialectCapabilities, DialectTag};
use toolbridge_dialect::Adapter;

/// Structural rules a provider enforces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRules {
    /// Envelope fields a document must carry
    pub required_fields: Vec<&'static str>,
    /// Type of the parameters root
    pub parameters_type: &'static str,
    /// Object properties and arrays of structured items are allowed
    pub supports_nested_objects: bool,
    /// Enum literals other than strings are allowed
    pub supports_non_string_enums: bool,
    /// Definitions are wrapped in `{type: "function", function: {...}}`
    pub function_wrapper: bool,
    /// Names of configured custom rules for this provider
    pub custom_rules: Vec<String>,
}

/// Everything a client needs to know about one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    /// Wire name
    pub name: DialectTag,
    /// Human-readable name
    pub display_name: &'static str,
    /// Static capabilities
    pub capabilities: DialectCapabilities,
    /// Structural rules
    pub validation_rules: ProviderRules,
    /// Canonical field to dialect field renames
    pub field_mappings: IndexMap<&'static str, &'static str>,
    /// Always true for a registered adapter
    pub is_supported: bool,
}

impl ProviderInfo {
    /// Describe `adapter`, listing `custom_rules` as configured for it
    #[must_use]
    pub fn describe(adapter: &Adapter, custom_rules: Vec<String>) -> Self {
        let tag = adapter.tag;
        let caps = tag.capabilities();
        let required_fields = if caps.function_wrapper {
            vec!["type", "function"]
        } else {
            vec!["name", "description", caps.parameters_field]
        };

        Self {
            name: tag,
            display_name: tag.display_name(),
            capabilities: caps,
            validation_rules: ProviderRules {
                required_fields,
                parameters_type: "object",
                supports_nested_objects: caps.nested_structures,
                supports_non_string_enums: caps.non_string_enums,
                function_wrapper: caps.function_wrapper,
                custom_rules,
            },
            field_mappings: adapter.field_mappings.iter().copied().collect(),
            is_supported: true,
        }
    }
}
