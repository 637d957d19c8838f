//! The adapter contract.

use serde_json::Value;
use toolbridge_core::{CanonicalSchema, Diagnostic, DialectTag, SchemaResult};
use tracing::debug;

/// How the encoder treats features the target dialect lacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EncodeMode {
    /// Degrade with a warning
    #[default]
    Lenient,
    /// Refuse with `UnsupportedFeature`
    Strict,
}

impl EncodeMode {
    /// Mode for a strictness flag
    #[must_use]
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }

    /// Check if strict
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Output of a successful encode
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    /// The dialect document
    pub document: Value,
    /// Lossy-conversion warnings
    pub diagnostics: Vec<Diagnostic>,
}

impl Encoded {
    /// A document produced without loss
    #[must_use]
    pub fn clean(document: Value) -> Self {
        Self {
            document,
            diagnostics: Vec::new(),
        }
    }
}

/// Decode half of an adapter
pub type DecodeFn = fn(&Value) -> SchemaResult<CanonicalSchema>;

/// Encode half of an adapter
pub type EncodeFn = fn(&CanonicalSchema, EncodeMode) -> SchemaResult<Encoded>;

/// A dialect's decode/encode pair.
///
/// Plain function pointers: adapters carry no state and are shared
/// read-only by every caller.
#[derive(Debug, Clone, Copy)]
pub struct Adapter {
    /// Dialect handled
    pub tag: DialectTag,
    /// Raw document to canonical schema
    pub decode: DecodeFn,
    /// Canonical schema to raw document
    pub encode: EncodeFn,
    /// Built-in `(canonical field, dialect field)` renames
    pub field_mappings: &'static [(&'static str, &'static str)],
}

impl Adapter {
    /// Decode a raw document
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the document does not have the dialect's shape
    pub fn decode_document(&self, raw: &Value) -> SchemaResult<CanonicalSchema> {
        debug!(dialect = %self.tag, "decoding tool definition");
        (self.decode)(raw)
    }

    /// Encode a canonical schema
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFeature` in strict mode when the dialect cannot
    /// represent the schema, or `Cycle` for a self-referential tree
    pub fn encode_schema(&self, schema: &CanonicalSchema, mode: EncodeMode) -> SchemaResult<Encoded> {
        debug!(dialect = %self.tag, tool = %schema.name, ?mode, "encoding tool definition");
        (self.encode)(schema, mode)
    }
}
