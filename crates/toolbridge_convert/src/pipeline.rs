//! The conversion pipeline.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use toolbridge_core::{CanonicalSchema, Diagnostic, DialectTag, FieldMapping};
use toolbridge_dialect::{openai, Adapter, AdapterTable, EncodeMode};
use toolbridge_validate::{BatchSummary, ValidationReport, Validator};
use tracing::{debug, info, info_span};

use crate::config::{ConfigError, EngineConfig};
use crate::error::ConversionError;
use crate::mapping::apply_mappings;
use crate::provider::ProviderInfo;

/// A converted document and the findings collected on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Target dialect document
    pub document: Value,
    /// Validation findings first, then encoder and mapping warnings
    pub diagnostics: Vec<Diagnostic>,
}

/// Reports for a batch plus their summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// One report per input, in input order
    pub results: Vec<ValidationReport>,
    /// Aggregate counts
    pub summary: BatchSummary,
}

/// Conversion and validation entry point.
///
/// Holds only immutable state behind `Arc`; clone it freely.
#[derive(Debug, Clone)]
pub struct Converter {
    table: Arc<AdapterTable>,
    validator: Arc<Validator>,
    mappings: Arc<[FieldMapping]>,
    default_strict: bool,
}

impl Converter {
    /// Create a converter over `table`
    #[must_use]
    pub fn new(table: Arc<AdapterTable>, validator: Validator) -> Self {
        Self {
            table,
            validator: Arc::new(validator),
            mappings: Arc::from(Vec::new()),
            default_strict: false,
        }
    }

    /// All five dialects, built-in checks only
    #[must_use]
    pub fn standard() -> Self {
        Self::new(AdapterTable::standard(), Validator::new())
    }

    /// All five dialects with rules and mappings from `config`
    ///
    /// # Errors
    ///
    /// Returns error if a custom rule does not compile
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let validator = Validator::with_rules(&config.rules)?;
        Ok(Self::new(AdapterTable::standard(), validator)
            .with_field_mappings(config.field_mappings.clone())
            .with_default_strict(config.default_strict))
    }

    /// Set field mappings applied after encode
    #[must_use]
    pub fn with_field_mappings(mut self, mappings: Vec<FieldMapping>) -> Self {
        self.mappings = Arc::from(mappings);
        self
    }

    /// Set the strictness used when a caller does not choose one
    #[must_use]
    pub fn with_default_strict(mut self, strict: bool) -> Self {
        self.default_strict = strict;
        self
    }

    /// Strictness used when a caller does not choose one
    #[must_use]
    pub fn default_strict(&self) -> bool {
        self.default_strict
    }

    fn adapter(&self, tag: DialectTag) -> Result<&Adapter, ConversionError> {
        self.table
            .get(tag)
            .ok_or(ConversionError::UnsupportedDialect(tag))
    }

    /// Decode and normalize a dialect document
    ///
    /// # Errors
    ///
    /// Returns error if the dialect is unknown, or the document fails to
    /// decode or normalize
    pub fn decode(&self, raw: &Value, dialect: DialectTag) -> Result<CanonicalSchema, ConversionError> {
        self.adapter(dialect)?
            .decode_document(raw)
            .map_err(ConversionError::Decode)?
            .normalize()
            .map_err(ConversionError::Normalize)
    }

    /// Convert `raw` from `source` to `target`.
    ///
    /// Decode, normalize, validate (when the dialects differ or `strict`
    /// is set), encode, then apply field mappings. Either the whole
    /// document is produced or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] for unknown dialects, decode or
    /// normalize failures, an encode refusal in strict mode, strict
    /// validation errors, or an unwritable field mapping
    pub fn convert(
        &self,
        raw: &Value,
        source: DialectTag,
        target: DialectTag,
        strict: bool,
    ) -> Result<Conversion, ConversionError> {
        let _span = info_span!("convert", %source, %target, strict).entered();

        let target_adapter = self.adapter(target)?;
        let schema = self.decode(raw, source)?;

        let findings = if source != target || strict {
            self.validator.validate(&schema, target, strict)
        } else {
            Vec::new()
        };

        let encoded = target_adapter
            .encode_schema(&schema, EncodeMode::from_strict(strict))
            .map_err(ConversionError::Encode)?;

        if strict && findings.iter().any(Diagnostic::is_error) {
            return Err(ConversionError::Rejected {
                diagnostics: findings,
            });
        }

        let mut document = encoded.document;
        let mut diagnostics = findings;
        merge(&mut diagnostics, encoded.diagnostics);

        if self.mappings.iter().any(|m| m.applies(source, target)) {
            let canonical = schema.to_canonical_json().map_err(ConversionError::Encode)?;
            let warnings = apply_mappings(&self.mappings, source, target, &canonical, &mut document)?;
            merge(&mut diagnostics, warnings);
        }

        info!(tool = %schema.name, findings = diagnostics.len(), "converted");
        Ok(Conversion {
            document,
            diagnostics,
        })
    }

    /// Validate a document for `dialect`.
    ///
    /// The document may be in the dialect's own shape or in the canonical
    /// `{name, description, parameters}` shape. The canonical shape is only
    /// tried when the dialect's envelope is absent; a document that carries
    /// the envelope and fails to decode yields a report with a single error.
    /// It is not normalized, so invariant violations are reported rather
    /// than raised.
    ///
    /// # Errors
    ///
    /// Returns error only if `dialect` has no adapter
    pub fn validate(
        &self,
        raw: &Value,
        dialect: DialectTag,
        strict: bool,
    ) -> Result<ValidationReport, ConversionError> {
        let adapter = self.adapter(dialect)?;
        let decoded = adapter.decode_document(raw).or_else(|err| {
            if has_envelope(raw, dialect) {
                return Err(err);
            }
            debug!(%dialect, "validating canonical document");
            openai::decode(raw).map_err(|_| err)
        });
        let schema = match decoded {
            Ok(schema) => schema,
            Err(err) => {
                return Ok(ValidationReport::from_diagnostics(vec![Diagnostic::error(
                    err.path().clone(),
                    err.to_string(),
                )]));
            }
        };
        Ok(self.validator.report(&schema, dialect, strict))
    }

    /// Validate every `(document, dialect)` pair
    ///
    /// # Errors
    ///
    /// Returns error if any dialect has no adapter
    pub fn validate_batch(
        &self,
        items: &[(Value, DialectTag)],
        strict: bool,
    ) -> Result<BatchReport, ConversionError> {
        let results = items
            .iter()
            .map(|(raw, dialect)| self.validate(raw, *dialect, strict))
            .collect::<Result<Vec<_>, _>>()?;
        let summary = BatchSummary::from_reports(&results);
        Ok(BatchReport { results, summary })
    }

    /// Describe one provider
    ///
    /// # Errors
    ///
    /// Returns error if the provider has no adapter
    pub fn provider_info(&self, tag: DialectTag) -> Result<ProviderInfo, ConversionError> {
        let adapter = self.adapter(tag)?;
        Ok(ProviderInfo::describe(adapter, self.custom_rules_for(tag)))
    }

    /// Describe every registered provider
    #[must_use]
    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.table
            .tags()
            .filter_map(|tag| self.provider_info(tag).ok())
            .collect()
    }

    fn custom_rules_for(&self, tag: DialectTag) -> Vec<String> {
        self.validator
            .rule_names_for(tag)
            .map(ToString::to_string)
            .collect()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::standard()
    }
}

/// Whether `raw` carries the envelope fields of `dialect`
fn has_envelope(raw: &Value, dialect: DialectTag) -> bool {
    let Some(map) = raw.as_object() else {
        return false;
    };
    let caps = dialect.capabilities();
    if caps.function_wrapper {
        map.contains_key("type") || map.contains_key("function")
    } else {
        map.contains_key(caps.parameters_field)
    }
}

/// Append `more` to `into`, skipping findings already present
fn merge(into: &mut Vec<Diagnostic>, more: Vec<Diagnostic>) {
    for diag in more {
        if !into.contains(&diag) {
            into.push(diag);
        }
    }
}
