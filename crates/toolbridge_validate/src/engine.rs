//! The validation engine.

use toolbridge_core::{CanonicalSchema, Diagnostic, DialectTag, ValidationRule};
use tracing::debug;

use crate::builtin::Check;
use crate::custom::{compile_rules, CompiledRule, RuleError};
use crate::report::ValidationReport;

/// Runs the built-in checks, then custom rules for the target dialect.
///
/// Holds only compiled, immutable rules; share one instance between
/// callers.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    custom: Vec<CompiledRule>,
}

impl Validator {
    /// Validator with the built-in checks only
    #[must_use]
    pub fn new() -> Self {
        Self { custom: Vec::new() }
    }

    /// Validator with custom rules compiled from configuration
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if a custom definition cannot be compiled
    pub fn with_rules(rules: &[ValidationRule]) -> Result<Self, RuleError> {
        Ok(Self {
            custom: compile_rules(rules)?,
        })
    }

    /// Number of custom rules
    #[must_use]
    pub fn custom_rule_count(&self) -> usize {
        self.custom.len()
    }

    /// Names of custom rules that apply to `target`
    pub fn rule_names_for(&self, target: DialectTag) -> impl Iterator<Item = &str> + '_ {
        self.custom
            .iter()
            .filter(move |rule| rule.dialect() == target)
            .map(CompiledRule::name)
    }

    /// Validate `schema` for `target`.
    ///
    /// Built-in checks run in [`Check::ALL`] order; custom rules for
    /// `target` follow in the order supplied. `strict` escalates
    /// capability warnings only.
    #[must_use]
    pub fn validate(
        &self,
        schema: &CanonicalSchema,
        target: DialectTag,
        strict: bool,
    ) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for check in Check::ALL {
            check.run(schema, target, strict, &mut out);
        }
        for rule in self.custom.iter().filter(|rule| rule.dialect() == target) {
            rule.evaluate(schema, &mut out);
        }
        debug!(tool = %schema.name, %target, strict, findings = out.len(), "validated");
        out
    }

    /// Validate and wrap the findings in a report
    #[must_use]
    pub fn report(
        &self,
        schema: &CanonicalSchema,
        target: DialectTag,
        strict: bool,
    ) -> ValidationReport {
        ValidationReport::from_diagnostics(self.validate(schema, target, strict))
    }
}
