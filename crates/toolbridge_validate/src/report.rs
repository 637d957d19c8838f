//! Validation reports in their wire shape.

use serde::{Deserialize, Serialize};
use toolbridge_core::{Diagnostic, Severity};

/// Outcome of validating one definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// No `Error` diagnostics
    pub is_valid: bool,
    /// Errors as `"<path>: <message>"`
    pub errors: Vec<String>,
    /// Warnings as `"<path>: <message>"`
    pub warnings: Vec<String>,
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Structured findings, in the order produced
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Build a report from findings
    #[must_use]
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let render = |severity: Severity| -> Vec<String> {
            diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .map(ToString::to_string)
                .collect()
        };
        let errors = render(Severity::Error);
        let warnings = render(Severity::Warning);

        Self {
            is_valid: errors.is_empty(),
            error_count: errors.len(),
            warning_count: warnings.len(),
            errors,
            warnings,
            diagnostics,
        }
    }
}

/// Aggregate over a batch of reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Reports in the batch
    pub total_schemas: usize,
    /// Reports without errors
    pub valid_schemas: usize,
    /// Reports with errors
    pub invalid_schemas: usize,
    /// Percentage of valid reports, 0 for an empty batch
    pub success_rate: f64,
    /// Sum of error counts
    pub total_errors: usize,
    /// Sum of warning counts
    pub total_warnings: usize,
}

impl BatchSummary {
    /// Summarize `reports`
    #[must_use]
    pub fn from_reports(reports: &[ValidationReport]) -> Self {
        let total = reports.len();
        let valid = reports.iter().filter(|r| r.is_valid).count();
        #[allow(clippy::cast_precision_loss)]
        let success_rate = if total == 0 {
            0.0
        } else {
            valid as f64 / total as f64 * 100.0
        };

        Self {
            total_schemas: total,
            valid_schemas: valid,
            invalid_schemas: total - valid,
            success_rate,
            total_errors: reports.iter().map(|r| r.error_count).sum(),
            total_warnings: reports.iter().map(|r| r.warning_count).sum(),
        }
    }
}
