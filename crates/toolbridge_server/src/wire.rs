//! Request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolbridge_convert::ProviderInfo;
use toolbridge_core::{Diagnostic, DialectTag};

/// `POST /api/convert` body
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    /// Document in the source dialect
    pub source_schema: Value,
    /// Source dialect name
    pub source_provider: String,
    /// Target dialect name
    pub target_provider: String,
    /// Overrides the configured default
    #[serde(default)]
    pub strict: Option<bool>,
}

/// `POST /api/convert` success body
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    /// Always true
    pub success: bool,
    /// Document in the target dialect
    pub target_schema: Value,
    /// Source dialect
    pub source_provider: DialectTag,
    /// Target dialect
    pub target_provider: DialectTag,
    /// Findings, omitted when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Failure body shared by every route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// What went wrong
    pub error: String,
}

/// `POST /api/validate` body
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    /// Dialect or canonical document
    pub schema: Value,
    /// Dialect name
    pub provider: String,
    /// Escalate capability warnings
    #[serde(default)]
    pub strict: bool,
}

/// `POST /api/validate/batch` body
#[derive(Debug, Clone, Deserialize)]
pub struct BatchValidateRequest {
    /// Documents to validate
    pub schemas: Vec<Value>,
    /// One dialect name per document
    pub providers: Vec<String>,
    /// Escalate capability warnings
    #[serde(default)]
    pub strict: bool,
}

/// `GET /api/providers` body
#[derive(Debug, Clone, Serialize)]
pub struct ProvidersResponse {
    /// Every registered provider
    pub providers: Vec<ProviderInfo>,
}
