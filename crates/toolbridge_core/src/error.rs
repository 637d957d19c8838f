//! Core error types for toolbridge.

use crate::diagnostic::FieldPath;
use crate::dialect::DialectTag;
use serde::Serialize;
use std::fmt;

/// Schema result type
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while decoding, normalizing or encoding a tool schema.
///
/// All of them are deterministic functions of the input; none is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A required envelope or parameter field is absent or has the wrong shape
    #[error("decode error at {field}: {reason}")]
    Decode {
        /// Field in the source document
        field: FieldPath,
        /// What was wrong with it
        reason: String,
    },

    /// The parameter tree references one of its own ancestors
    #[error("cyclic parameter tree at {path}")]
    Cycle {
        /// Node that revisits an ancestor
        path: FieldPath,
    },

    /// A canonical invariant is violated
    #[error("invalid structure at {path}: {reason}")]
    InvalidStructure {
        /// Offending node or field
        path: FieldPath,
        /// Violated invariant
        reason: String,
    },

    /// The target dialect cannot represent a canonical feature
    #[error("{dialect} cannot represent {feature} at {path}")]
    UnsupportedFeature {
        /// Target dialect
        dialect: DialectTag,
        /// Offending node
        path: FieldPath,
        /// Feature that would be lost
        feature: String,
    },
}

impl SchemaError {
    /// Create a decode error
    #[must_use]
    pub fn decode(field: FieldPath, reason: impl Into<String>) -> Self {
        Self::Decode {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid structure error
    #[must_use]
    pub fn invalid(path: FieldPath, reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            path,
            reason: reason.into(),
        }
    }

    /// Path the error points at
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Decode { field, .. } => field,
            Self::Cycle { path }
            | Self::InvalidStructure { path, .. }
            | Self::UnsupportedFeature { path, .. } => path,
        }
    }

    /// Machine-readable kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Cycle { .. } => ErrorKind::Cycle,
            Self::InvalidStructure { .. } => ErrorKind::InvalidStructure,
            Self::UnsupportedFeature { .. } => ErrorKind::UnsupportedFeature,
        }
    }
}

/// Stable error classification used by transports to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed source document
    Decode,
    /// Self-referential parameter tree
    Cycle,
    /// Canonical invariant violated
    InvalidStructure,
    /// Target dialect cannot represent the schema
    UnsupportedFeature,
    /// No adapter registered for a dialect
    UnsupportedDialect,
    /// Strict validation rejected the result
    Rejected,
    /// Field mapping could not be applied
    Mapping,
    /// Engine configuration is invalid
    Config,
}

impl ErrorKind {
    /// Whether the caller can fix the failure by changing the request
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Mapping | Self::Config)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Decode => "decode",
            Self::Cycle => "cycle",
            Self::InvalidStructure => "invalid_structure",
            Self::UnsupportedFeature => "unsupported_feature",
            Self::UnsupportedDialect => "unsupported_dialect",
            Self::Rejected => "rejected",
            Self::Mapping => "mapping",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}
