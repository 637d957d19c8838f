//! Pipeline boundary errors.

use toolbridge_core::{Diagnostic, DialectTag, ErrorKind, SchemaError};

use crate::mapping::MappingError;

/// Why a conversion produced no document.
///
/// Schema errors are wrapped with the stage that raised them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// No adapter for the dialect
    #[error("unsupported provider: {0}")]
    UnsupportedDialect(DialectTag),

    /// Source document could not be decoded
    #[error("{0}")]
    Decode(SchemaError),

    /// Decoded tree violates a canonical invariant
    #[error("{0}")]
    Normalize(SchemaError),

    /// Target dialect refused the schema
    #[error("{0}")]
    Encode(SchemaError),

    /// Strict validation found errors
    #[error(
        "strict validation rejected the conversion with {} error(s)",
        .diagnostics.iter().filter(|d| d.is_error()).count()
    )]
    Rejected {
        /// All validation findings
        diagnostics: Vec<Diagnostic>,
    },

    /// A configured field mapping could not be applied
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl ConversionError {
    /// Machine-readable kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedDialect(_) => ErrorKind::UnsupportedDialect,
            Self::Decode(err) | Self::Normalize(err) | Self::Encode(err) => err.kind(),
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::Mapping(_) => ErrorKind::Mapping,
        }
    }

    /// The wrapped schema error, if any
    #[must_use]
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::Decode(err) | Self::Normalize(err) | Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbridge_core::FieldPath;

    #[test]
    fn test_kind_follows_wrapped_error() {
        let err = ConversionError::Encode(SchemaError::UnsupportedFeature {
            dialect: DialectTag::Cohere,
            path: FieldPath::parameters().property("address"),
            feature: "nested object parameters".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
        assert!(err.schema_error().is_some());

        let err = ConversionError::Normalize(SchemaError::Cycle {
            path: FieldPath::parameters(),
        });
        assert_eq!(err.kind(), ErrorKind::Cycle);
    }

    #[test]
    fn test_rejected_display_counts_errors() {
        let err = ConversionError::Rejected {
            diagnostics: vec![
                Diagnostic::error(FieldPath::root("name"), "too long"),
                Diagnostic::warning(FieldPath::root("description"), "empty"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "strict validation rejected the conversion with 1 error(s)"
        );
        assert!(err.kind().is_client_error());
    }
}
