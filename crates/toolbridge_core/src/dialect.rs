//! Provider dialect tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of provider dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DialectTag {
    /// OpenAI function definitions
    OpenAI,
    /// Anthropic Claude tool definitions
    Claude,
    /// Google Gemini function declarations
    Gemini,
    /// Mistral tool definitions
    Mistral,
    /// Cohere tool definitions
    Cohere,
}

impl DialectTag {
    /// Every dialect, in declaration order
    pub const ALL: [DialectTag; 5] = [
        Self::OpenAI,
        Self::Claude,
        Self::Gemini,
        Self::Mistral,
        Self::Cohere,
    ];

    /// Wire name of the dialect
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Mistral => "mistral",
            Self::Cohere => "cohere",
        }
    }

    /// Human-readable provider name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Claude => "Anthropic Claude",
            Self::Gemini => "Google Gemini",
            Self::Mistral => "Mistral AI",
            Self::Cohere => "Cohere",
        }
    }

    /// What the dialect can express
    #[must_use]
    pub const fn capabilities(&self) -> DialectCapabilities {
        match self {
            Self::OpenAI => DialectCapabilities {
                nested_structures: true,
                non_string_enums: true,
                parameters_field: "parameters",
                function_wrapper: false,
            },
            Self::Claude => DialectCapabilities {
                nested_structures: true,
                non_string_enums: true,
                parameters_field: "input_schema",
                function_wrapper: false,
            },
            Self::Gemini => DialectCapabilities {
                nested_structures: true,
                non_string_enums: false,
                parameters_field: "parameters",
                function_wrapper: false,
            },
            Self::Mistral => DialectCapabilities {
                nested_structures: true,
                non_string_enums: true,
                parameters_field: "parameters",
                function_wrapper: true,
            },
            Self::Cohere => DialectCapabilities {
                nested_structures: false,
                non_string_enums: true,
                parameters_field: "parameter_definitions",
                function_wrapper: false,
            },
        }
    }
}

impl fmt::Display for DialectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectTag {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "claude" | "anthropic" => Ok(Self::Claude),
            "gemini" | "google" => Ok(Self::Gemini),
            "mistral" => Ok(Self::Mistral),
            "cohere" => Ok(Self::Cohere),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}

impl TryFrom<String> for DialectTag {
    type Error = ParseDialectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Unknown dialect name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported provider: {0}")]
pub struct ParseDialectError(pub String);

/// Static description of what a dialect can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DialectCapabilities {
    /// Object properties and arrays of structured items are expressible
    pub nested_structures: bool,
    /// Enum literals other than strings are expressible
    pub non_string_enums: bool,
    /// Envelope field holding the parameters
    pub parameters_field: &'static str,
    /// Definition is wrapped in `{type: "function", function: {...}}`
    pub function_wrapper: bool,
}
