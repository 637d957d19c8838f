//! toolbridge Conversion Pipeline
//!
//! The single entry point for callers: decode a dialect document, normalize
//! it, validate it for the target, encode it and apply configured field
//! mappings. Synchronous and lock-free; one [`Converter`] can serve any
//! number of threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod mapping;
pub mod pipeline;
pub mod provider;

pub use config::{ConfigError, EngineConfig};
pub use error::ConversionError;
pub use mapping::{apply_mappings, MappingError};
pub use pipeline::{BatchReport, Conversion, Converter};
pub use provider::{ProviderInfo, ProviderRules};
