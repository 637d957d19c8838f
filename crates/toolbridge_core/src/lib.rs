//! toolbridge Core Types
//!
//! This crate contains the dialect-neutral model every conversion passes
//! through. It is pure data and logic with no I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod codec;
pub mod diagnostic;
pub mod dialect;
pub mod error;
pub mod fingerprint;
pub mod record;
pub mod schema;

// Re-exports
pub use capability::{capability_gaps, CapabilityGap, Feature};
pub use codec::{decode_node, NodeEncoder};
pub use diagnostic::{Diagnostic, FieldPath, Severity};
pub use dialect::{DialectCapabilities, DialectTag, ParseDialectError};
pub use error::{ErrorKind, SchemaError, SchemaResult};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use record::{FieldMapping, MappingEntry, RuleType, Transform, ValidationRule};
pub use schema::{
    is_identifier, Bound, CanonicalSchema, Kind, NodeId, ObjectSpelling, ParamArena, ParamKind,
    ParamNode, Visit,
};
