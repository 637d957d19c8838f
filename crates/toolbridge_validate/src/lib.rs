//! toolbridge Validation Engine
//!
//! Checks a canonical schema against a target dialect and reports graded
//! diagnostics. Never mutates the schema and never fails: every problem is
//! a diagnostic.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtin;
pub mod custom;
pub mod engine;
pub mod report;

pub use builtin::Check;
pub use custom::{compile_rules, CompiledRule, RuleError};
pub use engine::Validator;
pub use report::{BatchSummary, ValidationReport};
