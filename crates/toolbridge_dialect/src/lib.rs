//! toolbridge Dialect Adapters
//!
//! One decode/encode pair per provider dialect, collected in an immutable
//! [`AdapterTable`]. Every adapter shares the core node codec and only
//! differs in the envelope around the parameters root.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod claude;
pub mod cohere;
mod envelope;
pub mod gemini;
pub mod mistral;
pub mod openai;
pub mod table;

pub use adapter::{Adapter, DecodeFn, EncodeFn, EncodeMode, Encoded};
pub use table::AdapterTable;
