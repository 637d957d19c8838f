//! toolbridge Server
//!
//! REST transport over the conversion pipeline.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod wire;

pub use api::{create_router, ApiError, ApiServer, ApiState};
pub use config::{ServerConfig, ServerError};
