//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use toolbridge_convert::{ConfigError, Converter, EngineConfig};

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Bind address does not parse
    #[error("invalid bind address '{0}'")]
    InvalidBind(String),
    /// Engine configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Listener or connection failure
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to listen and how to build the engine
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// Engine configuration
    pub engine: EngineConfig,
    /// Answer CORS preflights for any origin
    pub cors: bool,
}

impl ServerConfig {
    /// Parse the bind address and load the optional engine config file
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid or the config file fails to
    /// load
    pub fn load(bind: &str, engine_config: Option<PathBuf>) -> Result<Self, ServerError> {
        let bind = bind
            .parse()
            .map_err(|_| ServerError::InvalidBind(bind.to_string()))?;
        let engine = match engine_config {
            Some(path) => EngineConfig::from_path(path)?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            bind,
            engine,
            cors: false,
        })
    }

    /// Enable permissive CORS
    #[must_use]
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Build the converter described by the engine config
    ///
    /// # Errors
    ///
    /// Returns error if a custom rule does not compile
    pub fn converter(&self) -> Result<Converter, ServerError> {
        Ok(Converter::from_config(&self.engine)?)
    }
}
