//! Content fingerprints for tool definitions.
//!
//! Uses BLAKE3 over the canonical JSON projection, so two definitions that
//! only differ in dialect spelling or source key order share a fingerprint.

use crate::error::SchemaResult;
use crate::schema::CanonicalSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A BLAKE3 digest (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Hash raw bytes
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Get as bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    ///
    /// # Errors
    ///
    /// Returns error if hex is invalid or not 32 bytes
    pub fn from_hex(text: &str) -> Result<Self, FingerprintError> {
        let bytes = hex::decode(text).map_err(|_| FingerprintError::InvalidHex)?;
        let len = bytes.len();
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| FingerprintError::InvalidLength(len))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fingerprint parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintError {
    /// Not hexadecimal
    #[error("invalid hex string")]
    InvalidHex,
    /// Wrong digest size
    #[error("invalid fingerprint length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

impl CanonicalSchema {
    /// Fingerprint of the canonical JSON projection.
    ///
    /// Sensitive to `properties` order, insensitive to which dialect the
    /// schema was decoded from.
    ///
    /// # Errors
    ///
    /// Returns error if the parameter tree cannot be rendered
    pub fn fingerprint(&self) -> SchemaResult<Fingerprint> {
        let doc = self.to_canonical_json()?;
        Ok(Fingerprint::compute(doc.to_string().as_bytes()))
    }
}
