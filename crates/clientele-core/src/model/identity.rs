use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reversible row key derived from a client's raw identifier.
///
/// Lowercase hex of the UTF-8 bytes, so any identifier (CIDR slashes,
/// colons, IPv6 brackets) becomes a plain `[0-9a-f]` token that is safe
/// to use as a map key, a widget id or a form field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn encode(client: &str) -> Self {
        Self(hex::encode(client.as_bytes()))
    }

    /// Wrap an already-encoded key without checking it.
    pub fn from_encoded(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Recover the raw identifier.
    pub fn decode(&self) -> Result<String, CoreError> {
        let bytes = hex::decode(&self.0).map_err(|_| self.invalid())?;
        String::from_utf8(bytes).map_err(|_| self.invalid())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn invalid(&self) -> CoreError {
        CoreError::InvalidIdentityKey {
            key: self.0.clone(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
