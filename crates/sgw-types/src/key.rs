use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// Maximum length of a valid object key.
pub const MAX_KEY_LEN: usize = 32;

/// External object identifier.
///
/// Holds the raw string exactly as received. Construction never validates;
/// callers decide when to check with [`ObjectKey::is_valid`] or
/// [`ObjectKey::validate`]. A key is valid iff it is 1 to 32 ASCII
/// alphanumeric characters. No trimming or case folding is applied.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= MAX_KEY_LEN
            && self.0.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    /// Fails with [`GatewayError::NotValid`] for a malformed key.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GatewayError::object_id_not_valid())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({:?})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ObjectKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
