//! Light identity type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name a light is registered under
///
/// Surrounding whitespace is trimmed so names read from configuration
/// compare equal however they were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightId(String);

impl LightId {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LightId {
    fn from(s: &str) -> Self {
        LightId::new(s)
    }
}

impl From<String> for LightId {
    fn from(s: String) -> Self {
        LightId::new(s)
    }
}
