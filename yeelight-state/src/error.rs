//! Error types for yeelight-state

use std::fmt;

use crate::model::LightId;

/// Result type for yeelight-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while decoding or caching light state
#[derive(Debug)]
pub enum StateError {
    /// The light was never registered with the cache
    UnknownLight(LightId),

    /// A reported property value could not be decoded
    Decode {
        property: &'static str,
        value: String,
        reason: String,
    },

    /// A reply did not carry the expected number of values
    Arity { expected: usize, actual: usize },

    /// A partial update carried a value outside its documented range
    InvalidUpdate(String),
}

impl StateError {
    pub(crate) fn decode(
        property: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        StateError::Decode {
            property,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::UnknownLight(id) => write!(f, "Light not found: {}", id),
            StateError::Decode {
                property,
                value,
                reason,
            } => write!(f, "Cannot decode {} = {:?}: {}", property, value, reason),
            StateError::Arity { expected, actual } => {
                write!(f, "Expected {} property values, got {}", expected, actual)
            }
            StateError::InvalidUpdate(msg) => write!(f, "Invalid update: {}", msg),
        }
    }
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StateError::decode("bright", "150", "out of range 1..=100");
        assert_eq!(
            err.to_string(),
            "Cannot decode bright = \"150\": out of range 1..=100"
        );

        let err = StateError::UnknownLight(LightId::new("desk"));
        assert_eq!(err.to_string(), "Light not found: desk");

        let err = StateError::Arity {
            expected: 23,
            actual: 21,
        };
        assert_eq!(err.to_string(), "Expected 23 property values, got 21");
    }
}
