//! Operation framework shared by every Yeelight command
//!
//! An operation knows its method name, how to render its parameters and how
//! to decode the `result` array that comes back. Validation runs inside
//! [`LightOperation::encode`], so an out-of-range value never produces a
//! payload and therefore never reaches the socket.

use std::fmt::Display;

use serde_json::{json, Value};

use crate::error::Result;
use crate::reply;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' value '{value}' is out of range ({min}..={max})")]
    RangeError {
        parameter: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Required parameter '{parameter}' is missing")]
    MissingParameter { parameter: String },
}

impl ValidationError {
    pub fn range_error(
        parameter: &str,
        min: impl Display,
        max: impl Display,
        value: impl Display,
    ) -> Self {
        Self::RangeError {
            parameter: parameter.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid_value(parameter: &str, value: impl Display, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(parameter: &str) -> Self {
        Self::MissingParameter {
            parameter: parameter.to_string(),
        }
    }

    /// Name of the parameter that failed
    pub fn parameter(&self) -> &str {
        match self {
            Self::RangeError { parameter, .. }
            | Self::InvalidValue { parameter, .. }
            | Self::MissingParameter { parameter } => parameter,
        }
    }
}

/// Check `value` lies in `min..=max`
pub(crate) fn check_range<T>(parameter: &str, value: T, min: T, max: T) -> std::result::Result<(), ValidationError>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(ValidationError::range_error(parameter, min, max, value));
    }
    Ok(())
}

/// Trait for types that can be validated
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

/// A command a light understands
pub trait LightOperation: Validate {
    /// Decoded form of the `result` array
    type Response;

    /// Attempt budget used when the caller does not pick one
    const MAX_ATTEMPTS: u32 = 10;

    /// Protocol method name, including any `bg_` prefix
    fn method(&self) -> &'static str;

    /// Positional parameters, in protocol order
    fn params(&self) -> Vec<Value>;

    /// Decode the `result` array of a successful reply
    fn parse_result(&self, result: &[Value]) -> Result<Self::Response>;

    /// Validate, then render the request frame body for request `id`
    fn encode(&self, id: u64) -> std::result::Result<String, ValidationError> {
        self.validate()?;
        Ok(json!({
            "id": id,
            "method": self.method(),
            "params": self.params(),
        })
        .to_string())
    }

    /// Decode a raw reply frame for this operation
    fn decode(&self, reply: &str) -> Result<Self::Response> {
        let result = reply::parse_result(reply)?;
        self.parse_result(&result)
    }
}
