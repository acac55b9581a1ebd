use thiserror::Error;

use crate::operation::ValidationError;

/// High-level API errors for Yeelight operations
///
/// Transport failures live one layer down in the command channel. The errors
/// here are the ones a light's answer (or a caller's input) can produce, and
/// none of them is worth retrying.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid parameter value
    ///
    /// Returned before a request payload is ever produced, so a rejected
    /// command never reaches the socket.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ValidationError),

    /// Reply frame could not be decoded into the expected shape
    ///
    /// Covers invalid JSON, a missing `result` key, a result that is not an
    /// array, the wrong number of elements, or an element of the wrong type.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    /// The light answered but did not accept the command
    #[error("Command rejected by light: {0}")]
    Rejected(String),
}

impl ApiError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReply(message.into())
    }

    /// True for errors raised before any I/O took place
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::InvalidParameter(_))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_conversion() {
        let err: ApiError = ValidationError::range_error("bright", 1, 100, 150).into();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Parameter 'bright' value '150' is out of range (1..=100)"
        );
    }

    #[test]
    fn test_reply_errors_are_not_validation() {
        assert!(!ApiError::malformed("missing result").is_validation());
        assert!(!ApiError::Rejected("unsupported method".to_string()).is_validation());
    }
}
