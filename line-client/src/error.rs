//! Error types for the line client

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a light over its control socket
#[derive(Debug, Error)]
pub enum LineError {
    /// The TCP connection could not be established
    #[error("Dial error: {0}")]
    Dial(String),

    /// The TCP connection was not established within the connect timeout
    #[error("Dial timed out after {0:?}")]
    DialTimeout(Duration),

    /// Writing a frame to the socket failed
    #[error("Write error: {0}")]
    Write(String),

    /// Reading from the socket failed
    #[error("Read error: {0}")]
    Read(String),

    /// No complete frame arrived before the read deadline
    #[error("Read timed out after {0:?}")]
    Timeout(Duration),

    /// The light closed the connection
    #[error("Connection closed by peer")]
    Closed,

    /// A write or read was attempted without a live socket
    #[error("Not connected")]
    NotConnected,

    /// Buffered bytes grew past the frame limit without a terminator
    #[error("Frame exceeds {0} bytes without terminator")]
    FrameTooLong(usize),
}

impl LineError {
    /// Whether this error was caused by a deadline rather than the peer
    pub fn is_timeout(&self) -> bool {
        matches!(self, LineError::DialTimeout(_) | LineError::Timeout(_))
    }
}
