use std::time::Duration;

use line_client::{Endpoint, LineError};
use thiserror::Error;

/// Errors that can occur while sending a command to a light
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The socket could not be established
    #[error("Failed to dial {endpoint}: {source}")]
    Dial {
        endpoint: Endpoint,
        #[source]
        source: LineError,
    },

    /// The request frame could not be written
    #[error("Failed to write command: {0}")]
    Write(#[source] LineError),

    /// No reply frame could be read, including read timeouts
    #[error("Failed to read reply: {0}")]
    Read(#[source] LineError),

    /// The write and read phase of an attempt outlived the watchdog
    #[error("Watchdog expired after {0:?}, connection closed")]
    Watchdog(Duration),

    /// The light sent a frame that is not UTF-8 text
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// The payload would reach the light as more than one frame
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Every attempt in the budget failed at the transport level
    #[error("Command failed after {attempts} attempts: {last_error}")]
    AttemptsExhausted {
        attempts: u32,
        #[source]
        last_error: Box<ChannelError>,
    },

    /// The channel task is gone
    #[error("Command channel closed")]
    Closed,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ChannelError {
    /// Failures that close the socket and are worth another attempt
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChannelError::Dial { .. }
                | ChannelError::Write(_)
                | ChannelError::Read(_)
                | ChannelError::Watchdog(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ChannelError::Dial { source, .. } => source.is_timeout(),
            ChannelError::Read(source) | ChannelError::Write(source) => source.is_timeout(),
            ChannelError::Watchdog(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;
