//! Private line client for Yeelight LAN control
//!
//! This crate provides the socket layer used to talk to a single light over
//! its control port: dialing with a timeout, writing `\r\n` terminated frames
//! and reading frames back under a read deadline. It knows nothing about the
//! JSON carried inside the frames.

mod connection;
mod error;
mod frame;

pub use connection::{Connection, DialOutcome};
pub use error::LineError;
pub use frame::{FrameReader, MAX_FRAME_LEN, TERMINATOR};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// TCP port Yeelight bulbs listen on for LAN control
pub const DEFAULT_PORT: u16 = 55443;

/// Network address of a light's control socket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Endpoint on the default control port
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Byte stream a [`Connection`] can drive
pub trait LineStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> LineStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Boxed stream handed out by a [`Connector`]
pub type BoxedStream = Box<dyn LineStream>;

/// Opens byte streams to lights
///
/// Production code uses [`TcpConnector`]. Tests substitute in-memory streams
/// to script exactly what a light sends back.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, endpoint: &Endpoint, timeout: Duration)
        -> Result<BoxedStream, LineError>;
}

/// Connector that dials real TCP sockets
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        timeout: Duration,
    ) -> Result<BoxedStream, LineError> {
        let addr = endpoint.to_string();
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr.as_str()))
            .await
            .map_err(|_| LineError::DialTimeout(timeout))?
            .map_err(|e| LineError::Dial(e.to_string()))?;

        // Frames are small and latency matters more than throughput
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(light = %endpoint, error = %e, "failed to set TCP_NODELAY");
        }

        Ok(Box::new(stream))
    }
}
