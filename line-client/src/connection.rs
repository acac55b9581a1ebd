//! A single light's control socket

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{BoxedStream, Connector, Endpoint, FrameReader, LineError, TERMINATOR};

/// Whether [`Connection::ensure_connected`] had to open a new socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialOutcome {
    /// The existing socket was kept
    Reused,
    /// A new socket was dialed
    Dialed,
}

/// Lazily dialed socket to one light
///
/// Any failed write or read closes the socket, so the next
/// [`ensure_connected`](Connection::ensure_connected) starts from a fresh dial.
/// Buffered bytes from a previous socket never leak into the next one.
pub struct Connection {
    endpoint: Endpoint,
    connector: Arc<dyn Connector>,
    connect_timeout: Duration,
    read_timeout: Duration,
    stream: Option<BoxedStream>,
    reader: FrameReader,
}

impl Connection {
    pub fn new(
        endpoint: Endpoint,
        connector: Arc<dyn Connector>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Self {
        Self {
            endpoint,
            connector,
            connect_timeout,
            read_timeout,
            stream: None,
            reader: FrameReader::new(),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Dial the light unless a socket is already open
    pub async fn ensure_connected(&mut self) -> Result<DialOutcome, LineError> {
        if self.stream.is_some() {
            return Ok(DialOutcome::Reused);
        }

        debug!(light = %self.endpoint, "dialing");
        let stream = self
            .connector
            .connect(&self.endpoint, self.connect_timeout)
            .await?;
        self.reader.clear();
        self.stream = Some(stream);
        Ok(DialOutcome::Dialed)
    }

    /// Write `payload` followed by the frame terminator
    pub async fn write_line(&mut self, payload: &str) -> Result<(), LineError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(LineError::NotConnected);
        };

        let mut line = Vec::with_capacity(payload.len() + TERMINATOR.len());
        line.extend_from_slice(payload.as_bytes());
        line.extend_from_slice(TERMINATOR);

        let result = match stream.write_all(&line).await {
            Ok(()) => stream.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            self.close();
            return Err(LineError::Write(e.to_string()));
        }
        Ok(())
    }

    /// Read one frame, failing if it does not complete within the read timeout
    pub async fn read_frame(&mut self) -> Result<Vec<u8>, LineError> {
        let deadline = self.read_timeout;
        let result = {
            let Some(stream) = self.stream.as_mut() else {
                return Err(LineError::NotConnected);
            };
            match tokio::time::timeout(deadline, self.reader.read_frame(stream)).await {
                Ok(result) => result,
                Err(_) => Err(LineError::Timeout(deadline)),
            }
        };
        if result.is_err() {
            self.close();
        }
        result
    }

    /// Read one frame with no deadline
    ///
    /// Used to drain unsolicited frames while no command is in flight. Cancel
    /// safe, so it can sit in a `select!` next to a request queue.
    pub async fn wait_frame(&mut self) -> Result<Vec<u8>, LineError> {
        let result = {
            let Some(stream) = self.stream.as_mut() else {
                return Err(LineError::NotConnected);
            };
            self.reader.read_frame(stream).await
        };
        if result.is_err() {
            self.close();
        }
        result
    }

    /// Drop the socket and anything buffered from it
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!(light = %self.endpoint, "connection closed");
        }
        self.reader.clear();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("connected", &self.stream.is_some())
            .field("buffered", &self.reader.buffered())
            .finish()
    }
}
