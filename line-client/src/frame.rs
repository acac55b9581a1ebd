//! Frame reader for the `\r\n` delimited control protocol

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::LineError;

/// Byte sequence terminating every frame in both directions
pub const TERMINATOR: &[u8] = b"\r\n";

/// Largest frame accepted before the reader gives up on finding a terminator
pub const MAX_FRAME_LEN: usize = 64 * 1024;

const READ_CHUNK: usize = 1024;

/// Accumulates bytes from a socket and yields one complete frame at a time
///
/// A single read may deliver several frames, or only part of one. Bytes that
/// follow the first terminator stay buffered for the next call, so nothing the
/// light sent is dropped when a push and a reply arrive back to back.
///
/// [`FrameReader::read_frame`] is cancel safe: if its future is dropped, every
/// byte already pulled off the socket remains in the buffer.
#[derive(Debug, Default)]
pub struct FrameReader {
    buf: Vec<u8>,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Drop everything buffered. Called whenever the socket is replaced.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Append raw bytes as if they had been read from the socket
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Remove and return the first complete frame, without its terminator
    pub fn take_frame(&mut self) -> Option<Vec<u8>> {
        let pos = self
            .buf
            .windows(TERMINATOR.len())
            .position(|window| window == TERMINATOR)?;
        let frame = self.buf[..pos].to_vec();
        self.buf.drain(..pos + TERMINATOR.len());
        Some(frame)
    }

    /// Read from `reader` until one complete frame is available
    pub async fn read_frame<R>(&mut self, reader: &mut R) -> Result<Vec<u8>, LineError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        loop {
            if let Some(frame) = self.take_frame() {
                return Ok(frame);
            }
            if self.buf.len() > MAX_FRAME_LEN {
                self.buf.clear();
                return Err(LineError::FrameTooLong(MAX_FRAME_LEN));
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = reader
                .read(&mut chunk)
                .await
                .map_err(|e| LineError::Read(e.to_string()))?;
            if n == 0 {
                return Err(LineError::Closed);
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_take_frame_splits_at_first_terminator() {
        let mut reader = FrameReader::new();
        reader.extend(b"{\"id\":1,\"result\":[\"ok\"]}\r\n{\"method\":\"props\"");

        let frame = reader.take_frame().unwrap();
        assert_eq!(frame, b"{\"id\":1,\"result\":[\"ok\"]}");
        assert_eq!(reader.buffered(), b"{\"method\":\"props\"".len());
        assert!(reader.take_frame().is_none());
    }

    #[test]
    fn test_take_frame_yields_frames_in_order() {
        let mut reader = FrameReader::new();
        reader.extend(b"first\r\nsecond\r\n");

        assert_eq!(reader.take_frame().unwrap(), b"first");
        assert_eq!(reader.take_frame().unwrap(), b"second");
        assert!(reader.take_frame().is_none());
        assert_eq!(reader.buffered(), 0);
    }

    #[test]
    fn test_bare_newline_is_not_a_terminator() {
        let mut reader = FrameReader::new();
        reader.extend(b"partial\nstill partial");
        assert!(reader.take_frame().is_none());
    }

    #[tokio::test]
    async fn test_read_frame_reassembles_split_writes() {
        let (mut light, mut socket) = tokio::io::duplex(64);
        let mut reader = FrameReader::new();

        let writer = tokio::spawn(async move {
            light.write_all(b"{\"id\":1,").await.unwrap();
            tokio::task::yield_now().await;
            light.write_all(b"\"result\":[\"ok\"]}\r").await.unwrap();
            tokio::task::yield_now().await;
            light.write_all(b"\n").await.unwrap();
            light
        });

        let frame = reader.read_frame(&mut socket).await.unwrap();
        assert_eq!(frame, b"{\"id\":1,\"result\":[\"ok\"]}");
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_read_frame_reports_closed_peer() {
        let (light, mut socket) = tokio::io::duplex(64);
        drop(light);

        let mut reader = FrameReader::new();
        let err = reader.read_frame(&mut socket).await.unwrap_err();
        assert!(matches!(err, LineError::Closed));
    }

    #[tokio::test]
    async fn test_read_frame_rejects_oversized_frame() {
        let (mut light, mut socket) = tokio::io::duplex(4096);
        let mut reader = FrameReader::new();

        let writer = tokio::spawn(async move {
            let junk = vec![b'x'; MAX_FRAME_LEN + READ_CHUNK * 2];
            let _ = light.write_all(&junk).await;
            light
        });

        let err = reader.read_frame(&mut socket).await.unwrap_err();
        assert!(matches!(err, LineError::FrameTooLong(MAX_FRAME_LEN)));
        assert_eq!(reader.buffered(), 0);
        drop(socket);
        let _ = writer.await;
    }
}
