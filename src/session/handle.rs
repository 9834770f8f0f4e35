//! PeerHandle - a shared handle to one live peer connection
//!
//! Wraps a full-duplex [`Stream`] as a line-oriented connection. The handle
//! is cheap to clone; all clones refer to the same underlying stream. The
//! read and write halves are guarded independently, so a worker waiting for
//! the peer's next line does not block writes addressed to that peer.
//!
//! `request` holds the write guard across the whole round trip, so two
//! concurrent round trips against the same peer are serialized. The protocol
//! has no correlation identifiers; serializing here is what keeps a reply
//! attributable to its request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{split, AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::sync::Mutex;

use crate::common::{PeerId, Result, Stream};

/// Handle to one live, line-oriented peer connection
#[derive(Clone)]
pub struct PeerHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    peer: PeerId,
    reader: Mutex<BufReader<ReadHalf<Stream>>>,
    writer: Mutex<WriteHalf<Stream>>,
    closed: AtomicBool,
}

impl PeerHandle {
    pub fn new(peer: PeerId, stream: Stream) -> Self {
        let (read_half, write_half) = split(stream);
        Self {
            inner: Arc::new(HandleInner {
                peer,
                reader: Mutex::new(BufReader::new(read_half)),
                writer: Mutex::new(write_half),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// The peer this handle is connected to
    pub fn peer(&self) -> &PeerId {
        &self.inner.peer
    }

    /// Best-effort liveness: false once EOF or an I/O error was observed.
    /// The stream can still die between this check and the next write.
    pub fn is_open(&self) -> bool {
        !self.inner.closed.load(Ordering::Acquire)
    }

    fn mark_closed(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    /// Whether two handles refer to the same underlying connection
    pub fn same_connection(&self, other: &PeerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read one line from the peer. Returns `None` on end-of-stream.
    pub async fn read_line(&self) -> Result<Option<String>> {
        let mut reader = self.inner.reader.lock().await;
        self.read_line_locked(&mut reader).await
    }

    /// Write one newline-terminated line to the peer and flush
    pub async fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self.inner.writer.lock().await;
        self.write_line_locked(&mut writer, line).await
    }

    /// One request/response round trip: write a line, read exactly one
    /// reply line. The write guard is held for the duration, serializing
    /// round trips per peer. Returns `None` if the peer closed without
    /// replying.
    pub async fn request(&self, line: &str) -> Result<Option<String>> {
        let mut writer = self.inner.writer.lock().await;
        self.write_line_locked(&mut writer, line).await?;

        let mut reader = self.inner.reader.lock().await;
        self.read_line_locked(&mut reader).await
    }

    async fn read_line_locked(
        &self,
        reader: &mut BufReader<ReadHalf<Stream>>,
    ) -> Result<Option<String>> {
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                self.mark_closed();
                Ok(None)
            }
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Ok(Some(line))
            }
            Err(e) => {
                self.mark_closed();
                Err(e.into())
            }
        }
    }

    async fn write_line_locked(
        &self,
        writer: &mut WriteHalf<Stream>,
        line: &str,
    ) -> Result<()> {
        let result = async {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = result {
            self.mark_closed();
            return Err(e.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for PeerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerHandle")
            .field("peer", &self.inner.peer)
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::IntoStream;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_write_line_appends_newline() {
        let (local, mut remote) = tokio::io::duplex(1024);
        let handle = PeerHandle::new(PeerId::from("c1"), local.into_stream());

        handle.write_line("hello").await.unwrap();

        let mut buf = [0u8; 16];
        let n = remote.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello\n");
    }

    #[tokio::test]
    async fn test_read_line_strips_terminator() {
        let (local, mut remote) = tokio::io::duplex(1024);
        let handle = PeerHandle::new(PeerId::from("c1"), local.into_stream());

        remote.write_all(b"pong\n").await.unwrap();
        assert_eq!(handle.read_line().await.unwrap(), Some("pong".to_string()));
    }

    #[tokio::test]
    async fn test_eof_returns_none_and_closes_handle() {
        let (local, remote) = tokio::io::duplex(1024);
        let handle = PeerHandle::new(PeerId::from("c1"), local.into_stream());
        assert!(handle.is_open());

        drop(remote);
        assert_eq!(handle.read_line().await.unwrap(), None);
        assert!(!handle.is_open());
    }

    #[tokio::test]
    async fn test_request_round_trip() {
        let (local, remote) = tokio::io::duplex(1024);
        let handle = PeerHandle::new(PeerId::from("server-1"), local.into_stream());

        let far_end = tokio::spawn(async move {
            let mut reader = BufReader::new(remote);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            assert_eq!(line, "ping\n");
            reader.get_mut().write_all(b"pong\n").await.unwrap();
        });

        let reply = handle.request("ping").await.unwrap();
        assert_eq!(reply, Some("pong".to_string()));
        far_end.await.unwrap();
    }

    #[tokio::test]
    async fn test_request_without_reply_returns_none() {
        let (local, remote) = tokio::io::duplex(1024);
        let handle = PeerHandle::new(PeerId::from("server-1"), local.into_stream());

        // Far end reads the request and closes without answering
        let far_end = tokio::spawn(async move {
            let mut reader = BufReader::new(remote);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
        });

        let reply = handle.request("ping").await.unwrap();
        assert_eq!(reply, None);
        assert!(!handle.is_open());
        far_end.await.unwrap();
    }
}
