use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::protocol::OutboundFrame;

#[derive(Debug, Error)]
pub enum ConnError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("connection is not writable: {0}")]
    Io(#[from] std::io::Error),
}

/// Write side of the persistent server connection.
///
/// Every frame goes out as one buffer under one lock, so a frame's header and
/// body can never interleave with another writer on the wire. A failed send
/// means the connection is lost; there is no reconnect, the session ends.
pub struct FrameChannel {
    writer: Mutex<OwnedWriteHalf>,
}

impl FrameChannel {
    /// Connect to the inference server. The returned read half belongs to the
    /// receive loop; the channel keeps the write half.
    pub async fn connect(addr: &str) -> Result<(Self, OwnedReadHalf), ConnError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ConnError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        let (read_half, write_half) = stream.into_split();
        Ok((
            Self {
                writer: Mutex::new(write_half),
            },
            read_half,
        ))
    }

    pub async fn send_frame(&self, frame: &OutboundFrame) -> Result<(), SendError> {
        let bytes = frame.encode();
        let mut writer = self.writer.lock().await;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Shut down the write side. The server closes its end in response, which
    /// surfaces as EOF on the receive loop's read.
    pub async fn close(&self) {
        let mut writer = self.writer.lock().await;
        let _ = writer.shutdown().await;
    }
}
