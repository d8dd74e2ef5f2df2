//! Individual controller session handling

use crate::command::CommandExecutor;
use anyhow::{Context, Result};
use robot_sim_shared::codec::{self, LineDecoder};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

/// One controller connection
///
/// Requests are executed strictly in arrival order; a mount or dismount
/// blocks the session (and the whole server) until it has settled.
pub struct RobotSession<S> {
    addr: SocketAddr,
    stream: S,
    decoder: LineDecoder,
    read_buf: Vec<u8>,
}

impl<S> RobotSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new session from a connected stream
    pub fn new(stream: S, addr: SocketAddr) -> Self {
        Self {
            addr,
            stream,
            decoder: LineDecoder::new(),
            read_buf: vec![0u8; 1024],
        }
    }

    /// Get the remote address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Read the next request line from this session
    /// Returns None if the connection is closed
    pub async fn recv(&mut self) -> Result<Option<String>> {
        loop {
            // First try to decode from existing buffer
            if let Some(line) = self.decoder.decode_next()? {
                return Ok(Some(line));
            }

            // Read more data
            let n = self
                .stream
                .read(&mut self.read_buf)
                .await
                .with_context(|| format!("Read error from {}", self.addr))?;
            if n == 0 {
                return Ok(None);
            }
            self.decoder.extend(&self.read_buf[..n]);
        }
    }

    /// Send one reply line
    pub async fn send(&mut self, reply: &str) -> Result<()> {
        let frame = codec::encode_reply(reply);
        self.stream
            .write_all(&frame)
            .await
            .with_context(|| format!("Write error to {}", self.addr))?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Serve requests until the peer disconnects or a request faults
    pub async fn run(&mut self, executor: &mut CommandExecutor) -> Result<()> {
        while let Some(request) = self.recv().await? {
            let reply = executor
                .execute(&request)
                .with_context(|| format!("Request '{}' failed", request))?
                .render();

            info!("'{}' -> '{}'", request, reply.as_deref().unwrap_or_default());

            if let Some(reply) = reply {
                self.send(&reply).await?;
            }
        }

        Ok(())
    }
}
