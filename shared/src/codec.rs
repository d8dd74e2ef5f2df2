//! Newline-delimited codec for TCP framing
//!
//! Requests are framed as:
//! ```text
//! <request text>\n
//! ```
//! and replies as:
//! ```text
//! <reply text>\r\n
//! ```
//!
//! Surrounding whitespace (including a `\r` sent before the `\n`) is trimmed
//! from each request line.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Reply line terminator
pub const REPLY_TERMINATOR: &[u8] = b"\r\n";

/// Errors that can occur during decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Request line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Frame a reply for the wire
pub fn encode_reply(reply: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(reply.len() + REPLY_TERMINATOR.len());
    buf.put_slice(reply.as_bytes());
    buf.put_slice(REPLY_TERMINATOR);
    buf.freeze()
}

/// Try to decode one request line from a buffer
///
/// Returns:
/// - `Ok(Some(line))` if a complete line was consumed
/// - `Ok(None)` if no newline has arrived yet
/// - `Err(...)` if the consumed line is not UTF-8
pub fn decode(buf: &mut BytesMut) -> Result<Option<String>, CodecError> {
    let Some(idx) = buf.iter().position(|&b| b == b'\n') else {
        return Ok(None);
    };

    // Consume the line including its newline
    let line = buf.split_to(idx + 1);
    let text = std::str::from_utf8(&line)?;

    Ok(Some(text.trim().to_string()))
}

/// Accumulates inbound bytes and hands out complete request lines
#[derive(Debug, Default)]
pub struct LineDecoder {
    /// Bytes received but not yet consumed as a line
    buffer: BytesMut,
}

impl LineDecoder {
    /// Create a new line decoder
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(1024),
        }
    }

    /// Add data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next line from the buffer
    ///
    /// Call this repeatedly until it returns `Ok(None)` to drain all complete lines
    pub fn decode_next(&mut self) -> Result<Option<String>, CodecError> {
        decode(&mut self.buffer)
    }
}
