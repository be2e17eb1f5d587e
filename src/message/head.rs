use bytes::{Bytes, BytesMut};

use super::{Message, StartLine};
use crate::headers::standard::{CONTENT_LENGTH, TRANSFER_ENCODING};

/// Payload framing of a formatted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `Content-Length`, the body is exactly this many bytes.
    ContentLength(u64),
    /// `Transfer-Encoding: chunked`.
    Chunked,
    /// No framing header, the body is written as is and ends when the connection closes.
    Unframed,
    /// The message never carries content, the header block is all there is.
    NoContent,
}

/// Write the header block of a message into `dst`.
///
/// The block is the start line, every header field in order, and the empty line.
///
/// # Errors
///
/// Returns error if the start line is invalid, or the framing headers conflict. Nothing is
/// written to `dst` on error.
pub fn write_head<S: StartLine, B>(msg: &Message<S, B>, dst: &mut BytesMut) -> Result<Framing, HeadError> {
    let framing = framing(msg)?;
    let start = dst.len();

    if let Err(err) = msg.line.write_line(msg.version, dst) {
        dst.truncate(start);
        return Err(err);
    }
    dst.extend_from_slice(b"\r\n");

    for (name, value) in &msg.headers {
        dst.extend_from_slice(name.as_bytes());
        dst.extend_from_slice(b": ");
        dst.extend_from_slice(value.as_bytes());
        dst.extend_from_slice(b"\r\n");
    }

    dst.extend_from_slice(b"\r\n");
    Ok(framing)
}

/// Format the header block into an owned buffer.
pub(crate) fn format<S: StartLine, B>(msg: &Message<S, B>) -> Result<(Bytes, Framing), HeadError> {
    let mut buf = BytesMut::with_capacity(128);
    let framing = write_head(msg, &mut buf)?;
    Ok((buf.freeze(), framing))
}

fn framing<S: StartLine, B>(msg: &Message<S, B>) -> Result<Framing, HeadError> {
    // framing headers of a 304 describe the selected representation, not this message
    if !msg.line.allows_content() {
        return Ok(Framing::NoContent);
    }

    let mut content_len = None;
    for value in msg.headers.get_all(CONTENT_LENGTH) {
        let Some(len) = parse_content_length(value.as_bytes()) else {
            return Err(HeadError::InvalidContentLength);
        };
        match content_len {
            Some(prev) if prev != len => return Err(HeadError::InvalidContentLength),
            _ => content_len = Some(len),
        }
    }

    if !msg.headers.contains_key(TRANSFER_ENCODING) {
        return Ok(match content_len {
            Some(len) => Framing::ContentLength(len),
            None => msg.line.default_framing(),
        });
    }

    if content_len.is_some() {
        return Err(HeadError::InvalidCodings);
    }
    if !msg.chunked() {
        return Err(HeadError::UnknownCodings);
    }
    if !msg.version.supports_chunked() {
        return Err(HeadError::ChunkedVersion);
    }
    Ok(Framing::Chunked)
}

/// `Content-Length = 1*DIGIT`
pub(crate) fn parse_content_length(mut bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut len = 0u64;
    while let [byte @ b'0'..=b'9', rest @ ..] = bytes {
        len = len.checked_mul(10)?.checked_add((byte - b'0') as u64)?;
        bytes = rest;
    }
    bytes.is_empty().then_some(len)
}

// ===== Error =====

/// An error when formatting a message header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadError {
    /// `Content-Length` is not a decimal integer, or multiple values disagree.
    InvalidContentLength,
    /// Both `Content-Length` and `Transfer-Encoding` are present.
    InvalidCodings,
    /// `Transfer-Encoding` is present but the last coding is not `chunked`.
    UnknownCodings,
    /// Chunked transfer coding on HTTP/1.0.
    ChunkedVersion,
    /// Request target is empty or contains invalid byte.
    InvalidTarget,
    /// Reason phrase contains invalid byte.
    InvalidReason,
}

impl HeadError {
    const fn message(&self) -> &'static str {
        match self {
            Self::InvalidContentLength => "invalid content-length",
            Self::InvalidCodings => "content-length and transfer-encoding are both present",
            Self::UnknownCodings => "last transfer coding is not chunked",
            Self::ChunkedVersion => "chunked transfer coding is not supported in HTTP/1.0",
            Self::InvalidTarget => "invalid request target",
            Self::InvalidReason => "invalid reason phrase",
        }
    }
}

impl std::error::Error for HeadError {}

impl std::fmt::Display for HeadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
