//! Message body sources.
//!
//! A [`Body`] is stored in the message, a [`BodyWriter`] is created from it per
//! serialization and yields the body content one chunk at a time.
use bytes::Bytes;
use std::{io, task::Poll};

use crate::headers::HeaderMap;

mod full;
mod chunks;
#[cfg(feature = "tokio")]
mod channel;

pub use full::{Empty, Full, FullWriter};
pub use chunks::{Chunks, ChunksWriter};
#[cfg(feature = "tokio")]
pub use channel::{BodySender, Channel, ChannelWriter, channel};

/// A message body.
pub trait Body {
    /// The writer yielding this body content.
    type Writer: BodyWriter;

    /// Returns the exact body length, if known in advance.
    fn size_hint(&self) -> Option<u64>;

    /// Create the writer for one serialization of the message.
    fn writer(&self, headers: &HeaderMap) -> Self::Writer;
}

/// Incremental producer of body content.
pub trait BodyWriter {
    /// Prepare the writer, called exactly once before the first [`get`][BodyWriter::get].
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be produced.
    fn init(&mut self) -> Result<(), BodyError> {
        Ok(())
    }

    /// Pull the next chunk of body content.
    ///
    /// - `Ready(Ok(Some((chunk, more))))`, a chunk, `more` is `false` if it is the last one
    /// - `Ready(Ok(None))`, the body is exhausted
    /// - `Pending`, no data yet, this is not an error
    /// - `Ready(Err(..))`, the body cannot be produced
    fn get(&mut self) -> Poll<Result<Option<(Bytes, bool)>, BodyError>>;
}

impl<W: BodyWriter + ?Sized> BodyWriter for &mut W {
    #[inline]
    fn init(&mut self) -> Result<(), BodyError> {
        W::init(self)
    }

    #[inline]
    fn get(&mut self) -> Poll<Result<Option<(Bytes, bool)>, BodyError>> {
        W::get(self)
    }
}

impl<W: BodyWriter + ?Sized> BodyWriter for Box<W> {
    #[inline]
    fn init(&mut self) -> Result<(), BodyError> {
        W::init(self)
    }

    #[inline]
    fn get(&mut self) -> Poll<Result<Option<(Bytes, bool)>, BodyError>> {
        W::get(self)
    }
}

// ===== Error =====

/// An error when producing body content.
#[derive(Debug)]
pub enum BodyError {
    /// IO error from the body source.
    Io(io::Error),
    /// Body content is larger than the message framing allows.
    LengthExceeded,
    /// Body content ends before the declared `Content-Length`.
    Incomplete,
    /// Body source is closed before the end of the body.
    Closed,
    /// Any other error from the body source.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl BodyError {
    /// Create [`BodyError::Other`] from any error.
    pub fn other<E: Into<Box<dyn std::error::Error + Send + Sync>>>(err: E) -> Self {
        Self::Other(err.into())
    }
}

impl From<io::Error> for BodyError {
    #[inline]
    fn from(v: io::Error) -> Self {
        Self::Io(v)
    }
}

impl std::error::Error for BodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Other(err) => Some(err.as_ref()),
            Self::LengthExceeded | Self::Incomplete | Self::Closed => None,
        }
    }
}

impl std::fmt::Display for BodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => err.fmt(f),
            Self::LengthExceeded => f.write_str("body exceeds content-length"),
            Self::Incomplete => f.write_str("body ends before content-length"),
            Self::Closed => f.write_str("body source closed"),
            Self::Other(err) => err.fmt(f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn drain<W: BodyWriter>(mut writer: W) -> Vec<(Bytes, bool)> {
        writer.init().unwrap();
        let mut chunks = Vec::new();
        while let Poll::Ready(Some(chunk)) = writer.get().map(Result::unwrap) {
            chunks.push(chunk);
        }
        chunks
    }

    #[test]
    fn test_writers() {
        let headers = HeaderMap::new();

        let full = Full::new("Hello");
        assert_eq!(full.size_hint(), Some(5));
        assert_eq!(drain(full.writer(&headers)), [(Bytes::from_static(b"Hello"), false)]);
        // a writer per serialization
        assert_eq!(drain(full.writer(&headers)).len(), 1);

        assert!(drain(Full::new("").writer(&headers)).is_empty());
        assert!(drain(Empty.writer(&headers)).is_empty());
        assert_eq!(Empty.size_hint(), Some(0));

        let chunks = Chunks::from_iter(["ab", "", "cde"]);
        assert_eq!(chunks.size_hint(), Some(5));
        assert_eq!(
            drain(chunks.writer(&headers)),
            [
                (Bytes::from_static(b"ab"), true),
                (Bytes::new(), true),
                (Bytes::from_static(b"cde"), false),
            ]
        );
    }
}
