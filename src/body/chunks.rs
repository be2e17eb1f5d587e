use bytes::Bytes;
use std::{collections::VecDeque, task::Poll};

use super::{Body, BodyError, BodyWriter};
use crate::headers::HeaderMap;

/// A [`Body`] of an ordered list of buffers, each yielded as its own chunk.
///
/// With chunked framing, every non-empty buffer becomes one chunk on the wire.
#[derive(Clone, Debug, Default)]
pub struct Chunks {
    chunks: Vec<Bytes>,
}

impl Chunks {
    /// Create new empty [`Chunks`].
    #[inline]
    pub const fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Append a buffer.
    #[inline]
    pub fn push<B: Into<Bytes>>(&mut self, chunk: B) {
        self.chunks.push(chunk.into());
    }

    #[inline]
    pub fn as_slice(&self) -> &[Bytes] {
        &self.chunks
    }
}

impl Body for Chunks {
    type Writer = ChunksWriter;

    fn size_hint(&self) -> Option<u64> {
        Some(self.chunks.iter().map(|c| c.len() as u64).sum())
    }

    fn writer(&self, _: &HeaderMap) -> Self::Writer {
        ChunksWriter {
            chunks: self.chunks.iter().cloned().collect(),
        }
    }
}

impl<B: Into<Bytes>> FromIterator<B> for Chunks {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// [`BodyWriter`] of [`Chunks`].
///
/// Also usable on its own, e.g. with [`Serializer::with_writer`].
///
/// [`Serializer::with_writer`]: crate::ser::Serializer::with_writer
#[derive(Debug, Default)]
pub struct ChunksWriter {
    chunks: VecDeque<Bytes>,
}

impl<B: Into<Bytes>> FromIterator<B> for ChunksWriter {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl BodyWriter for ChunksWriter {
    fn get(&mut self) -> Poll<Result<Option<(Bytes, bool)>, BodyError>> {
        let chunk = self.chunks.pop_front();
        let more = !self.chunks.is_empty();
        Poll::Ready(Ok(chunk.map(|chunk| (chunk, more))))
    }
}
