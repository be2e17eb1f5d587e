use bytes::Bytes;
use std::task::Poll;

use super::{Body, BodyError, BodyWriter};
use crate::headers::HeaderMap;

/// A [`Body`] that consist of a single chunk.
#[derive(Clone, Debug, Default)]
pub struct Full {
    data: Bytes,
}

impl Full {
    /// Creates a new [`Full`].
    #[inline]
    pub fn new<B: Into<Bytes>>(data: B) -> Self {
        Self { data: data.into() }
    }

    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl Body for Full {
    type Writer = FullWriter;

    #[inline]
    fn size_hint(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    #[inline]
    fn writer(&self, _: &HeaderMap) -> Self::Writer {
        FullWriter {
            data: (!self.data.is_empty()).then(|| self.data.clone()),
        }
    }
}

/// [`BodyWriter`] of [`Full`].
#[derive(Debug)]
pub struct FullWriter {
    data: Option<Bytes>,
}

impl BodyWriter for FullWriter {
    #[inline]
    fn get(&mut self) -> Poll<Result<Option<(Bytes, bool)>, BodyError>> {
        Poll::Ready(Ok(self.data.take().map(|data| (data, false))))
    }
}

impl From<Bytes> for Full {
    #[inline]
    fn from(value: Bytes) -> Self {
        Self::new(value)
    }
}

impl From<&'static str> for Full {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<&'static [u8]> for Full {
    #[inline]
    fn from(value: &'static [u8]) -> Self {
        Self::new(value)
    }
}

impl From<String> for Full {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for Full {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

// ===== Empty =====

/// A [`Body`] without content.
#[derive(Clone, Copy, Debug, Default)]
pub struct Empty;

impl Body for Empty {
    type Writer = Empty;

    #[inline]
    fn size_hint(&self) -> Option<u64> {
        Some(0)
    }

    #[inline]
    fn writer(&self, _: &HeaderMap) -> Self::Writer {
        Empty
    }
}

impl BodyWriter for Empty {
    #[inline]
    fn get(&mut self) -> Poll<Result<Option<(Bytes, bool)>, BodyError>> {
        Poll::Ready(Ok(None))
    }
}
