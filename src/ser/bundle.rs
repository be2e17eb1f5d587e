//! The buffers of one output group.
//!
//! Every group shape is a fixed concatenation of header bytes, chunk framing and body bytes,
//! wrapped in [`Consuming`] so partial writes can be retired in place.
use bytes::Bytes;
use std::{fmt, iter::FusedIterator};

use crate::{
    buf::{Cat, Consuming, ConsumingSpans},
    chunk::{CRLF, ChunkSize, LAST_CHUNK},
    precondition::precondition,
};

type Static = &'static [u8];

macro_rules! bundle {
    ($($(#[$doc:meta])* $name:ident($ty:ty);)*) => {
        /// Tagged union over the group shapes, exactly one is live.
        pub(crate) enum Bundle {
            /// No group, nothing was built or the last one is fully consumed.
            Empty,
            $(
                $(#[$doc])*
                $name(Consuming<$ty>),
            )*
        }

        impl Bundle {
            pub(crate) fn spans(&self) -> BundleSpans<'_> {
                match self {
                    Self::Empty => BundleSpans::Empty,
                    $(Self::$name(b) => BundleSpans::$name(b.spans()),)*
                }
            }

            /// Retire `n` bytes from the front.
            pub(crate) fn consume(&mut self, n: usize) {
                match self {
                    Self::Empty => precondition!(n == 0, "consumed {n} bytes of an empty buffer group"),
                    $(Self::$name(b) => b.consume(n),)*
                }
            }

            pub(crate) fn remaining(&self) -> usize {
                match self {
                    Self::Empty => 0,
                    $(Self::$name(b) => b.remaining(),)*
                }
            }

            pub(crate) fn is_empty(&self) -> bool {
                match self {
                    Self::Empty => true,
                    $(Self::$name(b) => b.is_empty(),)*
                }
            }

            pub(crate) const fn name(&self) -> &'static str {
                match self {
                    Self::Empty => "Empty",
                    $(Self::$name(_) => stringify!($name),)*
                }
            }
        }

        /// Unconsumed spans of a [`Bundle`].
        pub(crate) enum BundleSpans<'a> {
            Empty,
            $($name(ConsumingSpans<'a, $ty>),)*
        }

        impl<'a> Iterator for BundleSpans<'a> {
            type Item = &'a [u8];

            fn next(&mut self) -> Option<Self::Item> {
                match self {
                    Self::Empty => None,
                    $(Self::$name(s) => s.next(),)*
                }
            }
        }
    };
}

bundle! {
    /// `<head>`
    HeaderOnly(Bytes);
    /// `<head><data>`
    Header(Cat<(Bytes, Bytes)>);
    /// `<data>`
    Body(Bytes);
    /// `<head><size>\r\n<data>\r\n`
    HeaderChunk(Cat<(Bytes, ChunkSize, Bytes, Static)>);
    /// `<size>\r\n<data>\r\n`
    Chunk(Cat<(ChunkSize, Bytes, Static)>);
    /// `<size>\r\n<data>\r\n0\r\n\r\n`
    ChunkFinal(Cat<(ChunkSize, Bytes, Static, Static, Static)>);
    /// `<head><size>\r\n<data>\r\n0\r\n\r\n`
    AllInOne(Cat<(Bytes, ChunkSize, Bytes, Static, Static, Static)>);
    /// `0\r\n\r\n`
    Final(Cat<(Static, Static)>);
}

impl Bundle {
    pub(crate) fn header_only(head: Bytes) -> Self {
        Self::HeaderOnly(Consuming::new(head))
    }

    pub(crate) fn header(head: Bytes, data: Bytes) -> Self {
        Self::Header(Consuming::new(Cat::new((head, data))))
    }

    pub(crate) fn body(data: Bytes) -> Self {
        Self::Body(Consuming::new(data))
    }

    pub(crate) fn header_chunk(head: Bytes, data: Bytes) -> Self {
        let size = chunk_size(&data);
        Self::HeaderChunk(Consuming::new(Cat::new((head, size, data, CRLF))))
    }

    pub(crate) fn chunk(data: Bytes) -> Self {
        let size = chunk_size(&data);
        Self::Chunk(Consuming::new(Cat::new((size, data, CRLF))))
    }

    pub(crate) fn chunk_final(data: Bytes) -> Self {
        let size = chunk_size(&data);
        Self::ChunkFinal(Consuming::new(Cat::new((size, data, CRLF, LAST_CHUNK, CRLF))))
    }

    pub(crate) fn all_in_one(head: Bytes, data: Bytes) -> Self {
        let size = chunk_size(&data);
        Self::AllInOne(Consuming::new(Cat::new((head, size, data, CRLF, LAST_CHUNK, CRLF))))
    }

    pub(crate) fn last() -> Self {
        Self::Final(Consuming::new(Cat::new((LAST_CHUNK, CRLF))))
    }
}

/// The size line, its CRLF included.
fn chunk_size(data: &Bytes) -> ChunkSize {
    // a zero size chunk would terminate the body
    debug_assert!(!data.is_empty(), "empty chunk framed");
    ChunkSize::new(data.len() as u64)
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.remaining())
    }
}

impl FusedIterator for BundleSpans<'_> {}
