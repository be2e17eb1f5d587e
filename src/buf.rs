//! Buffer Sequences.
//!
//! - [`BufferSequence`] ordered collection of byte spans
//! - [`Cat`] a fixed tuple of sequences viewed as one sequence
//! - [`Consuming`] a sequence with a consumed prefix, implements [`Buf`][bytes::Buf]
//!
//! None of the views copy or allocate, they only walk spans owned elsewhere.
mod cat;
mod consuming;

pub use cat::{Cat, CatPos, Iter, Sequences, Spans};
pub use consuming::{Consuming, ConsumingSpans};

use bytes::Bytes;
use std::fmt;

/// An ordered collection of byte spans representing one logical byte stream.
///
/// Positions behave like bidirectional iterators: [`first_pos`] up to [`end_pos`] covers the
/// whole sequence, [`next_pos`] and [`prev_pos`] move one element, and [`span`] reads the
/// element at a position. Elements may be empty.
///
/// Stepping outside `first_pos()..=end_pos()` or reading at `end_pos()` is a contract
/// violation and panics.
///
/// [`first_pos`]: BufferSequence::first_pos
/// [`end_pos`]: BufferSequence::end_pos
/// [`next_pos`]: BufferSequence::next_pos
/// [`prev_pos`]: BufferSequence::prev_pos
/// [`span`]: BufferSequence::span
pub trait BufferSequence {
    /// Position of an element.
    type Pos: Copy + Eq + fmt::Debug;

    /// Position of the first element.
    fn first_pos(&self) -> Self::Pos;

    /// Position one past the last element.
    fn end_pos(&self) -> Self::Pos;

    /// Position following `pos`.
    fn next_pos(&self, pos: Self::Pos) -> Self::Pos;

    /// Position preceding `pos`.
    fn prev_pos(&self, pos: Self::Pos) -> Self::Pos;

    /// Returns the element at `pos`.
    fn span(&self, pos: Self::Pos) -> &[u8];

    /// Returns the total number of bytes in the sequence.
    fn byte_len(&self) -> usize {
        let end = self.end_pos();
        let mut pos = self.first_pos();
        let mut len = 0;
        while pos != end {
            len += self.span(pos).len();
            pos = self.next_pos(pos);
        }
        len
    }
}

/// Implement [`BufferSequence`] for a random access collection, positions are element indices.
macro_rules! indexed {
    (
        impl[$($g:tt)*] $ty:ty;
        count: |$this:ident| $count:expr;
        at: |$this2:ident, $i:ident| $at:expr;
    ) => {
        impl<$($g)*> $crate::buf::BufferSequence for $ty {
            type Pos = usize;

            #[inline]
            fn first_pos(&self) -> usize {
                0
            }

            #[inline]
            fn end_pos(&self) -> usize {
                let $this = self;
                $count
            }

            #[inline]
            fn next_pos(&self, pos: usize) -> usize {
                $crate::precondition::precondition!(
                    pos < self.end_pos(),
                    "incrementing past the end of a buffer sequence"
                );
                pos + 1
            }

            #[inline]
            fn prev_pos(&self, pos: usize) -> usize {
                $crate::precondition::precondition!(
                    pos != 0,
                    "decrementing before the start of a buffer sequence"
                );
                pos - 1
            }

            #[inline]
            fn span(&self, $i: usize) -> &[u8] {
                $crate::precondition::precondition!(
                    $i < self.end_pos(),
                    "dereferencing past the end of a buffer sequence"
                );
                let $this2 = self;
                $at
            }
        }
    };
}

pub(crate) use indexed;

indexed! {
    impl[] Bytes;
    count: |_b| 1;
    at: |b, _i| b.as_ref();
}

indexed! {
    impl['a] &'a [u8];
    count: |_b| 1;
    at: |b, _i| b;
}

indexed! {
    impl[T: AsRef<[u8]>, const N: usize] [T; N];
    count: |_b| N;
    at: |b, i| b[i].as_ref();
}

indexed! {
    impl[T: AsRef<[u8]>] Vec<T>;
    count: |b| b.len();
    at: |b, i| b[i].as_ref();
}

#[cfg(test)]
mod test;
