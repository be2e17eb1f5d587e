use bytes::Buf;
use std::{fmt, io::IoSlice, iter::FusedIterator};

use super::BufferSequence;
use crate::precondition::precondition;

/// A buffer sequence with a consumed prefix.
///
/// Holds the sequence by value together with the position of the first unconsumed span and
/// the number of bytes already consumed from it. Consuming never touches the underlying
/// bytes.
///
/// This is also a [`Buf`], where [`advance`][Buf::advance] is [`consume`][Consuming::consume].
pub struct Consuming<B: BufferSequence> {
    bufs: B,
    pos: B::Pos,
    /// consumed bytes of the span at `pos`
    skip: usize,
}

impl<B: BufferSequence> Consuming<B> {
    /// Create new [`Consuming`] with nothing consumed yet.
    #[inline]
    pub fn new(bufs: B) -> Self {
        let pos = bufs.first_pos();
        Self { bufs, pos, skip: 0 }
    }

    /// Returns reference to the underlying sequence, including the consumed prefix.
    #[inline]
    pub fn get_ref(&self) -> &B {
        &self.bufs
    }

    /// Returns the number of unconsumed bytes.
    pub fn remaining(&self) -> usize {
        self.spans().map(<[u8]>::len).sum()
    }

    /// Returns `true` if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.spans().next().is_none()
    }

    /// Remove `n` bytes from the front.
    ///
    /// # Panics
    ///
    /// Panics if `n` is larger than [`remaining`][Consuming::remaining].
    pub fn consume(&mut self, mut n: usize) {
        let end = self.bufs.end_pos();
        while n != 0 {
            precondition!(self.pos != end, "consumed {n} bytes past the end of the buffers");
            let available = self.bufs.span(self.pos).len() - self.skip;
            if n < available {
                self.skip += n;
                return;
            }
            n -= available;
            self.skip = 0;
            self.pos = self.bufs.next_pos(self.pos);
        }
    }

    /// Returns an iterator over the unconsumed, non-empty spans.
    #[inline]
    pub fn spans(&self) -> ConsumingSpans<'_, B> {
        ConsumingSpans {
            bufs: &self.bufs,
            pos: self.pos,
            end: self.bufs.end_pos(),
            skip: self.skip,
        }
    }
}

impl<B: BufferSequence> Buf for Consuming<B> {
    fn remaining(&self) -> usize {
        Consuming::remaining(self)
    }

    fn chunk(&self) -> &[u8] {
        self.spans().next().unwrap_or_default()
    }

    fn chunks_vectored<'a>(&'a self, dst: &mut [IoSlice<'a>]) -> usize {
        let mut n = 0;
        for (slot, span) in dst.iter_mut().zip(self.spans()) {
            *slot = IoSlice::new(span);
            n += 1;
        }
        n
    }

    fn advance(&mut self, cnt: usize) {
        self.consume(cnt);
    }
}

impl<B> Clone for Consuming<B>
where
    B: BufferSequence + Clone,
{
    fn clone(&self) -> Self {
        Self {
            bufs: self.bufs.clone(),
            pos: self.pos,
            skip: self.skip,
        }
    }
}

impl<B: BufferSequence> fmt::Debug for Consuming<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consuming")
            .field("pos", &self.pos)
            .field("skip", &self.skip)
            .field("remaining", &self.remaining())
            .finish()
    }
}

// ===== Spans =====

/// An iterator over the unconsumed spans of [`Consuming`].
pub struct ConsumingSpans<'a, B: BufferSequence> {
    bufs: &'a B,
    pos: B::Pos,
    end: B::Pos,
    skip: usize,
}

impl<'a, B: BufferSequence> Iterator for ConsumingSpans<'a, B> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos != self.end {
            let span = &self.bufs.span(self.pos)[self.skip..];
            self.skip = 0;
            self.pos = self.bufs.next_pos(self.pos);
            if !span.is_empty() {
                return Some(span);
            }
        }
        None
    }
}

impl<B: BufferSequence> FusedIterator for ConsumingSpans<'_, B> {}

impl<B: BufferSequence> fmt::Debug for ConsumingSpans<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumingSpans")
            .field("pos", &self.pos)
            .field("skip", &self.skip)
            .finish()
    }
}
