use std::{fmt, iter::FusedIterator, ptr};

use super::BufferSequence;
use crate::precondition::precondition;

/// A fixed tuple of buffer sequences, addressed by position in the tuple.
///
/// Implemented for tuples of 2 up to 8 [`BufferSequence`]s whose positions are element
/// indices.
pub trait Sequences {
    /// Number of sequences in the tuple.
    const LEN: usize;

    /// Number of elements in sequence `seq`.
    fn count(&self, seq: usize) -> usize;

    /// Element `index` of sequence `seq`.
    fn span(&self, seq: usize, index: usize) -> &[u8];
}

macro_rules! sequences {
    ($len:literal => $($idx:tt $t:ident),+) => {
        impl<$($t),+> Sequences for ($($t,)+)
        where
            $($t: BufferSequence<Pos = usize>,)+
        {
            const LEN: usize = $len;

            #[inline]
            fn count(&self, seq: usize) -> usize {
                match seq {
                    $($idx => self.$idx.end_pos(),)+
                    _ => unreachable!("sequence index out of range"),
                }
            }

            #[inline]
            fn span(&self, seq: usize, index: usize) -> &[u8] {
                match seq {
                    $($idx => self.$idx.span(index),)+
                    _ => unreachable!("sequence index out of range"),
                }
            }
        }
    };
}

sequences!(2 => 0 A, 1 B);
sequences!(3 => 0 A, 1 B, 2 C);
sequences!(4 => 0 A, 1 B, 2 C, 3 D);
sequences!(5 => 0 A, 1 B, 2 C, 3 D, 4 E);
sequences!(6 => 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
sequences!(7 => 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
sequences!(8 => 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);

// ===== Cat =====

/// Concatenation of a fixed tuple of buffer sequences.
///
/// Presents every sequence of the tuple, in order, as one sequence of byte spans. Empty spans
/// and whole empty sequences are never yielded, in either direction.
///
/// ```
/// use h1ser::buf::Cat;
///
/// let cat = Cat::new((&b"GET "[..], [&b""[..], &b"/ HTTP/1.1"[..]], &b"\r\n"[..]));
/// let spans: Vec<&[u8]> = cat.spans().collect();
/// assert_eq!(spans, [&b"GET "[..], &b"/ HTTP/1.1"[..], &b"\r\n"[..]]);
/// ```
#[derive(Clone, Default)]
pub struct Cat<T> {
    seqs: T,
}

/// Position inside a [`Cat`].
///
/// The default value is the position of a default constructed [`Iter`], which cannot be
/// dereferenced nor moved.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct CatPos(Repr);

#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum Repr {
    #[default]
    Unset,
    At {
        seq: usize,
        index: usize,
    },
    End,
}

impl<T: Sequences> Cat<T> {
    /// Create new concatenation over given sequences.
    #[inline]
    pub const fn new(seqs: T) -> Self {
        Self { seqs }
    }

    /// Returns reference to the underlying sequences.
    #[inline]
    pub const fn get_ref(&self) -> &T {
        &self.seqs
    }

    /// Consumes self into the underlying sequences.
    #[inline]
    pub fn into_inner(self) -> T {
        self.seqs
    }

    /// Returns iterator pointing to the first non-empty span.
    ///
    /// Equals [`end`] if every span is empty.
    ///
    /// [`end`]: Cat::end
    #[inline]
    pub fn begin(&self) -> Iter<'_, T> {
        Iter {
            cat: Some(self),
            pos: self.first(),
        }
    }

    /// Returns iterator pointing one past the last span.
    #[inline]
    pub fn end(&self) -> Iter<'_, T> {
        Iter {
            cat: Some(self),
            pos: CatPos(Repr::End),
        }
    }

    /// Returns an iterator over every non-empty span.
    #[inline]
    pub fn spans(&self) -> Spans<'_, T> {
        Spans {
            cat: self,
            front: self.first(),
            back: CatPos(Repr::End),
        }
    }

    fn first(&self) -> CatPos {
        self.seek_forward(0, 0)
    }

    /// Find the first non-empty span at or after `index` of `seq`.
    fn seek_forward(&self, mut seq: usize, mut index: usize) -> CatPos {
        loop {
            let count = self.seqs.count(seq);
            while index < count {
                if !self.seqs.span(seq, index).is_empty() {
                    return CatPos(Repr::At { seq, index });
                }
                index += 1;
            }
            seq += 1;
            if seq == T::LEN {
                return CatPos(Repr::End);
            }
            index = 0;
        }
    }

    /// Find the last non-empty span strictly before `index` of `seq`.
    fn seek_backward(&self, mut seq: usize, mut index: usize) -> CatPos {
        loop {
            while index != 0 {
                index -= 1;
                if !self.seqs.span(seq, index).is_empty() {
                    return CatPos(Repr::At { seq, index });
                }
            }
            precondition!(seq != 0, "decrementing past the first span");
            seq -= 1;
            index = self.seqs.count(seq);
        }
    }

    fn step(&self, pos: CatPos) -> CatPos {
        match pos.0 {
            Repr::Unset => precondition!("incrementing a default constructed iterator"),
            Repr::End => precondition!("incrementing a one-past-end iterator"),
            Repr::At { seq, index } => self.seek_forward(seq, index + 1),
        }
    }

    fn step_back(&self, pos: CatPos) -> CatPos {
        match pos.0 {
            Repr::Unset => precondition!("decrementing a default constructed iterator"),
            Repr::End => self.seek_backward(T::LEN - 1, self.seqs.count(T::LEN - 1)),
            Repr::At { seq, index } => self.seek_backward(seq, index),
        }
    }

    fn span_at(&self, pos: CatPos) -> &[u8] {
        match pos.0 {
            Repr::Unset => precondition!("dereferencing a default constructed iterator"),
            Repr::End => precondition!("dereferencing a one-past-end iterator"),
            Repr::At { seq, index } => self.seqs.span(seq, index),
        }
    }
}

impl<T: Sequences> BufferSequence for Cat<T> {
    type Pos = CatPos;

    #[inline]
    fn first_pos(&self) -> CatPos {
        self.first()
    }

    #[inline]
    fn end_pos(&self) -> CatPos {
        CatPos(Repr::End)
    }

    #[inline]
    fn next_pos(&self, pos: CatPos) -> CatPos {
        self.step(pos)
    }

    #[inline]
    fn prev_pos(&self, pos: CatPos) -> CatPos {
        self.step_back(pos)
    }

    #[inline]
    fn span(&self, pos: CatPos) -> &[u8] {
        self.span_at(pos)
    }
}

impl<T: Sequences> fmt::Debug for Cat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cat")
            .field("sequences", &T::LEN)
            .field("len", &self.byte_len())
            .finish()
    }
}

impl fmt::Debug for CatPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Unset => f.write_str("Unset"),
            Repr::At { seq, index } => write!(f, "At({seq}, {index})"),
            Repr::End => f.write_str("End"),
        }
    }
}

// ===== Iter =====

/// Bidirectional iterator over the spans of a [`Cat`].
///
/// Unlike [`Spans`], this is a cursor: it points at one span, which is read with
/// [`get`][Iter::get], and is moved with [`move_next`][Iter::move_next] and
/// [`move_prev`][Iter::move_prev]. Two iterators are equal if they point into the same
/// [`Cat`] at the same position.
///
/// # Panics
///
/// Reading or moving a default constructed iterator, reading or incrementing a one-past-end
/// iterator, and decrementing before the first span all panic.
pub struct Iter<'a, T> {
    cat: Option<&'a Cat<T>>,
    pos: CatPos,
}

impl<'a, T: Sequences> Iter<'a, T> {
    /// Returns the span this iterator points at.
    pub fn get(&self) -> &'a [u8] {
        match self.cat {
            Some(cat) => cat.span_at(self.pos),
            None => precondition!("dereferencing a default constructed iterator"),
        }
    }

    /// Advance to the next non-empty span.
    pub fn move_next(&mut self) {
        match self.cat {
            Some(cat) => self.pos = cat.step(self.pos),
            None => precondition!("incrementing a default constructed iterator"),
        }
    }

    /// Retreat to the previous non-empty span.
    pub fn move_prev(&mut self) {
        match self.cat {
            Some(cat) => self.pos = cat.step_back(self.pos),
            None => precondition!("decrementing a default constructed iterator"),
        }
    }

    /// Returns `true` if this iterator points one past the last span.
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self.pos.0, Repr::End)
    }

    /// Returns the position of this iterator.
    #[inline]
    pub fn pos(&self) -> CatPos {
        self.pos
    }
}

impl<T> Default for Iter<'_, T> {
    #[inline]
    fn default() -> Self {
        Self {
            cat: None,
            pos: CatPos::default(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Iter<'_, T> {}

impl<T> PartialEq for Iter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        let same_cat = match (self.cat, other.cat) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_cat && self.pos == other.pos
    }
}

impl<T> Eq for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.pos).finish()
    }
}

// ===== Spans =====

/// An iterator over the non-empty spans of a [`Cat`].
///
/// Created by [`Cat::spans`].
pub struct Spans<'a, T> {
    cat: &'a Cat<T>,
    front: CatPos,
    back: CatPos,
}

impl<'a, T: Sequences> Iterator for Spans<'a, T> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let span = self.cat.span_at(self.front);
        self.front = self.cat.step(self.front);
        Some(span)
    }
}

impl<T: Sequences> DoubleEndedIterator for Spans<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = self.cat.step_back(self.back);
        Some(self.cat.span_at(self.back))
    }
}

impl<T: Sequences> FusedIterator for Spans<'_, T> {}

impl<T> Clone for Spans<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            cat: self.cat,
            front: self.front,
            back: self.back,
        }
    }
}

impl<T> fmt::Debug for Spans<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spans")
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}
