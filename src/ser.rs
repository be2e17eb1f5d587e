//! HTTP/1 message serializer.
//!
//! [`Serializer`] is a resumable state machine turning a [`Message`] into groups of output
//! buffers. The caller drives it with two alternating calls:
//!
//! - [`next`][Serializer::next] hands the current group to a visitor
//! - [`consume`][Serializer::consume] retires the bytes actually written
//!
//! Nothing is copied, the groups are views over the formatted header block, static chunk
//! framing, and the chunks yielded by the [`BodyWriter`].
//!
//! ```
//! use h1ser::{body::Full, http::StatusCode, message::Response, ser::{Next, Serializer}};
//!
//! let mut res = Response::new(StatusCode::OK, Full::new("Hello"));
//! res.prepare_payload();
//!
//! let mut ser = Serializer::new(&res);
//! let mut out = Vec::new();
//! while !ser.is_done() {
//!     match ser.next(|bufs| bufs.copy_to_vec()).unwrap() {
//!         Next::Ready(bytes) => {
//!             out.extend_from_slice(&bytes);
//!             ser.consume(bytes.len());
//!         }
//!         Next::Pending => unreachable!(),
//!         Next::Done => break,
//!     }
//! }
//! assert_eq!(out, b"HTTP/1.1 200 \r\nContent-Length: 5\r\n\r\nHello");
//! ```
use bytes::{BufMut, Bytes};
use std::{fmt, io::IoSlice, iter::FusedIterator, task::Poll};

use crate::{
    body::{Body, BodyError, BodyWriter},
    log::{debug, trace, warning},
    message::{self, Framing, HeadError, Message, StartLine},
    precondition::precondition,
};

mod bundle;

use bundle::{Bundle, BundleSpans};

/// Serializer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Emit the header block alone before any body byte.
    pub split: bool,
    /// Maximum bytes handed to the visitor in one [`next`][Serializer::next].
    pub limit: usize,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            split: false,
            limit: usize::MAX,
        }
    }
}

/// Outcome of [`Serializer::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Next<R> {
    /// The visitor was called with the current buffer group.
    Ready(R),
    /// The [`BodyWriter`] has no data yet, try again later.
    Pending,
    /// The message is complete, nothing else to write.
    Done,
}

impl<R> Next<R> {
    /// Maps the ready value.
    #[inline]
    pub fn map<U, F: FnOnce(R) -> U>(self, f: F) -> Next<U> {
        match self {
            Self::Ready(r) => Next::Ready(f(r)),
            Self::Pending => Next::Pending,
            Self::Done => Next::Done,
        }
    }

    /// Returns the ready value.
    #[inline]
    pub fn ready(self) -> Option<R> {
        match self {
            Self::Ready(r) => Some(r),
            Self::Pending | Self::Done => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Construct,
    Plain(Plain),
    Chunked(Chunked),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plain {
    Init,
    Header,
    HeaderOnly,
    Fetch,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunked {
    Init,
    Header,
    HeaderOnly,
    Fetch,
    Body,
    BodyFinal,
    AllInOne,
    /// body exhausted, the last chunk is not sent yet
    Last,
    Final,
}

enum Start {
    HeaderOnly,
    First(Bytes),
}

enum Fetch {
    Chunk(Bytes),
    Pending,
    End,
}

/// HTTP/1 message serializer.
///
/// Borrows the message for its whole lifetime and owns the body writer.
pub struct Serializer<'m, S, B, W> {
    msg: &'m Message<S, B>,
    writer: W,
    config: Config,
    state: State,
    bundle: Bundle,
    /// formatted header block, until the first group is built
    head: Option<Bytes>,
    /// unconsumed header bytes
    head_left: usize,
    /// undelivered `Content-Length` bytes
    length_left: Option<u64>,
    more: bool,
    header_done: bool,
    writer_ready: bool,
}

impl<'m, S, B> Serializer<'m, S, B, B::Writer>
where
    S: StartLine,
    B: Body,
{
    /// Create new [`Serializer`] with the writer of the message body.
    #[inline]
    pub fn new(msg: &'m Message<S, B>) -> Self {
        Self::with_config(msg, Config::default())
    }

    /// Create new [`Serializer`] with the writer of the message body and given config.
    #[inline]
    pub fn with_config(msg: &'m Message<S, B>, config: Config) -> Self {
        let writer = msg.body().writer(msg.headers());
        Self::with_writer_config(msg, writer, config)
    }
}

impl<'m, S, B, W> Serializer<'m, S, B, W>
where
    S: StartLine,
    W: BodyWriter,
{
    /// Create new [`Serializer`] with a custom body writer.
    ///
    /// The message body is not used.
    #[inline]
    pub fn with_writer(msg: &'m Message<S, B>, writer: W) -> Self {
        Self::with_writer_config(msg, writer, Config::default())
    }

    /// Create new [`Serializer`] with a custom body writer and given config.
    pub fn with_writer_config(msg: &'m Message<S, B>, writer: W, config: Config) -> Self {
        precondition!(config.limit != 0, "buffer limit must be non zero");
        Self {
            msg,
            writer,
            config,
            state: State::Construct,
            bundle: Bundle::Empty,
            head: None,
            head_left: 0,
            length_left: None,
            more: false,
            header_done: false,
            writer_ready: false,
        }
    }

    /// Emit the header block alone in the first group.
    ///
    /// Only takes effect before the first [`next`][Serializer::next].
    #[inline]
    pub fn split(&mut self, split: bool) {
        self.config.split = split;
    }

    /// Limit the number of bytes handed to the visitor at once.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    #[inline]
    pub fn limit(&mut self, limit: usize) {
        precondition!(limit != 0, "buffer limit must be non zero");
        self.config.limit = limit;
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn message(&self) -> &'m Message<S, B> {
        self.msg
    }

    #[inline]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Returns `true` if the header block is fully consumed.
    #[inline]
    pub fn is_header_done(&self) -> bool {
        self.header_done
    }

    /// Returns `true` if the whole message is consumed.
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Complete)
    }

    /// Produce the current buffer group and hand it to `visit`.
    ///
    /// Calling `next` again without [`consume`][Serializer::consume] hands out the same
    /// unconsumed bytes, the body writer is not asked again.
    ///
    /// # Errors
    ///
    /// Returns error if the header block cannot be formatted or the body writer fails. The
    /// visitor is not called and the state does not change, the message should be abandoned.
    ///
    /// # Panics
    ///
    /// Panics if the message is already complete.
    pub fn next<F, R>(&mut self, visit: F) -> Result<Next<R>, SerializeError>
    where
        F: FnOnce(Buffers<'_>) -> R,
    {
        Ok(self.prepare()?.map(visit))
    }

    /// Produce the current buffer group and borrow it.
    ///
    /// Same as [`next`][Serializer::next], for callers that need the buffers across an
    /// `.await`.
    ///
    /// # Errors
    ///
    /// Returns error if the header block cannot be formatted or the body writer fails.
    ///
    /// # Panics
    ///
    /// Panics if the message is already complete.
    pub fn prepare(&mut self) -> Result<Next<Buffers<'_>>, SerializeError> {
        loop {
            match self.state {
                State::Construct => self.construct()?,

                State::Plain(Plain::Init) => match self.start()? {
                    Start::HeaderOnly => {
                        self.bundle = Bundle::header_only(self.take_head());
                        self.transition(State::Plain(Plain::HeaderOnly));
                    }
                    Start::First(data) => {
                        self.bundle = Bundle::header(self.take_head(), data);
                        self.transition(State::Plain(Plain::Header));
                    }
                },

                State::Plain(Plain::Fetch) => match self.fetch()? {
                    Fetch::Pending => return Ok(Next::Pending),
                    Fetch::Chunk(data) if data.is_empty() => {
                        if !self.more {
                            self.complete();
                            return Ok(Next::Done);
                        }
                    }
                    Fetch::Chunk(data) => {
                        self.bundle = Bundle::body(data);
                        self.transition(State::Plain(Plain::Body));
                    }
                    Fetch::End => {
                        self.complete();
                        return Ok(Next::Done);
                    }
                },

                State::Chunked(Chunked::Init) => match self.start()? {
                    Start::HeaderOnly => {
                        self.bundle = Bundle::header_only(self.take_head());
                        self.transition(State::Chunked(Chunked::HeaderOnly));
                    }
                    Start::First(data) if self.more => {
                        self.bundle = Bundle::header_chunk(self.take_head(), data);
                        self.transition(State::Chunked(Chunked::Header));
                    }
                    Start::First(data) => {
                        self.bundle = Bundle::all_in_one(self.take_head(), data);
                        self.transition(State::Chunked(Chunked::AllInOne));
                    }
                },

                State::Chunked(Chunked::Fetch) => match self.fetch()? {
                    Fetch::Pending => return Ok(Next::Pending),
                    Fetch::Chunk(data) if data.is_empty() => {
                        if !self.more {
                            self.transition(State::Chunked(Chunked::Last));
                        }
                    }
                    Fetch::Chunk(data) if self.more => {
                        self.bundle = Bundle::chunk(data);
                        self.transition(State::Chunked(Chunked::Body));
                    }
                    Fetch::Chunk(data) => {
                        self.bundle = Bundle::chunk_final(data);
                        self.transition(State::Chunked(Chunked::BodyFinal));
                    }
                    Fetch::End => self.transition(State::Chunked(Chunked::Last)),
                },

                State::Chunked(Chunked::Last) => {
                    self.bundle = Bundle::last();
                    self.transition(State::Chunked(Chunked::Final));
                }

                State::Plain(Plain::Header | Plain::HeaderOnly | Plain::Body)
                | State::Chunked(
                    Chunked::Header
                    | Chunked::HeaderOnly
                    | Chunked::Body
                    | Chunked::BodyFinal
                    | Chunked::AllInOne
                    | Chunked::Final,
                ) => break,

                State::Complete => precondition!("next called on a complete message"),
            }
        }

        Ok(Next::Ready(Buffers {
            bundle: &self.bundle,
            limit: self.config.limit,
        }))
    }

    /// Retire `n` bytes from the front of the group handed out by the last
    /// [`next`][Serializer::next].
    ///
    /// # Panics
    ///
    /// Panics if there is no group handed out, or `n` is larger than its remaining bytes.
    pub fn consume(&mut self, n: usize) {
        let next = match self.state {
            State::Plain(Plain::Header | Plain::HeaderOnly | Plain::Body) => match self.more {
                true => State::Plain(Plain::Fetch),
                false => State::Complete,
            },
            State::Chunked(Chunked::Header | Chunked::HeaderOnly | Chunked::Body) => match self.more {
                true => State::Chunked(Chunked::Fetch),
                false => State::Chunked(Chunked::Last),
            },
            State::Chunked(Chunked::BodyFinal | Chunked::AllInOne | Chunked::Final) => State::Complete,
            State::Complete => precondition!("consume called on a complete message"),
            _ => precondition!("consume called without a buffer group"),
        };

        self.bundle.consume(n);

        if !self.header_done {
            self.head_left -= n.min(self.head_left);
            if self.head_left == 0 {
                self.header_done = true;
                debug!("header block sent");
            }
        }

        if !self.bundle.is_empty() {
            return;
        }

        self.bundle = Bundle::Empty;
        match next {
            State::Complete => self.complete(),
            next => self.transition(next),
        }
    }

    fn construct(&mut self) -> Result<(), SerializeError> {
        let (head, framing) = match message::format(self.msg) {
            Ok(ok) => ok,
            Err(err) => {
                warning!("header block rejected: {err}");
                return Err(err.into());
            }
        };
        self.head_left = head.len();
        self.head = Some(head);
        self.length_left = match framing {
            Framing::ContentLength(len) => Some(len),
            Framing::Chunked | Framing::Unframed | Framing::NoContent => None,
        };
        match framing {
            Framing::Chunked => self.transition(State::Chunked(Chunked::Init)),
            Framing::ContentLength(_) | Framing::Unframed => self.transition(State::Plain(Plain::Init)),
            // the writer is never asked
            Framing::NoContent => {
                self.more = false;
                self.bundle = Bundle::header_only(self.take_head());
                self.transition(State::Plain(Plain::HeaderOnly));
            }
        }
        Ok(())
    }

    /// Initialize the writer and decide the first group.
    fn start(&mut self) -> Result<Start, SerializeError> {
        if !self.writer_ready {
            if let Err(err) = self.writer.init() {
                warning!("body writer init failed: {err}");
                return Err(err.into());
            }
            self.writer_ready = true;
        }

        if self.config.split {
            self.more = true;
            return Ok(Start::HeaderOnly);
        }

        match self.poll_writer()? {
            // no data yet, the body follows after the header
            Poll::Pending => {
                self.more = true;
                Ok(Start::HeaderOnly)
            }
            Poll::Ready(None) => {
                self.more = false;
                Ok(Start::HeaderOnly)
            }
            Poll::Ready(Some((data, more))) => {
                self.more = more;
                match data.is_empty() {
                    true => Ok(Start::HeaderOnly),
                    false => Ok(Start::First(data)),
                }
            }
        }
    }

    fn fetch(&mut self) -> Result<Fetch, SerializeError> {
        match self.poll_writer()? {
            Poll::Pending => Ok(Fetch::Pending),
            Poll::Ready(None) => {
                self.more = false;
                Ok(Fetch::End)
            }
            Poll::Ready(Some((data, more))) => {
                self.more = more;
                Ok(Fetch::Chunk(data))
            }
        }
    }

    /// Pull one chunk, enforcing the declared `Content-Length` in both directions.
    fn poll_writer(&mut self) -> Result<Poll<Option<(Bytes, bool)>>, SerializeError> {
        let chunk = match self.writer.get() {
            Poll::Pending => return Ok(Poll::Pending),
            Poll::Ready(Ok(chunk)) => chunk,
            Poll::Ready(Err(err)) => {
                warning!("body writer failed: {err}");
                return Err(err.into());
            }
        };

        let Some(mut left) = self.length_left else {
            return Ok(Poll::Ready(chunk));
        };

        let last = match &chunk {
            Some((data, more)) => {
                let Some(rest) = left.checked_sub(data.len() as u64) else {
                    warning!("body exceeds content-length by {} bytes", data.len() as u64 - left);
                    return Err(BodyError::LengthExceeded.into());
                };
                left = rest;
                !more
            }
            None => true,
        };

        if last && left != 0 {
            warning!("body ended {left} bytes short of content-length");
            return Err(BodyError::Incomplete.into());
        }

        self.length_left = Some(left);
        Ok(Poll::Ready(chunk))
    }

    fn take_head(&mut self) -> Bytes {
        self.head.take().unwrap_or_default()
    }

    fn transition(&mut self, state: State) {
        trace!("{:?} -> {:?}, {:?}", self.state, state, self.bundle);
        self.state = state;
    }

    fn complete(&mut self) {
        self.transition(State::Complete);
        debug!("message complete");
    }
}

impl<S, B, W> fmt::Debug for Serializer<'_, S, B, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("state", &self.state)
            .field("bundle", &self.bundle)
            .field("more", &self.more)
            .field("header_done", &self.header_done)
            .finish()
    }
}

// ===== Buffers =====

/// The buffer group handed to the visitor of [`Serializer::next`].
///
/// A prefix of at most [`Config::limit`] bytes of the unconsumed group.
#[derive(Clone, Copy)]
pub struct Buffers<'a> {
    bundle: &'a Bundle,
    limit: usize,
}

impl<'a> Buffers<'a> {
    /// Returns the number of bytes in the group.
    #[inline]
    pub fn len(&self) -> usize {
        self.bundle.remaining().min(self.limit)
    }

    /// Returns `true` if the group is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the non-empty spans of the group.
    #[inline]
    pub fn spans(&self) -> BufferSpans<'a> {
        BufferSpans {
            inner: self.bundle.spans(),
            left: self.limit,
        }
    }

    /// Fill `dst` with the spans of the group, returns the number of slices written.
    pub fn chunks_vectored(&self, dst: &mut [IoSlice<'a>]) -> usize {
        let mut n = 0;
        for (slot, span) in dst.iter_mut().zip(self.spans()) {
            *slot = IoSlice::new(span);
            n += 1;
        }
        n
    }

    /// Copy the group into `dst`.
    pub fn copy_to<M: BufMut>(&self, dst: &mut M) {
        for span in self.spans() {
            dst.put_slice(span);
        }
    }

    /// Copy the group into a new [`Vec`].
    pub fn copy_to_vec(&self) -> Vec<u8> {
        let mut vec = Vec::with_capacity(self.len());
        self.copy_to(&mut vec);
        vec
    }
}

impl fmt::Debug for Buffers<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.spans().map(|span| span.escape_ascii().to_string()))
            .finish()
    }
}

/// Iterator returned from [`Buffers::spans`].
pub struct BufferSpans<'a> {
    inner: BundleSpans<'a>,
    left: usize,
}

impl<'a> Iterator for BufferSpans<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.left == 0 {
            return None;
        }
        let span = self.inner.next()?;
        let span = &span[..span.len().min(self.left)];
        self.left -= span.len();
        Some(span)
    }
}

impl FusedIterator for BufferSpans<'_> {}

impl fmt::Debug for BufferSpans<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferSpans").field("left", &self.left).finish_non_exhaustive()
    }
}

// ===== Error =====

/// An error when serializing a message.
#[derive(Debug)]
pub enum SerializeError {
    /// The header block cannot be formatted.
    Head(HeadError),
    /// The body writer failed.
    Body(BodyError),
}

impl From<HeadError> for SerializeError {
    #[inline]
    fn from(v: HeadError) -> Self {
        Self::Head(v)
    }
}

impl From<BodyError> for SerializeError {
    #[inline]
    fn from(v: BodyError) -> Self {
        Self::Body(v)
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Head(err) => Some(err),
            Self::Body(err) => Some(err),
        }
    }
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head(err) => write!(f, "invalid header: {err}"),
            Self::Body(err) => write!(f, "body error: {err}"),
        }
    }
}
