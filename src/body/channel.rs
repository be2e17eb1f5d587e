use bytes::Bytes;
use std::{cell::Cell, task::Poll};
use tokio::sync::mpsc::{self, error::TryRecvError};

use super::{Body, BodyError, BodyWriter};
use crate::headers::HeaderMap;

/// Create a channel fed body with the given buffer capacity.
///
/// The body ends when every [`BodySender`] is dropped.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn channel(capacity: usize) -> (BodySender, Channel) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        BodySender { tx },
        Channel {
            rx: Cell::new(Some(rx)),
        },
    )
}

/// Sending half of [`channel`].
#[derive(Clone, Debug)]
pub struct BodySender {
    tx: mpsc::Sender<Bytes>,
}

impl BodySender {
    /// Send a chunk, waiting for capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Closed`] if the receiving end is dropped.
    pub async fn send<B: Into<Bytes>>(&self, chunk: B) -> Result<(), BodyError> {
        self.tx.send(chunk.into()).await.map_err(|_| BodyError::Closed)
    }

    /// Send a chunk if there is capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Closed`] if the receiving end is dropped, or the chunk back if
    /// the channel is full.
    pub fn try_send<B: Into<Bytes>>(&self, chunk: B) -> Result<(), Result<Bytes, BodyError>> {
        self.tx.try_send(chunk.into()).map_err(|err| match err {
            mpsc::error::TrySendError::Full(chunk) => Ok(chunk),
            mpsc::error::TrySendError::Closed(_) => Err(BodyError::Closed),
        })
    }

    /// Send a chunk, blocking the current thread for capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Closed`] if the receiving end is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called within an asynchronous execution context.
    pub fn blocking_send<B: Into<Bytes>>(&self, chunk: B) -> Result<(), BodyError> {
        self.tx.blocking_send(chunk.into()).map_err(|_| BodyError::Closed)
    }
}

/// Receiving half of [`channel`], stored as the message body.
///
/// The length is never known in advance, and the receiver can only be taken by one writer.
/// Writers created after the first one report [`BodyError::Closed`].
pub struct Channel {
    rx: Cell<Option<mpsc::Receiver<Bytes>>>,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").finish_non_exhaustive()
    }
}

impl Body for Channel {
    type Writer = ChannelWriter;

    #[inline]
    fn size_hint(&self) -> Option<u64> {
        None
    }

    #[inline]
    fn writer(&self, _: &HeaderMap) -> Self::Writer {
        ChannelWriter {
            rx: self.rx.take(),
            peeked: None,
            closed: false,
        }
    }
}

/// [`BodyWriter`] of [`Channel`].
///
/// Reports `Pending` while the channel is empty, [`ready`][ChannelWriter::ready] waits for
/// the next chunk.
#[derive(Debug)]
pub struct ChannelWriter {
    rx: Option<mpsc::Receiver<Bytes>>,
    peeked: Option<Bytes>,
    closed: bool,
}

impl ChannelWriter {
    /// Wait until a chunk is available or every sender is dropped.
    pub async fn ready(&mut self) {
        if self.peeked.is_some() || self.closed {
            return;
        }
        if let Some(rx) = &mut self.rx {
            match rx.recv().await {
                Some(chunk) => self.peeked = Some(chunk),
                None => self.closed = true,
            }
        }
    }
}

impl BodyWriter for ChannelWriter {
    fn init(&mut self) -> Result<(), BodyError> {
        match self.rx {
            Some(_) => Ok(()),
            None => Err(BodyError::Closed),
        }
    }

    fn get(&mut self) -> Poll<Result<Option<(Bytes, bool)>, BodyError>> {
        if let Some(chunk) = self.peeked.take() {
            return Poll::Ready(Ok(Some((chunk, true))));
        }
        if self.closed {
            return Poll::Ready(Ok(None));
        }
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(Err(BodyError::Closed));
        };
        match rx.try_recv() {
            Ok(chunk) => Poll::Ready(Ok(Some((chunk, true)))),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                Poll::Ready(Ok(None))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_channel_writer() {
        let (tx, body) = channel(4);
        let mut writer = body.writer(&HeaderMap::new());
        assert!(writer.init().is_ok());
        assert!(writer.get().is_pending());

        tx.send("ab").await.unwrap();
        assert!(matches!(writer.get(), Poll::Ready(Ok(Some((c, true)))) if c == "ab"));
        assert!(writer.get().is_pending());

        let task = tokio::spawn(async move {
            tx.send("cde").await.unwrap();
        });
        writer.ready().await;
        assert!(matches!(writer.get(), Poll::Ready(Ok(Some((c, true)))) if c == "cde"));
        task.await.unwrap();

        writer.ready().await;
        assert!(matches!(writer.get(), Poll::Ready(Ok(None))));
    }

    #[test]
    fn test_channel_taken_once() {
        let (_tx, body) = channel(1);
        let _first = body.writer(&HeaderMap::new());
        let mut second = body.writer(&HeaderMap::new());
        assert!(matches!(second.init(), Err(BodyError::Closed)));
        assert_eq!(body.size_hint(), None);
    }
}
