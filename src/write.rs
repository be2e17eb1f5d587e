//! Drive a [`Serializer`] into a byte sink.
//!
//! Blocking drivers work on [`std::io::Write`], the async ones on
//! [`tokio::io::AsyncWrite`] with the `tokio` feature.
//!
//! A body writer with no data yet surfaces as [`io::ErrorKind::WouldBlock`], the
//! serializer is left as is and the call can be repeated once data is available.
use std::io::{self, IoSlice};

use crate::{
    body::{BodyError, BodyWriter},
    log::trace,
    message::StartLine,
    ser::{Buffers, Next, SerializeError, Serializer},
};

/// upper bound of spans in one buffer group
const MAX_SLICES: usize = 8;

/// Write the current buffer group with a single vectored write.
///
/// Returns the number of bytes written, `0` if the message is complete.
///
/// # Errors
///
/// Returns error if serialization fails, mapped to [`io::ErrorKind::InvalidData`] unless it
/// is an IO error of the body source, or if writing to `io` fails.
pub fn write_some<S, B, W, IO>(ser: &mut Serializer<'_, S, B, W>, io: &mut IO) -> io::Result<usize>
where
    S: StartLine,
    W: BodyWriter,
    IO: io::Write + ?Sized,
{
    let written = match ser.prepare().map_err(into_io)? {
        Next::Ready(bufs) => {
            let mut slots = [IoSlice::new(&[]); MAX_SLICES];
            let n = bufs.chunks_vectored(&mut slots);
            let written = io.write_vectored(&slots[..n])?;
            check_written(&bufs, written)?
        }
        Next::Pending => return Err(io::ErrorKind::WouldBlock.into()),
        Next::Done => return Ok(0),
    };
    ser.consume(written);
    Ok(written)
}

/// Write the header block only.
///
/// Split mode is enabled, so the header block is written without any body byte, unless
/// [`next`][Serializer::next] was already called.
///
/// # Errors
///
/// Same as [`write_some`].
pub fn write_header<S, B, W, IO>(ser: &mut Serializer<'_, S, B, W>, io: &mut IO) -> io::Result<()>
where
    S: StartLine,
    W: BodyWriter,
    IO: io::Write + ?Sized,
{
    ser.split(true);
    while !ser.is_header_done() {
        write_some(ser, io)?;
    }
    Ok(())
}

/// Write the whole message.
///
/// # Errors
///
/// Same as [`write_some`].
pub fn write<S, B, W, IO>(ser: &mut Serializer<'_, S, B, W>, io: &mut IO) -> io::Result<()>
where
    S: StartLine,
    W: BodyWriter,
    IO: io::Write + ?Sized,
{
    while !ser.is_done() {
        write_some(ser, io)?;
    }
    trace!("message written");
    Ok(())
}

/// Async version of [`write_some`].
///
/// # Errors
///
/// Same as [`write_some`].
#[cfg(feature = "tokio")]
pub async fn write_some_async<S, B, W, IO>(
    ser: &mut Serializer<'_, S, B, W>,
    io: &mut IO,
) -> io::Result<usize>
where
    S: StartLine,
    W: BodyWriter,
    IO: tokio::io::AsyncWrite + Unpin + ?Sized,
{
    use tokio::io::AsyncWriteExt;

    let written = match ser.prepare().map_err(into_io)? {
        Next::Ready(bufs) => {
            let mut slots = [IoSlice::new(&[]); MAX_SLICES];
            let n = bufs.chunks_vectored(&mut slots);
            let written = io.write_vectored(&slots[..n]).await?;
            check_written(&bufs, written)?
        }
        Next::Pending => return Err(io::ErrorKind::WouldBlock.into()),
        Next::Done => return Ok(0),
    };
    ser.consume(written);
    Ok(written)
}

/// Async version of [`write`].
///
/// # Errors
///
/// Same as [`write_some`].
#[cfg(feature = "tokio")]
pub async fn write_async<S, B, W, IO>(ser: &mut Serializer<'_, S, B, W>, io: &mut IO) -> io::Result<()>
where
    S: StartLine,
    W: BodyWriter,
    IO: tokio::io::AsyncWrite + Unpin + ?Sized,
{
    while !ser.is_done() {
        write_some_async(ser, io).await?;
    }
    trace!("message written");
    Ok(())
}

fn check_written(bufs: &Buffers<'_>, written: usize) -> io::Result<usize> {
    if written == 0 && !bufs.is_empty() {
        return Err(io::ErrorKind::WriteZero.into());
    }
    Ok(written)
}

fn into_io(err: SerializeError) -> io::Error {
    match err {
        SerializeError::Body(BodyError::Io(err)) => err,
        err => io::Error::new(io::ErrorKind::InvalidData, err),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        body::{Chunks, Full},
        http::StatusCode,
        message::Response,
    };

    /// Accepts at most `max` bytes per write.
    struct Trickle {
        out: Vec<u8>,
        max: usize,
    }

    impl io::Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.max);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write() {
        let mut res = Response::new(StatusCode::OK, Chunks::from_iter(["ab", "cde"]));
        res.set_chunked(true);

        let mut io = Trickle { out: Vec::new(), max: 3 };
        let mut ser = Serializer::new(&res);
        write(&mut ser, &mut io).unwrap();
        assert!(ser.is_done());
        assert_eq!(
            io.out,
            b"HTTP/1.1 200 \r\nTransfer-Encoding: chunked\r\n\r\n2\r\nab\r\n3\r\ncde\r\n0\r\n\r\n"
        );
    }

    #[test]
    fn test_write_header() {
        let mut res = Response::new(StatusCode::OK, Full::new("Hello"));
        res.prepare_payload();

        let mut io = Vec::new();
        let mut ser = Serializer::new(&res);
        write_header(&mut ser, &mut io).unwrap();
        assert_eq!(io, b"HTTP/1.1 200 \r\nContent-Length: 5\r\n\r\n");
        assert!(ser.is_header_done());
        assert!(!ser.is_done());

        write(&mut ser, &mut io).unwrap();
        assert!(io.ends_with(b"\r\n\r\nHello"));
    }

    #[test]
    fn test_write_zero() {
        let res = Response::new(StatusCode::OK, Full::new("Hello"));
        let mut io = Trickle { out: Vec::new(), max: 0 };
        let mut ser = Serializer::new(&res);
        let err = write(&mut ser, &mut io).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_write_invalid() {
        let mut res = Response::new(StatusCode::OK, Full::new("Hello"));
        res.set_reason("a\nb");
        let mut ser = Serializer::new(&res);
        let err = write(&mut ser, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_write_async() {
        let (tx, body) = crate::body::channel(2);
        let mut res = Response::new(StatusCode::OK, body);
        res.prepare_payload();

        tx.send("ab").await.unwrap();
        tx.send("cde").await.unwrap();
        drop(tx);

        let mut io = Vec::new();
        let mut ser = Serializer::new(&res);
        write_async(&mut ser, &mut io).await.unwrap();
        assert_eq!(
            io,
            b"HTTP/1.1 200 \r\nTransfer-Encoding: chunked\r\n\r\n2\r\nab\r\n3\r\ncde\r\n0\r\n\r\n"
        );
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_write_async_pending() {
        let (tx, body) = crate::body::channel(1);
        let mut res = Response::new(StatusCode::OK, body);
        res.prepare_payload();

        let mut io = Vec::new();
        let mut ser = Serializer::new(&res);

        // header goes out while the body is pending
        write_some_async(&mut ser, &mut io).await.unwrap();
        assert!(ser.is_header_done());
        let err = write_some_async(&mut ser, &mut io).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        tokio::spawn(async move {
            tx.send("ab").await.unwrap();
        });
        loop {
            match write_async(&mut ser, &mut io).await {
                Ok(()) => break,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => ser.writer_mut().ready().await,
                Err(err) => panic!("{err}"),
            }
        }
        assert!(io.ends_with(b"\r\n\r\n2\r\nab\r\n0\r\n\r\n"));
    }
}
