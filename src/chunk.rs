//! Chunked transfer coding framing.
//!
//! Every chunk is written as `<size>\r\n<data>\r\n`, the body is terminated with
//! [`LAST_CHUNK`] followed by [`CRLF`].
//!
//! [httpwg](https://httpwg.org/specs/rfc9112.html#chunked.encoding)
use std::fmt;

use crate::buf::indexed;

/// Line delimiter.
pub const CRLF: &[u8] = b"\r\n";

/// The zero sized chunk which terminates a chunked body, without its final CRLF.
pub const LAST_CHUNK: &[u8] = b"0\r\n";

const HEX: &[u8; 16] = b"0123456789abcdef";

/// hex digits of `u64::MAX`, and the CRLF
const MAX_LEN: usize = 16 + 2;

/// The chunk size line, `<hex>\r\n`.
///
/// ```
/// use h1ser::chunk::ChunkSize;
///
/// assert_eq!(ChunkSize::new(0x1a).as_bytes(), b"1a\r\n");
/// ```
#[derive(Clone, Copy)]
pub struct ChunkSize {
    /// right aligned
    buf: [u8; MAX_LEN],
    start: u8,
}

impl ChunkSize {
    /// Render the size line of a chunk with `size` bytes of data.
    pub const fn new(size: u64) -> Self {
        let mut buf = [0u8; MAX_LEN];
        buf[MAX_LEN - 2] = b'\r';
        buf[MAX_LEN - 1] = b'\n';

        let mut start = MAX_LEN - 2;
        let mut size = size;
        loop {
            start -= 1;
            buf[start] = HEX[(size & 0xf) as usize];
            size >>= 4;
            if size == 0 {
                break;
            }
        }

        Self {
            buf,
            start: start as u8,
        }
    }

    /// Returns the rendered line, including the trailing CRLF.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start as usize..]
    }
}

indexed! {
    impl[] ChunkSize;
    count: |_c| 1;
    at: |c, _i| c.as_bytes();
}

impl fmt::Debug for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkSize({:?})", self.as_bytes().escape_ascii().to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chunk_size_line() {
        macro_rules! test {
            ($($size:expr => $line:literal),* $(,)?) => {
                $(assert_eq!(ChunkSize::new($size).as_bytes(), &$line[..]);)*
            };
        }

        test! {
            0 => b"0\r\n",
            1 => b"1\r\n",
            15 => b"f\r\n",
            16 => b"10\r\n",
            0xab => b"ab\r\n",
            4096 => b"1000\r\n",
            u64::MAX => b"ffffffffffffffff\r\n",
        }
    }

    #[test]
    fn last_chunk_terminates() {
        let mut end = LAST_CHUNK.to_vec();
        end.extend_from_slice(CRLF);
        assert_eq!(end, b"0\r\n\r\n");
        assert_eq!(ChunkSize::new(0).as_bytes(), LAST_CHUNK);
    }
}
