use bytes::Bytes;

use super::HeaderError;

const MAX_HEADER_VALUE_LEN: usize = 1 << 13; // 8KB

/// HTTP Header Value.
///
/// This API does not support non-ASCII value.
#[derive(Clone)]
pub struct HeaderValue {
    /// is visible ASCII, SP or HTAB
    bytes: Bytes,
}

impl HeaderValue {
    /// Parse header value from static bytes.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid header value.
    #[inline]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        match validate_header_value(bytes) {
            Ok(()) => Self {
                bytes: Bytes::from_static(bytes),
            },
            Err(err) => err.panic_const(),
        }
    }

    /// Parse header value from [`Bytes`].
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid header value.
    #[inline]
    pub fn from_bytes<B: Into<Bytes>>(value: B) -> Result<Self, HeaderError> {
        let bytes = value.into();
        validate_header_value(&bytes)?;
        Ok(Self { bytes })
    }

    /// Parse header value by copying from slice of bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid header value.
    #[inline]
    pub fn from_slice<A: AsRef<[u8]>>(value: A) -> Result<Self, HeaderError> {
        let value = value.as_ref();
        validate_header_value(value)?;
        Ok(Self {
            bytes: Bytes::copy_from_slice(value),
        })
    }

    /// Create header value from decimal representation of an integer.
    #[inline]
    pub fn from_u64(value: u64) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(itoa::Buffer::new().format(value).as_bytes()),
        }
    }

    /// Returns header value as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns header value as `str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        match std::str::from_utf8(&self.bytes) {
            Ok(ok) => ok,
            Err(_) => unreachable!("header value is ASCII"),
        }
    }
}

const fn validate_header_value(mut bytes: &[u8]) -> Result<(), HeaderError> {
    match bytes {
        // no leading SP / HTAB
        | [b' ' | b'\t', ..]
        // no trailing SP / HTAB
        | [.., b' ' | b'\t'] => return Err(HeaderError::InvalidValue),
        _ => {}
    }
    if bytes.len() > MAX_HEADER_VALUE_LEN {
        return Err(HeaderError::ValueTooLong);
    }
    while let [byte, rest @ ..] = bytes {
        if !matches!(byte, b'\t' | b' '..=b'~') {
            return Err(HeaderError::InvalidValue);
        }
        bytes = rest;
    }
    Ok(())
}

// ===== Traits =====

impl std::fmt::Debug for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HeaderValue").field(&self.as_str()).finish()
    }
}

impl std::str::FromStr for HeaderValue {
    type Err = HeaderError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s)
    }
}

impl PartialEq for HeaderValue {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl PartialEq<str> for HeaderValue {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for HeaderValue {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl From<HeaderValue> for Bytes {
    #[inline]
    fn from(value: HeaderValue) -> Self {
        value.bytes
    }
}
