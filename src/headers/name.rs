use bytes::Bytes;

use super::HeaderError;

const MAX_HEADER_NAME_LEN: usize = 1 << 8;

/// HTTP Header name.
///
/// The name is written exactly as given, no case normalization is performed. Equality is
/// ASCII case-insensitive.
#[derive(Clone)]
pub struct HeaderName {
    /// is valid `token`
    bytes: Bytes,
}

impl HeaderName {
    /// Parse header name from static bytes.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid header name.
    #[inline]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        match validate_header_name(bytes) {
            Ok(()) => Self {
                bytes: Bytes::from_static(bytes),
            },
            Err(err) => err.panic_const(),
        }
    }

    /// Parse header name from [`Bytes`].
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid header name.
    #[inline]
    pub fn from_bytes<B: Into<Bytes>>(name: B) -> Result<Self, HeaderError> {
        let bytes = name.into();
        validate_header_name(&bytes)?;
        Ok(Self { bytes })
    }

    /// Parse header name by copying from slice of bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid header name.
    #[inline]
    pub fn from_slice<A: AsRef<[u8]>>(name: A) -> Result<Self, HeaderError> {
        let name = name.as_ref();
        validate_header_name(name)?;
        Ok(Self {
            bytes: Bytes::copy_from_slice(name),
        })
    }

    /// Returns header name as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Extracts a string slice of the header name.
    #[inline]
    pub fn as_str(&self) -> &str {
        // `bytes` is valid ASCII
        match std::str::from_utf8(&self.bytes) {
            Ok(ok) => ok,
            Err(_) => unreachable!("header name is ASCII"),
        }
    }

    /// Checks that two header name are an ASCII case-insensitive match.
    #[inline]
    pub fn eq_ignore_ascii_case(&self, name: &str) -> bool {
        self.bytes.eq_ignore_ascii_case(name.as_bytes())
    }
}

const fn validate_header_name(mut bytes: &[u8]) -> Result<(), HeaderError> {
    match bytes.len() {
        0 => return Err(HeaderError::EmptyName),
        len if len > MAX_HEADER_NAME_LEN => return Err(HeaderError::NameTooLong),
        _ => {}
    }
    while let [byte, rest @ ..] = bytes {
        if !is_token(*byte) {
            return Err(HeaderError::InvalidName);
        }
        bytes = rest;
    }
    Ok(())
}

/// ```not_rust
/// token   = 1*tchar
/// tchar   = "!" / "#" / "$" / "%" / "&" / "'" / "*"
///         / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
///         / DIGIT / ALPHA
/// ```
pub(crate) const fn is_token(byte: u8) -> bool {
    matches!(
        byte,
        | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
        | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z'
    )
}

// ===== Lookup Traits =====

/// A type that can be used to look up a header.
pub trait AsHeaderName {
    /// Returns the name to look up.
    fn as_header_str(&self) -> &str;
}

impl AsHeaderName for str {
    #[inline]
    fn as_header_str(&self) -> &str {
        self
    }
}

impl AsHeaderName for HeaderName {
    #[inline]
    fn as_header_str(&self) -> &str {
        self.as_str()
    }
}

impl<K: AsHeaderName + ?Sized> AsHeaderName for &K {
    #[inline]
    fn as_header_str(&self) -> &str {
        K::as_header_str(self)
    }
}

/// A type that can be converted into [`HeaderName`] for insertion.
///
/// # Panics
///
/// Inserting with a static str panics if it is not a valid header name.
pub trait IntoHeaderName {
    /// Convert into [`HeaderName`].
    fn into_header_name(self) -> HeaderName;
}

impl IntoHeaderName for HeaderName {
    #[inline]
    fn into_header_name(self) -> HeaderName {
        self
    }
}

impl IntoHeaderName for &HeaderName {
    #[inline]
    fn into_header_name(self) -> HeaderName {
        self.clone()
    }
}

impl IntoHeaderName for &'static str {
    #[inline]
    fn into_header_name(self) -> HeaderName {
        HeaderName::from_static(self.as_bytes())
    }
}

// ===== Traits =====

impl std::fmt::Debug for HeaderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for HeaderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for HeaderName {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bytes.eq_ignore_ascii_case(&other.bytes)
    }
}

impl Eq for HeaderName {}

impl PartialEq<str> for HeaderName {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for HeaderName {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl std::str::FromStr for HeaderName {
    type Err = HeaderError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s)
    }
}

// ===== Standard =====

/// Header names with framing semantics, plus a few common ones.
pub mod standard {
    use super::HeaderName;

    macro_rules! standard {
        ($($(#[$doc:meta])* $id:ident = $name:literal;)*) => {
            $(
                $(#[$doc])*
                pub const $id: HeaderName = HeaderName::from_static($name);
            )*
        };
    }

    standard! {
        /// `Content-Length`
        CONTENT_LENGTH = b"Content-Length";
        /// `Transfer-Encoding`
        TRANSFER_ENCODING = b"Transfer-Encoding";
        /// `Content-Type`
        CONTENT_TYPE = b"Content-Type";
        /// `Connection`
        CONNECTION = b"Connection";
        /// `Host`
        HOST = b"Host";
        /// `Server`
        SERVER = b"Server";
        /// `User-Agent`
        USER_AGENT = b"User-Agent";
    }
}
