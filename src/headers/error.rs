/// An error when constructing [`HeaderName`] or [`HeaderValue`].
///
/// [`HeaderName`]: super::HeaderName
/// [`HeaderValue`]: super::HeaderValue
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderError {
    /// Header name is empty.
    EmptyName,
    /// Header name is longer than 256 bytes.
    NameTooLong,
    /// Header name contains a byte that is not a `tchar`.
    InvalidName,
    /// Header value is longer than 8KB.
    ValueTooLong,
    /// Header value contains a control character, or leading or trailing whitespace.
    InvalidValue,
}

impl HeaderError {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "header name cannot be empty",
            Self::NameTooLong => "header name too long",
            Self::InvalidName => "header name contains invalid byte",
            Self::ValueTooLong => "header value too long",
            Self::InvalidValue => "header value contains invalid byte",
        }
    }

    pub(crate) const fn panic_const(self) -> ! {
        panic!("{}", self.message())
    }
}

impl std::error::Error for HeaderError {}

impl std::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
