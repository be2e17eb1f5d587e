//! HTTP/1 messages.
//!
//! [`Message`] is generic over its start line, which fixes whether it is a [`Request`] or
//! a [`Response`] at compile time.
use bytes::{Bytes, BytesMut};

use crate::{
    body::Body,
    headers::{HeaderMap, HeaderValue, standard::{CONTENT_LENGTH, TRANSFER_ENCODING}},
    http::{Method, StatusCode, Version},
};

mod head;

pub use head::{Framing, HeadError, write_head};
pub(crate) use head::format;

/// HTTP Request.
pub type Request<B> = Message<RequestLine, B>;

/// HTTP Response.
pub type Response<B> = Message<StatusLine, B>;

/// An HTTP/1 message, the start line, header fields and a body.
#[derive(Debug, Clone, Default)]
pub struct Message<S, B> {
    line: S,
    version: Version,
    headers: HeaderMap,
    body: B,
}

/// The first line of a message.
pub trait StartLine {
    /// Write the start line, without the trailing CRLF.
    ///
    /// # Errors
    ///
    /// Returns error if the line contains bytes that cannot be sent.
    fn write_line(&self, version: Version, dst: &mut BytesMut) -> Result<(), HeadError>;

    /// Returns `true` if the message carries payload framing, given the body size hint.
    fn has_payload(&self, size_hint: Option<u64>) -> bool;

    /// Returns `false` if the message never carries content, whatever its header fields say.
    fn allows_content(&self) -> bool;

    /// Framing of a message with neither `Content-Length` nor `Transfer-Encoding`.
    fn default_framing(&self) -> Framing;
}

/// `method SP request-target SP HTTP-version`
#[derive(Debug, Clone, Default)]
pub struct RequestLine {
    method: Method,
    target: Bytes,
}

/// `HTTP-version SP status-code SP [ reason-phrase ]`
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    status: StatusCode,
    reason: Bytes,
}

impl StartLine for RequestLine {
    fn write_line(&self, version: Version, dst: &mut BytesMut) -> Result<(), HeadError> {
        if self.target.is_empty() || !self.target.iter().all(|&b| matches!(b, b'!'..=b'~')) {
            return Err(HeadError::InvalidTarget);
        }
        dst.extend_from_slice(self.method.as_bytes());
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(&self.target);
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(version.as_str().as_bytes());
        Ok(())
    }

    fn has_payload(&self, size_hint: Option<u64>) -> bool {
        self.method.expects_payload() || size_hint != Some(0)
    }

    #[inline]
    fn allows_content(&self) -> bool {
        true
    }

    /// A request without framing headers has no content, it cannot be delimited by close.
    #[inline]
    fn default_framing(&self) -> Framing {
        Framing::ContentLength(0)
    }
}

impl StartLine for StatusLine {
    fn write_line(&self, version: Version, dst: &mut BytesMut) -> Result<(), HeadError> {
        // HTAB / SP / VCHAR / obs-text
        if !self.reason.iter().all(|&b| matches!(b, b'\t' | b' '..=b'~' | 0x80..=0xff)) {
            return Err(HeadError::InvalidReason);
        }
        dst.extend_from_slice(version.as_str().as_bytes());
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(itoa::Buffer::new().format(self.status.as_u16()).as_bytes());
        dst.extend_from_slice(b" ");
        dst.extend_from_slice(&self.reason);
        Ok(())
    }

    fn has_payload(&self, _: Option<u64>) -> bool {
        self.status.allows_payload()
    }

    #[inline]
    fn allows_content(&self) -> bool {
        self.status.allows_payload()
    }

    #[inline]
    fn default_framing(&self) -> Framing {
        Framing::Unframed
    }
}

impl<B> Request<B> {
    /// Create new HTTP/1.1 request with empty headers.
    pub fn new(method: Method, target: impl Into<Bytes>, body: B) -> Self {
        Self::from_line(
            RequestLine {
                method,
                target: target.into(),
            },
            body,
        )
    }

    /// Returns the request method.
    #[inline]
    pub fn method(&self) -> Method {
        self.line.method
    }

    /// Returns the request target.
    #[inline]
    pub fn target(&self) -> &[u8] {
        &self.line.target
    }

    #[inline]
    pub fn set_method(&mut self, method: Method) {
        self.line.method = method;
    }

    #[inline]
    pub fn set_target(&mut self, target: impl Into<Bytes>) {
        self.line.target = target.into();
    }
}

impl<B> Response<B> {
    /// Create new HTTP/1.1 response with empty headers and empty reason phrase.
    pub fn new(status: StatusCode, body: B) -> Self {
        Self::from_line(
            StatusLine {
                status,
                reason: Bytes::new(),
            },
            body,
        )
    }

    /// Returns the response status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.line.status
    }

    /// Returns the reason phrase.
    #[inline]
    pub fn reason(&self) -> &[u8] {
        &self.line.reason
    }

    #[inline]
    pub fn set_status(&mut self, status: StatusCode) {
        self.line.status = status;
    }

    /// Set the reason phrase, there is no default phrase per status code.
    #[inline]
    pub fn set_reason(&mut self, reason: impl Into<Bytes>) {
        self.line.reason = reason.into();
    }
}

impl<S, B> Message<S, B> {
    /// Create new HTTP/1.1 message with empty headers.
    #[inline]
    pub fn from_line(line: S, body: B) -> Self {
        Self {
            line,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body,
        }
    }

    #[inline]
    pub fn line(&self) -> &S {
        &self.line
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[inline]
    pub fn body(&self) -> &B {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    #[inline]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Returns `true` if the last transfer coding is `chunked`.
    pub fn chunked(&self) -> bool {
        self.codings()
            .next_back()
            .is_some_and(|coding| coding.eq_ignore_ascii_case("chunked"))
    }

    /// Returns the value of `Content-Length`, if present and valid.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|value| head::parse_content_length(value.as_bytes()))
    }

    /// Add or remove `chunked` as the last transfer coding.
    ///
    /// Enabling chunked removes `Content-Length`.
    pub fn set_chunked(&mut self, chunked: bool) {
        if chunked == self.chunked() {
            if chunked {
                self.headers.remove(CONTENT_LENGTH);
            }
            return;
        }

        let mut codings = self
            .codings()
            .filter(|coding| !coding.eq_ignore_ascii_case("chunked"))
            .collect::<Vec<_>>()
            .join(", ");
        self.headers.remove(TRANSFER_ENCODING);

        if chunked {
            self.headers.remove(CONTENT_LENGTH);
            if !codings.is_empty() {
                codings.push_str(", ");
            }
            codings.push_str("chunked");
        }

        if !codings.is_empty() {
            match HeaderValue::from_slice(codings) {
                Ok(value) => self.headers.insert(TRANSFER_ENCODING, value),
                Err(_) => self.headers.insert(TRANSFER_ENCODING, HeaderValue::from_static(b"chunked")),
            };
        }
    }

    /// Set or remove `Content-Length`.
    ///
    /// Setting a length removes the `chunked` transfer coding.
    pub fn set_content_length(&mut self, len: Option<u64>) {
        match len {
            Some(len) => {
                self.set_chunked(false);
                self.headers.insert(CONTENT_LENGTH, HeaderValue::from_u64(len));
            }
            None => {
                self.headers.remove(CONTENT_LENGTH);
            }
        }
    }

    /// Set the payload framing headers from the body size hint.
    ///
    /// - known length, `Content-Length`
    /// - unknown length on HTTP/1.1, `Transfer-Encoding: chunked`
    /// - unknown length on HTTP/1.0, no framing, a response body ends when the connection
    ///   closes, a request cannot send any body
    /// - messages without payload, no framing
    pub fn prepare_payload(&mut self)
    where
        S: StartLine,
        B: Body,
    {
        let size_hint = self.body.size_hint();
        if !self.line.has_payload(size_hint) {
            self.headers.remove(CONTENT_LENGTH);
            self.headers.remove(TRANSFER_ENCODING);
            return;
        }
        match size_hint {
            Some(len) => self.set_content_length(Some(len)),
            None if self.version.supports_chunked() => self.set_chunked(true),
            None => {
                self.headers.remove(CONTENT_LENGTH);
                self.headers.remove(TRANSFER_ENCODING);
            }
        }
    }

    fn codings(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.headers
            .get_all(TRANSFER_ENCODING)
            .flat_map(|value| value.as_str().split(','))
            .map(str::trim)
            .filter(|coding| !coding.is_empty())
    }
}

#[cfg(test)]
mod test;
