use bytes::BytesMut;

use super::{Framing, HeadError, Request, Response, write_head};
use crate::{
    body::{Chunks, Empty, Full},
    headers::{HeaderValue, standard::{CONTENT_LENGTH, TRANSFER_ENCODING}},
    http::{Method, StatusCode, Version},
};

#[test]
fn test_chunked_flag() {
    macro_rules! test {
        ($($value:literal => $chunked:literal),* $(,)?) => {$(
            let mut res = Response::new(StatusCode::OK, Empty);
            res.headers_mut().insert(TRANSFER_ENCODING, HeaderValue::from_static($value));
            assert_eq!(res.chunked(), $chunked, "{:?}", $value);
        )*};
    }

    test! {
        b"chunked" => true,
        b"Chunked" => true,
        b"gzip, chunked" => true,
        b"gzip,chunked" => true,
        b"chunked, gzip" => false,
        b"gzip" => false,
        b"" => false,
    }

    let mut res = Response::new(StatusCode::OK, Empty);
    assert!(!res.chunked());
    res.headers_mut().append(TRANSFER_ENCODING, HeaderValue::from_static(b"gzip"));
    res.headers_mut().append(TRANSFER_ENCODING, HeaderValue::from_static(b"chunked"));
    assert!(res.chunked());
}

#[test]
fn test_set_framing() {
    let mut res = Response::new(StatusCode::OK, Empty);
    res.set_content_length(Some(10));
    assert_eq!(res.content_length(), Some(10));

    res.set_chunked(true);
    assert!(res.chunked());
    assert_eq!(res.content_length(), None);
    assert!(!res.headers().contains_key(CONTENT_LENGTH));

    res.set_content_length(Some(3));
    assert!(!res.chunked());
    assert!(!res.headers().contains_key(TRANSFER_ENCODING));

    // other codings are kept
    let mut res = Response::new(StatusCode::OK, Empty);
    res.headers_mut().insert(TRANSFER_ENCODING, HeaderValue::from_static(b"gzip"));
    res.set_chunked(true);
    assert_eq!(res.headers().get(TRANSFER_ENCODING).unwrap(), "gzip, chunked");
    res.set_chunked(false);
    assert_eq!(res.headers().get(TRANSFER_ENCODING).unwrap(), "gzip");

    res.set_content_length(None);
    assert_eq!(res.content_length(), None);
}

#[test]
fn test_prepare_payload() {
    let mut res = Response::new(StatusCode::OK, Full::new("Hello"));
    res.prepare_payload();
    assert_eq!(res.content_length(), Some(5));

    let mut res = Response::new(StatusCode::NO_CONTENT, Full::new("Hello"));
    res.set_chunked(true);
    res.prepare_payload();
    assert!(!res.chunked());
    assert_eq!(res.content_length(), None);

    let mut res = Response::new(StatusCode::OK, Chunks::from_iter(["ab", "cde"]));
    res.prepare_payload();
    assert_eq!(res.content_length(), Some(5));

    let mut req = Request::new(Method::GET, "/", Empty);
    req.prepare_payload();
    assert!(req.headers().is_empty());

    let mut req = Request::new(Method::PUT, "/", Empty);
    req.prepare_payload();
    assert_eq!(req.content_length(), Some(0));
}

#[cfg(feature = "tokio")]
#[test]
fn test_prepare_payload_unknown_length() {
    use crate::body::channel;

    let (_tx, body) = channel(1);
    let mut res = Response::new(StatusCode::OK, body);
    res.prepare_payload();
    assert!(res.chunked());

    let (_tx, body) = channel(1);
    let mut res = Response::new(StatusCode::OK, body);
    res.set_version(Version::HTTP_10);
    res.set_content_length(Some(1));
    res.prepare_payload();
    assert!(!res.chunked());
    assert!(res.headers().is_empty());
}

#[test]
fn test_write_head() {
    let mut res = Response::new(StatusCode::NOT_FOUND, Empty);
    res.set_reason("Not Found");
    res.headers_mut().append("Content-Type", HeaderValue::from_static(b"text/plain"));
    res.headers_mut().append("x-trace", HeaderValue::from_static(b"a"));
    res.headers_mut().append("X-Trace", HeaderValue::from_static(b"b"));

    let mut buf = BytesMut::from(&b"prefix"[..]);
    let framing = write_head(&res, &mut buf).unwrap();
    assert_eq!(framing, Framing::Unframed);
    assert_eq!(
        &buf[..],
        b"prefixHTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nx-trace: a\r\nX-Trace: b\r\n\r\n"
    );

    let mut req = Request::new(Method::OPTIONS, "*", Empty);
    req.set_version(Version::HTTP_10);
    req.set_content_length(Some(0));
    let mut buf = BytesMut::new();
    assert_eq!(write_head(&req, &mut buf), Ok(Framing::ContentLength(0)));
    assert_eq!(&buf[..], b"OPTIONS * HTTP/1.0\r\nContent-Length: 0\r\n\r\n");

    // without framing headers a request has no content, a response is close delimited
    let mut req = Request::new(Method::POST, "/", Empty);
    assert_eq!(write_head(&req, &mut BytesMut::new()), Ok(Framing::ContentLength(0)));
    let res = Response::new(StatusCode::OK, Empty);
    assert_eq!(write_head(&res, &mut BytesMut::new()), Ok(Framing::Unframed));

    // statuses without content ignore the framing headers
    let mut res = Response::new(StatusCode::NO_CONTENT, Empty);
    res.set_chunked(true);
    assert_eq!(write_head(&res, &mut BytesMut::new()), Ok(Framing::NoContent));

    // nothing is written on error
    req.set_target("");
    let mut buf = BytesMut::from(&b"keep"[..]);
    assert_eq!(write_head(&req, &mut buf), Err(HeadError::InvalidTarget));
    assert_eq!(&buf[..], b"keep");
}
