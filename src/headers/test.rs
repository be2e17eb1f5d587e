use super::{HeaderError, HeaderMap, HeaderName, HeaderValue, standard::*};

#[test]
fn test_header_name() {
    assert_eq!(HeaderName::from_slice("Content-Type").unwrap().as_str(), "Content-Type");
    assert_eq!(HeaderName::from_slice("").unwrap_err(), HeaderError::EmptyName);
    assert_eq!(HeaderName::from_slice("Content Type").unwrap_err(), HeaderError::InvalidName);
    assert_eq!(HeaderName::from_slice("X:").unwrap_err(), HeaderError::InvalidName);
    assert_eq!(HeaderName::from_slice([b'a'; 257]).unwrap_err(), HeaderError::NameTooLong);
    assert_eq!(CONTENT_LENGTH, "content-length");
    assert_eq!(CONTENT_LENGTH.as_str(), "Content-Length");
}

#[test]
fn test_header_value() {
    assert_eq!(HeaderValue::from_slice("text/html; charset=utf-8").unwrap(), "text/html; charset=utf-8");
    assert_eq!(HeaderValue::from_slice("").unwrap(), "");
    assert_eq!(HeaderValue::from_slice(" a").unwrap_err(), HeaderError::InvalidValue);
    assert_eq!(HeaderValue::from_slice("a\t").unwrap_err(), HeaderError::InvalidValue);
    assert_eq!(HeaderValue::from_slice("a\r\nb").unwrap_err(), HeaderError::InvalidValue);
    assert_eq!(HeaderValue::from_u64(1024), "1024");
}

#[test]
#[should_panic]
fn test_header_name_static_panics() {
    let _ = HeaderName::from_static(b"bad name");
}

#[test]
fn test_header_map() {
    let mut map = HeaderMap::new();
    map.append("Accept", HeaderValue::from_static(b"text/html"));
    map.append(HOST, HeaderValue::from_static(b"example.com"));
    map.append("accept", HeaderValue::from_static(b"*/*"));

    assert_eq!(map.len(), 3);
    assert_eq!(map.get("ACCEPT").unwrap(), "text/html");
    assert_eq!(map.get_last("Accept").unwrap(), "*/*");
    assert_eq!(map.get_all("accept").collect::<Vec<_>>(), ["text/html", "*/*"]);
    assert!(map.contains_key(&HOST));

    // insert replaces every duplicate, keeping the first position
    let old = map.insert("Accept", HeaderValue::from_static(b"application/json"));
    assert_eq!(old.unwrap(), "text/html");
    assert_eq!(map.len(), 2);
    let names: Vec<_> = map.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["Accept", "Host"]);

    assert_eq!(map.remove("host").unwrap(), "example.com");
    assert!(map.remove("host").is_none());
    assert_eq!(map.len(), 1);
}
