use std::{iter::FusedIterator, slice};

use super::{AsHeaderName, HeaderName, HeaderValue, IntoHeaderName};

/// Ordered collection of header fields.
///
/// Fields keep their insertion order, duplicate names are allowed. Lookup is ASCII
/// case-insensitive.
#[derive(Clone, Default)]
pub struct HeaderMap {
    fields: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderMap {
    /// Create new empty [`HeaderMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Create new empty [`HeaderMap`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of fields, counting every duplicate.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the map contains a field with given name.
    #[inline]
    pub fn contains_key<K: AsHeaderName>(&self, name: K) -> bool {
        self.get(name).is_some()
    }

    /// Returns the first value of given header name.
    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        let name = name.as_header_str();
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Returns the last value of given header name.
    pub fn get_last<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        let name = name.as_header_str();
        self.fields
            .iter()
            .rfind(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Returns an iterator over every value of given header name, in order.
    #[inline]
    pub fn get_all<K: AsHeaderName>(&self, name: K) -> GetAll<'_, K> {
        GetAll {
            name,
            iter: self.fields.iter(),
        }
    }

    /// Returns an iterator over every field, in order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            iter: self.fields.iter(),
        }
    }

    /// Insert a header field, replacing every existing field with the same name.
    ///
    /// The new field takes the place of the first replaced one. Returns the first replaced
    /// value, if any.
    ///
    /// # Panics
    ///
    /// Panics if `name` is a static str that is not a valid header name.
    pub fn insert<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) -> Option<HeaderValue> {
        let name = name.into_header_name();
        let Some(at) = self.position(name.as_str()) else {
            self.fields.push((name, value));
            return None;
        };
        let old = std::mem::replace(&mut self.fields[at], (name, value)).1;
        let mut i = at + 1;
        while i < self.fields.len() {
            if self.fields[i].0 == self.fields[at].0 {
                self.fields.remove(i);
            } else {
                i += 1;
            }
        }
        Some(old)
    }

    /// Append a header field, keeping existing fields with the same name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is a static str that is not a valid header name.
    #[inline]
    pub fn append<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.fields.push((name.into_header_name(), value));
    }

    /// Remove every field with given name, returning the first removed value.
    pub fn remove<K: AsHeaderName>(&mut self, name: K) -> Option<HeaderValue> {
        let name = name.as_header_str();
        let mut first = None;
        let mut i = 0;
        while i < self.fields.len() {
            if self.fields[i].0.eq_ignore_ascii_case(name) {
                let (_, value) = self.fields.remove(i);
                first.get_or_insert(value);
            } else {
                i += 1;
            }
        }
        first
    }

    /// Remove every field.
    #[inline]
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: IntoHeaderName> FromIterator<(K, HeaderValue)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, HeaderValue)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        map.extend(iter);
        map
    }
}

impl<K: IntoHeaderName> Extend<(K, HeaderValue)> for HeaderMap {
    fn extend<I: IntoIterator<Item = (K, HeaderValue)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a HeaderName, &'a HeaderValue);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ===== Iterators =====

/// Iterator returned from [`HeaderMap::get_all`].
pub struct GetAll<'a, K> {
    name: K,
    iter: slice::Iter<'a, (HeaderName, HeaderValue)>,
}

impl<'a, K: AsHeaderName> Iterator for GetAll<'a, K> {
    type Item = &'a HeaderValue;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.name.as_header_str();
        self.iter
            .by_ref()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

impl<K: AsHeaderName> DoubleEndedIterator for GetAll<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let name = self.name.as_header_str();
        self.iter
            .by_ref()
            .rfind(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

impl<K: AsHeaderName> FusedIterator for GetAll<'_, K> {}

impl<K: AsHeaderName> std::fmt::Debug for GetAll<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GetAll").field(&self.name.as_header_str()).finish()
    }
}

/// Iterator returned from [`HeaderMap::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    iter: slice::Iter<'a, (HeaderName, HeaderValue)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a HeaderName, &'a HeaderValue);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(n, v)| (n, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
