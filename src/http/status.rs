use std::num::NonZeroU16;

/// HTTP [Status Code][rfc].
///
/// Any three digit code is accepted, there is no registry of known codes nor their reason
/// phrases.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(NonZeroU16);

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        Self::OK
    }
}

macro_rules! status_code {
    ($($(#[$doc:meta])* $int:literal $id:ident;)*) => {
        impl StatusCode {
            $(
                $(#[$doc])*
                pub const $id: Self = Self(NonZeroU16::new($int).unwrap());
            )*
        }
    };
}

status_code! {
    /// `100`
    100 CONTINUE;
    /// `101`
    101 SWITCHING_PROTOCOLS;
    /// `200`
    200 OK;
    /// `201`
    201 CREATED;
    /// `204`
    204 NO_CONTENT;
    /// `304`
    304 NOT_MODIFIED;
    /// `400`
    400 BAD_REQUEST;
    /// `404`
    404 NOT_FOUND;
    /// `500`
    500 INTERNAL_SERVER_ERROR;
}

impl StatusCode {
    /// Create [`StatusCode`] from integer.
    ///
    /// # Errors
    ///
    /// Returns error if `code` is not within `100..=999`.
    #[inline]
    pub const fn from_u16(code: u16) -> Result<Self, InvalidStatusCode> {
        match code {
            // SAFETY: 100..=999 is non zero
            100..=999 => Ok(Self(unsafe { NonZeroU16::new_unchecked(code) })),
            _ => Err(InvalidStatusCode),
        }
    }

    /// Returns status code value, e.g: `200`.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0.get()
    }

    /// Returns `true` for `1xx` codes.
    #[inline]
    pub const fn is_informational(&self) -> bool {
        matches!(self.0.get(), 100..=199)
    }

    /// Returns `true` if a response with this status may carry content.
    ///
    /// `1xx`, `204 No Content` and `304 Not Modified` responses never do.
    #[inline]
    pub const fn allows_payload(&self) -> bool {
        !matches!(self.0.get(), 100..=199 | 204 | 304)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(itoa::Buffer::new().format(self.as_u16()))
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

// ===== Error =====

/// An error when creating [`StatusCode`] outside of `100..=999`.
#[derive(Debug)]
pub struct InvalidStatusCode;

impl std::error::Error for InvalidStatusCode { }

impl std::fmt::Display for InvalidStatusCode {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid status code")
    }
}

#[cfg(test)]
mod test {
    use super::StatusCode;

    #[test]
    fn status_code_range() {
        assert_eq!(StatusCode::from_u16(200).ok(), Some(StatusCode::OK));
        assert_eq!(StatusCode::from_u16(599).map(|e| e.as_u16()).ok(), Some(599));
        assert!(StatusCode::from_u16(99).is_err());
        assert!(StatusCode::from_u16(1000).is_err());
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404");
        assert!(!StatusCode::NO_CONTENT.allows_payload());
        assert!(!StatusCode::CONTINUE.allows_payload());
        assert!(StatusCode::OK.allows_payload());
    }
}
