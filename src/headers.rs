//! HTTP Header Fields.
//!
//! Names keep the case they were created with, comparison is ASCII case-insensitive. The
//! field order of [`HeaderMap`] is the order fields are written on the wire.
mod name;
mod value;
mod map;
mod error;

pub use name::{HeaderName, AsHeaderName, IntoHeaderName, standard};
pub use value::HeaderValue;
pub use map::{HeaderMap, GetAll, Iter};
pub use error::HeaderError;

#[cfg(test)]
mod test;
