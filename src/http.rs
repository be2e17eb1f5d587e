//! HTTP Protocol.
mod method;
mod status;
mod version;

pub use method::{Method, UnknownMethod};
pub use status::{InvalidStatusCode, StatusCode};
pub use version::Version;
