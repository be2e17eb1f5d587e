//! HTTP/1 Message Serializer
//!
//! A resumable, zero-copy serializer turning HTTP/1 messages into groups of output
//! buffers. The caller stays in control of the IO, writes any prefix of a group, and reports
//! back how many bytes went out.
//!
//! - [`buf`] buffer sequences and their concatenation view
//! - [`message`] requests, responses and the header formatter
//! - [`body`] body sources
//! - [`ser`] the serializer state machine
//! - [`write`] drivers over blocking and async writers
#![warn(missing_debug_implementations)]

mod log;
mod precondition;

pub mod buf;
pub mod chunk;
pub mod http;
pub mod headers;
pub mod message;
pub mod body;
pub mod ser;
pub mod write;

pub use message::{Message, Request, Response};
pub use ser::{Config, Next, Serializer};
