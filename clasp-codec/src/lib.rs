#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

mod composable;
mod error;
mod frame;
mod handler;
mod options;
mod reader;
mod registry;
mod setter;
mod token;
mod value;
mod writer;

pub use composable::{Composable, write_object};
pub use error::{CompositionError, DecodeError, FieldPath, ParseError, ParseErrorKind, PathSegment};
pub use handler::{Handler, decode, decode_with, parse_tokens, parse_tokens_with};
pub use options::{DuplicateFieldPolicy, ParseOptions, UnknownFieldPolicy};
pub use reader::{FieldValue, Kinds, Reader, Rejection, ValueKind};
pub use registry::{FieldRegistry, Fields, Presence};
pub use setter::FieldSetter;
pub use token::{Token, TokenKind, TokenSource};
pub use value::{FreeObject, JsonValue, Number, ObjectRef, ObjectValue, ValueBuilder};
pub use writer::{TokenSink, to_tokens, to_value};
