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

mod error;
mod tokenizer;
mod writer;

pub use error::{JsonError, JsonErrorKind};
pub use tokenizer::JsonTokenizer;
pub use writer::{
    JsonWriter, SerializeOptions, to_string, to_string_pretty, to_string_with_options, to_writer_std,
    to_writer_std_with_options,
};

use clasp_codec::{DecodeError, FieldValue, ParseOptions};

/// Deserialize a value from a JSON string, ignoring unknown fields and
/// letting repeated fields overwrite earlier ones.
///
/// # Example
///
/// ```
/// let numbers: Vec<i64> = clasp_json::from_str("[1, 2, 3]").unwrap();
/// assert_eq!(numbers, [1, 2, 3]);
/// ```
pub fn from_str<T: FieldValue>(input: &str) -> Result<T, DecodeError<JsonError>> {
    from_str_with(input, ParseOptions::new())
}

/// Deserialize a value from a JSON string with custom parse options.
///
/// # Example
///
/// ```
/// use clasp_codec::{DecodeError, JsonValue, ParseOptions};
///
/// let strict = ParseOptions::new().max_depth(2);
/// let err = clasp_json::from_str_with::<JsonValue>("[[[1]]]", strict).unwrap_err();
/// assert!(matches!(err, DecodeError::Parse(_)));
/// ```
pub fn from_str_with<T: FieldValue>(input: &str, options: ParseOptions) -> Result<T, DecodeError<JsonError>> {
    clasp_codec::decode_with(JsonTokenizer::new(input), options)
}
