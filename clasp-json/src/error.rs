//! Error types for JSON text.

use core::fmt::{self, Display};

/// The JSON text could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    /// The specific kind of error
    pub kind: JsonErrorKind,
    /// Byte offset into the input where the error was detected
    pub offset: usize,
}

impl JsonError {
    /// Create an error at `offset`.
    pub const fn new(kind: JsonErrorKind, offset: usize) -> Self {
        JsonError { kind, offset }
    }
}

impl Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)
    }
}

impl std::error::Error for JsonError {}

/// Specific error kinds for JSON text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonErrorKind {
    /// A character that cannot start or continue the expected construct
    UnexpectedChar {
        /// The character that was found
        got: char,
        /// What was expected instead
        expected: &'static str,
    },
    /// Input ended early
    UnexpectedEof {
        /// What was expected before the end
        expected: &'static str,
    },
    /// Something other than whitespace after the top-level value
    TrailingCharacters,
    /// An unescaped control character inside a string
    ControlCharacter,
    /// A backslash followed by something JSON does not define
    InvalidEscape,
    /// A `\u` escape that is not four hex digits, or an unpaired surrogate
    InvalidUnicodeEscape,
    /// A number that does not follow the JSON grammar
    InvalidNumber,
    /// An integer outside `i64`, or a real too large for `f64`
    NumberOutOfRange,
}

impl Display for JsonErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonErrorKind::UnexpectedChar { got, expected } => {
                write!(f, "unexpected character {got:?}, expected {expected}")
            }
            JsonErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            JsonErrorKind::TrailingCharacters => f.write_str("trailing characters after value"),
            JsonErrorKind::ControlCharacter => f.write_str("control character in string"),
            JsonErrorKind::InvalidEscape => f.write_str("invalid escape sequence"),
            JsonErrorKind::InvalidUnicodeEscape => f.write_str("invalid unicode escape"),
            JsonErrorKind::InvalidNumber => f.write_str("invalid number"),
            JsonErrorKind::NumberOutOfRange => f.write_str("number out of range"),
        }
    }
}
