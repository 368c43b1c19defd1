use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::TokenKind;

/// One step from a parent value to a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member, by name.
    Field(String),
    /// Array element, by position.
    Index(usize),
}

/// Chain of field names and array positions from the root to the value an
/// error refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the root value.
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append a step.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// The steps of this path, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub const fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Field names along the path, skipping array positions.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Field(name) => Some(name.as_str()),
            PathSegment::Index(_) => None,
        })
    }
}

impl FromIterator<PathSegment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FieldPath {
    /// Renders like `changes[2].uri`; the root path renders as `<root>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A type's field declarations could not be assembled into a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// Two declarations (own or from mixins) share a wire name.
    DuplicateField {
        /// The repeated wire name.
        field: &'static str,
        /// The type whose registry was being built.
        type_name: &'static str,
    },
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionError::DuplicateField { field, type_name } => {
                write!(f, "field `{field}` is declared more than once in `{type_name}`")
            }
        }
    }
}

impl std::error::Error for CompositionError {}

/// What went wrong during a parse.
///
/// Malformed structure comes in two variants:
/// [`MalformedStructure`](Self::MalformedStructure) for a token that
/// arrives where it cannot go, and [`UnexpectedEnd`](Self::UnexpectedEnd)
/// for a stream that stops mid-value. [`ParseErrorKind::is_malformed`]
/// matches both.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// The observed token kind has no setter for the resolved field, or the
    /// setter refused the literal.
    TypeMismatch {
        /// The kinds or shape the field accepts.
        expected: Cow<'static, str>,
        /// The token kind that was observed.
        got: TokenKind,
    },
    /// An undeclared key was found while unknown fields are rejected.
    UnknownField {
        /// The unknown key.
        field: String,
        /// A declared field with a similar name, if any.
        suggestion: Option<&'static str>,
    },
    /// The same key appeared twice in one object while duplicates are rejected.
    DuplicateField {
        /// The repeated key.
        field: String,
    },
    /// An object closed before one of its required fields was set.
    MissingRequiredField {
        /// The first missing field, in declaration order.
        field: &'static str,
        /// The type being parsed.
        type_name: &'static str,
    },
    /// A token arrived in a state that cannot accept it.
    MalformedStructure {
        /// What the current state accepts.
        expected: &'static str,
        /// The token kind that arrived instead.
        got: TokenKind,
    },
    /// The token stream ended while a value was still open: malformed
    /// structure where the offending "token" is the end of the stream.
    UnexpectedEnd {
        /// What the current state was waiting for.
        expected: &'static str,
    },
    /// Nesting exceeded [`ParseOptions::max_depth`](crate::ParseOptions).
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// The type's own `is_valid` check failed when its object closed.
    InvalidObject {
        /// The type being parsed.
        type_name: &'static str,
    },
    /// The target type's registry could not be built.
    Composition(CompositionError),
    /// The handler already failed and accepts no more tokens.
    Aborted,
}

impl ParseErrorKind {
    /// Whether the token stream itself was out of shape, as opposed to a
    /// well-formed stream that does not fit the target type.
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            ParseErrorKind::MalformedStructure { .. } | ParseErrorKind::UnexpectedEnd { .. }
        )
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            ParseErrorKind::UnknownField { field, suggestion } => {
                write!(f, "unknown field `{field}`")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean `{suggestion}`?)")?;
                }
                Ok(())
            }
            ParseErrorKind::DuplicateField { field } => write!(f, "duplicate field `{field}`"),
            ParseErrorKind::MissingRequiredField { field, type_name } => {
                write!(f, "missing required field `{field}` in `{type_name}`")
            }
            ParseErrorKind::MalformedStructure { expected, got } => {
                write!(f, "malformed structure: expected {expected}, got {got}")
            }
            ParseErrorKind::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of tokens, expected {expected}")
            }
            ParseErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
            ParseErrorKind::InvalidObject { type_name } => {
                write!(f, "`{type_name}` failed validation")
            }
            ParseErrorKind::Composition(error) => write!(f, "{error}"),
            ParseErrorKind::Aborted => f.write_str("parse already failed"),
        }
    }
}

impl From<CompositionError> for ParseErrorKind {
    fn from(error: CompositionError) -> Self {
        ParseErrorKind::Composition(error)
    }
}

/// A failed parse: the reason, and where in the document it happened.
///
/// Every parse error is fatal to the whole top-level parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The reason.
    pub kind: ParseErrorKind,
    /// Location of the failing value, from the root.
    pub path: FieldPath,
}

impl ParseError {
    /// Create an error at `path`.
    pub const fn new(kind: ParseErrorKind, path: FieldPath) -> Self {
        Self { kind, path }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.path)
    }
}

impl std::error::Error for ParseError {}

/// Error from driving a [`Handler`](crate::Handler) with a
/// [`TokenSource`](crate::TokenSource).
#[derive(Debug)]
pub enum DecodeError<E> {
    /// The token source failed (e.g. invalid JSON text).
    Source(E),
    /// The tokens did not describe a valid value of the target type.
    Parse(ParseError),
}

impl<E> From<ParseError> for DecodeError<E> {
    fn from(error: ParseError) -> Self {
        DecodeError::Parse(error)
    }
}

impl<E: fmt::Display> fmt::Display for DecodeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Source(error) => write!(f, "{error}"),
            DecodeError::Parse(error) => write!(f, "{error}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for DecodeError<E> {}
