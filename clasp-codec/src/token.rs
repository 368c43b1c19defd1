use alloc::borrow::Cow;
use core::fmt;

/// Event emitted by a tokenizer while streaming through a JSON document.
///
/// The stream is expected to be well-formed with respect to nesting: every
/// start is matched by exactly one end at the same depth. Anything else is
/// for the [`Handler`](crate::Handler) to reject.
#[derive(Clone, PartialEq)]
pub enum Token<'de> {
    /// An object member name. Always followed by exactly one value.
    Key(Cow<'de, str>),
    /// A string literal.
    Text(Cow<'de, str>),
    /// A number literal written without fraction or exponent.
    Integer(i64),
    /// A number literal written with a fraction or exponent.
    Real(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
}

impl<'de> Token<'de> {
    /// The kind of this token, without its payload.
    pub const fn kind(&self) -> TokenKind {
        match self {
            Token::Key(_) => TokenKind::Key,
            Token::Text(_) => TokenKind::Text,
            Token::Integer(_) => TokenKind::Integer,
            Token::Real(_) => TokenKind::Real,
            Token::Boolean(_) => TokenKind::Boolean,
            Token::Null => TokenKind::Null,
            Token::ArrayStart => TokenKind::ArrayStart,
            Token::ArrayEnd => TokenKind::ArrayEnd,
            Token::ObjectStart => TokenKind::ObjectStart,
            Token::ObjectEnd => TokenKind::ObjectEnd,
        }
    }

    /// Detach the token from the input it borrows from.
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Token::Key(name) => Token::Key(Cow::Owned(name.into_owned())),
            Token::Text(text) => Token::Text(Cow::Owned(text.into_owned())),
            Token::Integer(value) => Token::Integer(value),
            Token::Real(value) => Token::Real(value),
            Token::Boolean(value) => Token::Boolean(value),
            Token::Null => Token::Null,
            Token::ArrayStart => Token::ArrayStart,
            Token::ArrayEnd => Token::ArrayEnd,
            Token::ObjectStart => Token::ObjectStart,
            Token::ObjectEnd => Token::ObjectEnd,
        }
    }

    /// Shorthand for a [`Token::Key`] borrowing `name`.
    pub const fn key(name: &'de str) -> Self {
        Token::Key(Cow::Borrowed(name))
    }

    /// Shorthand for a [`Token::Text`] borrowing `text`.
    pub const fn text(text: &'de str) -> Self {
        Token::Text(Cow::Borrowed(text))
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Key(name) => f.debug_tuple("Key").field(name).finish(),
            Token::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Token::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Token::Real(value) => f.debug_tuple("Real").field(value).finish(),
            Token::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            Token::Null => f.write_str("Null"),
            Token::ArrayStart => f.write_str("ArrayStart"),
            Token::ArrayEnd => f.write_str("ArrayEnd"),
            Token::ObjectStart => f.write_str("ObjectStart"),
            Token::ObjectEnd => f.write_str("ObjectEnd"),
        }
    }
}

/// Payload-free classification of a [`Token`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Object member name.
    Key,
    /// String literal.
    Text,
    /// Integer literal.
    Integer,
    /// Floating literal.
    Real,
    /// Boolean literal.
    Boolean,
    /// `null`.
    Null,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
}

impl TokenKind {
    /// Whether a token of this kind can begin a value.
    pub const fn starts_value(self) -> bool {
        matches!(
            self,
            TokenKind::Text
                | TokenKind::Integer
                | TokenKind::Real
                | TokenKind::Boolean
                | TokenKind::Null
                | TokenKind::ArrayStart
                | TokenKind::ObjectStart
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Key => "field key",
            TokenKind::Text => "string",
            TokenKind::Integer => "integer",
            TokenKind::Real => "real number",
            TokenKind::Boolean => "boolean",
            TokenKind::Null => "null",
            TokenKind::ArrayStart => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::ObjectStart => "'{'",
            TokenKind::ObjectEnd => "'}'",
        })
    }
}

/// Pull-based producer of [`Token`]s, such as a JSON text tokenizer.
pub trait TokenSource<'de> {
    /// Tokenizer-specific error type.
    type Error;

    /// Read the next token. `Ok(None)` signals the end of input.
    fn next_token(&mut self) -> Result<Option<Token<'de>>, Self::Error>;
}
