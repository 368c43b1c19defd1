use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::{FieldValue, JsonValue, Token, ValueBuilder};

/// Receiver of serialization events.
///
/// Callers must issue calls in a structurally valid order: a `key` before
/// every object member value, balanced begin/end pairs. Writers never fail;
/// a sink with an error channel of its own (e.g. an I/O stream) records the
/// error and reports it when finished.
pub trait TokenSink {
    /// `{`
    fn begin_object(&mut self);
    /// Member name of the value that follows.
    fn key(&mut self, name: &str);
    /// `}`
    fn end_object(&mut self);
    /// `[`
    fn begin_array(&mut self);
    /// `]`
    fn end_array(&mut self);
    /// A string literal.
    fn text(&mut self, value: &str);
    /// An integer literal.
    fn integer(&mut self, value: i64);
    /// A floating literal.
    fn real(&mut self, value: f64);
    /// `true` or `false`.
    fn boolean(&mut self, value: bool);
    /// `null`.
    fn null(&mut self);

    /// Forward a single token.
    fn token(&mut self, token: &Token<'_>) {
        match token {
            Token::Key(name) => self.key(name),
            Token::Text(text) => self.text(text),
            Token::Integer(value) => self.integer(*value),
            Token::Real(value) => self.real(*value),
            Token::Boolean(value) => self.boolean(*value),
            Token::Null => self.null(),
            Token::ArrayStart => self.begin_array(),
            Token::ArrayEnd => self.end_array(),
            Token::ObjectStart => self.begin_object(),
            Token::ObjectEnd => self.end_object(),
        }
    }
}

/// Recording sink: each call becomes one owned token.
impl TokenSink for Vec<Token<'static>> {
    fn begin_object(&mut self) {
        self.push(Token::ObjectStart);
    }

    fn key(&mut self, name: &str) {
        self.push(Token::Key(Cow::Owned(name.into())));
    }

    fn end_object(&mut self) {
        self.push(Token::ObjectEnd);
    }

    fn begin_array(&mut self) {
        self.push(Token::ArrayStart);
    }

    fn end_array(&mut self) {
        self.push(Token::ArrayEnd);
    }

    fn text(&mut self, value: &str) {
        self.push(Token::Text(Cow::Owned(value.into())));
    }

    fn integer(&mut self, value: i64) {
        self.push(Token::Integer(value));
    }

    fn real(&mut self, value: f64) {
        self.push(Token::Real(value));
    }

    fn boolean(&mut self, value: bool) {
        self.push(Token::Boolean(value));
    }

    fn null(&mut self) {
        self.push(Token::Null);
    }
}

/// Write `value` into a token vector.
pub fn to_tokens<V: FieldValue>(value: &V) -> Vec<Token<'static>> {
    let mut tokens = Vec::new();
    value.write(&mut tokens);
    tokens
}

/// Write `value` into the tagged value model.
pub fn to_value<V: FieldValue>(value: &V) -> JsonValue {
    let mut builder = ValueBuilder::new();
    value.write(&mut builder);
    // every FieldValue writes exactly one complete value
    builder.finish().unwrap_or(JsonValue::Null)
}
