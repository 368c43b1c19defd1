//! Pull tokenizer over JSON text.
//!
//! The tokenizer only checks the JSON grammar. Whether the tokens make a
//! valid message is for the [`Handler`](clasp_codec::Handler) to decide.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::str::CharIndices;

use clasp_codec::{Token, TokenSource};

use crate::{JsonError, JsonErrorKind};

#[derive(Debug, Clone, Copy)]
enum ContextState {
    Object(ObjectState),
    Array(ArrayState),
}

#[derive(Debug, Clone, Copy)]
enum ObjectState {
    KeyOrEnd,
    Key,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy)]
enum ArrayState {
    ValueOrEnd,
    Value,
    CommaOrEnd,
}

/// Streams the [`Token`]s of a JSON document.
///
/// Strings without escapes are borrowed from the input. Numbers written
/// without fraction or exponent become [`Token::Integer`] when they fit in
/// an `i64`, every other number becomes [`Token::Real`].
///
/// ```
/// use clasp_codec::{Token, TokenSource};
/// use clasp_json::JsonTokenizer;
///
/// let mut tokens = JsonTokenizer::new(r#"{"line": 3}"#);
/// assert_eq!(tokens.next_token().unwrap(), Some(Token::ObjectStart));
/// assert_eq!(tokens.next_token().unwrap(), Some(Token::key("line")));
/// assert_eq!(tokens.next_token().unwrap(), Some(Token::Integer(3)));
/// assert_eq!(tokens.next_token().unwrap(), Some(Token::ObjectEnd));
/// assert_eq!(tokens.next_token().unwrap(), None);
/// ```
pub struct JsonTokenizer<'de> {
    input: &'de str,
    pos: usize,
    stack: Vec<ContextState>,
    root_started: bool,
}

impl<'de> JsonTokenizer<'de> {
    /// Tokenize `input`.
    pub const fn new(input: &'de str) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            root_started: false,
        }
    }

    /// Byte offset of the next unread character.
    pub const fn offset(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn error(&self, kind: JsonErrorKind) -> JsonError {
        crate::debug!(offset = self.pos, error = %kind, "tokenizer failed");
        JsonError::new(kind, self.pos)
    }

    fn unexpected(&self, expected: &'static str) -> JsonError {
        match self.input[self.pos..].chars().next() {
            Some(got) => self.error(JsonErrorKind::UnexpectedChar { got, expected }),
            None => self.error(JsonErrorKind::UnexpectedEof { expected }),
        }
    }

    fn set_top(&mut self, state: ContextState) {
        if let Some(top) = self.stack.last_mut() {
            *top = state;
        }
    }

    /// The enclosing container has consumed one more value.
    fn finish_value_in_parent(&mut self) {
        match self.stack.last_mut() {
            Some(ContextState::Object(state)) => *state = ObjectState::CommaOrEnd,
            Some(ContextState::Array(state)) => *state = ArrayState::CommaOrEnd,
            None => {}
        }
    }

    fn close(&mut self, token: Token<'de>) -> Token<'de> {
        self.pos += 1;
        self.stack.pop();
        self.finish_value_in_parent();
        token
    }

    fn next_in_context(&mut self) -> Result<Option<Token<'de>>, JsonError> {
        loop {
            self.skip_whitespace();
            let Some(context) = self.stack.last().copied() else {
                if self.root_started {
                    return match self.peek() {
                        None => Ok(None),
                        Some(_) => Err(self.error(JsonErrorKind::TrailingCharacters)),
                    };
                }
                self.root_started = true;
                return self.value().map(Some);
            };

            match context {
                ContextState::Object(ObjectState::KeyOrEnd) => match self.peek() {
                    Some(b'}') => return Ok(Some(self.close(Token::ObjectEnd))),
                    Some(b'"') => return self.key().map(Some),
                    _ => return Err(self.unexpected("a string key or '}'")),
                },
                ContextState::Object(ObjectState::Key) => match self.peek() {
                    Some(b'"') => return self.key().map(Some),
                    _ => return Err(self.unexpected("a string key")),
                },
                ContextState::Object(ObjectState::Value) => return self.value().map(Some),
                ContextState::Object(ObjectState::CommaOrEnd) => match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        self.set_top(ContextState::Object(ObjectState::Key));
                    }
                    Some(b'}') => return Ok(Some(self.close(Token::ObjectEnd))),
                    _ => return Err(self.unexpected("',' or '}'")),
                },
                ContextState::Array(ArrayState::ValueOrEnd) => match self.peek() {
                    Some(b']') => return Ok(Some(self.close(Token::ArrayEnd))),
                    _ => return self.value().map(Some),
                },
                ContextState::Array(ArrayState::Value) => return self.value().map(Some),
                ContextState::Array(ArrayState::CommaOrEnd) => match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        self.set_top(ContextState::Array(ArrayState::Value));
                    }
                    Some(b']') => return Ok(Some(self.close(Token::ArrayEnd))),
                    _ => return Err(self.unexpected("',' or ']'")),
                },
            }
        }
    }

    fn key(&mut self) -> Result<Token<'de>, JsonError> {
        let name = self.string()?;
        self.skip_whitespace();
        if self.peek() != Some(b':') {
            return Err(self.unexpected("':'"));
        }
        self.pos += 1;
        self.set_top(ContextState::Object(ObjectState::Value));
        Ok(Token::Key(name))
    }

    fn value(&mut self) -> Result<Token<'de>, JsonError> {
        let token = match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                self.finish_value_in_parent();
                self.stack.push(ContextState::Object(ObjectState::KeyOrEnd));
                return Ok(Token::ObjectStart);
            }
            Some(b'[') => {
                self.pos += 1;
                self.finish_value_in_parent();
                self.stack.push(ContextState::Array(ArrayState::ValueOrEnd));
                return Ok(Token::ArrayStart);
            }
            Some(b'"') => Token::Text(self.string()?),
            Some(b'-' | b'0'..=b'9') => self.number()?,
            Some(b't') => self.literal("true", Token::Boolean(true))?,
            Some(b'f') => self.literal("false", Token::Boolean(false))?,
            Some(b'n') => self.literal("null", Token::Null)?,
            _ => return Err(self.unexpected("a value")),
        };
        self.finish_value_in_parent();
        Ok(token)
    }

    fn literal(&mut self, word: &'static str, token: Token<'de>) -> Result<Token<'de>, JsonError> {
        if !self.input[self.pos..].starts_with(word) {
            return Err(self.unexpected(word));
        }
        self.pos += word.len();
        Ok(token)
    }

    /// Scan a string literal starting at its opening quote.
    fn string(&mut self) -> Result<Cow<'de, str>, JsonError> {
        let bytes = self.input.as_bytes();
        let start = self.pos + 1;
        let mut pos = start;
        let mut has_escapes = false;
        loop {
            match bytes.get(pos) {
                None => {
                    self.pos = pos;
                    return Err(self.error(JsonErrorKind::UnexpectedEof { expected: "'\"'" }));
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    has_escapes = true;
                    pos += 2;
                }
                Some(&b) if b < 0x20 => {
                    self.pos = pos;
                    return Err(self.error(JsonErrorKind::ControlCharacter));
                }
                Some(_) => pos += 1,
            }
        }
        let raw = &self.input[start..pos];
        self.pos = pos + 1;
        if has_escapes {
            decode_escapes(raw, start).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(raw))
        }
    }

    fn number(&mut self) -> Result<Token<'de>, JsonError> {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut pos = start;
        let mut integral = true;
        let digits = |pos: &mut usize| {
            let from = *pos;
            while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
                *pos += 1;
            }
            *pos - from
        };

        if bytes.get(pos) == Some(&b'-') {
            pos += 1;
        }
        let leading_zero = bytes.get(pos) == Some(&b'0');
        let int_digits = digits(&mut pos);
        if int_digits == 0 || (leading_zero && int_digits > 1) {
            return Err(JsonError::new(JsonErrorKind::InvalidNumber, start));
        }
        if bytes.get(pos) == Some(&b'.') {
            integral = false;
            pos += 1;
            if digits(&mut pos) == 0 {
                return Err(JsonError::new(JsonErrorKind::InvalidNumber, start));
            }
        }
        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            integral = false;
            pos += 1;
            if matches!(bytes.get(pos), Some(b'+' | b'-')) {
                pos += 1;
            }
            if digits(&mut pos) == 0 {
                return Err(JsonError::new(JsonErrorKind::InvalidNumber, start));
            }
        }

        // Integers stay integers: one that does not fit is refused rather
        // than read back as a real.
        let text = &self.input[start..pos];
        let out_of_range = JsonError::new(JsonErrorKind::NumberOutOfRange, start);
        let token = if integral {
            Token::Integer(text.parse::<i64>().map_err(|_| out_of_range)?)
        } else {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Token::Real(value),
                Ok(_) => return Err(out_of_range),
                Err(_) => return Err(JsonError::new(JsonErrorKind::InvalidNumber, start)),
            }
        };
        self.pos = pos;
        Ok(token)
    }
}

impl<'de> TokenSource<'de> for JsonTokenizer<'de> {
    type Error = JsonError;

    fn next_token(&mut self) -> Result<Option<Token<'de>>, JsonError> {
        let token = self.next_in_context()?;
        crate::trace!(?token, offset = self.pos, "token");
        Ok(token)
    }
}

impl<'de> Iterator for JsonTokenizer<'de> {
    type Item = Result<Token<'de>, JsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Decode the escapes of a string body. `base` is the body's byte offset in
/// the input, for error reporting.
fn decode_escapes(raw: &str, base: usize) -> Result<String, JsonError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let at = base + i;
        let decoded = match chars.next() {
            Some((_, '"')) => '"',
            Some((_, '\\')) => '\\',
            Some((_, '/')) => '/',
            Some((_, 'b')) => '\u{08}',
            Some((_, 'f')) => '\u{0C}',
            Some((_, 'n')) => '\n',
            Some((_, 'r')) => '\r',
            Some((_, 't')) => '\t',
            Some((_, 'u')) => unicode_escape(&mut chars, at)?,
            _ => return Err(JsonError::new(JsonErrorKind::InvalidEscape, at)),
        };
        out.push(decoded);
    }
    Ok(out)
}

/// The rest of a `\u` escape, combining a surrogate pair when one follows.
fn unicode_escape(chars: &mut CharIndices<'_>, at: usize) -> Result<char, JsonError> {
    let invalid = || JsonError::new(JsonErrorKind::InvalidUnicodeEscape, at);
    let high = hex4(chars).ok_or_else(invalid)?;
    let code_point = match high {
        0xD800..=0xDBFF => {
            match (chars.next(), chars.next()) {
                (Some((_, '\\')), Some((_, 'u'))) => {}
                _ => return Err(invalid()),
            }
            let low = hex4(chars).ok_or_else(invalid)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(invalid());
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        }
        0xDC00..=0xDFFF => return Err(invalid()),
        unit => unit,
    };
    char::from_u32(code_point).ok_or_else(invalid)
}

fn hex4(chars: &mut CharIndices<'_>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        let (_, c) = chars.next()?;
        value = value * 16 + c.to_digit(16)?;
    }
    Some(value)
}
