//! The streaming parse driver.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::frame::{Frame, KeyOutcome, RootFrame, SkipFrame, State, ValueOutcome};
use crate::{
    DecodeError, FieldPath, FieldValue, ParseError, ParseErrorKind, ParseOptions, Reader, Token, TokenSource,
};

/// Push-driven parser: feed it tokens one at a time, then ask for the value.
///
/// The handler keeps an explicit stack of frames, one per open container
/// plus the root. The first error aborts the parse: every frame is dropped
/// and later calls fail with [`ParseErrorKind::Aborted`].
///
/// ```
/// use clasp_codec::{Handler, Token};
///
/// let mut handler = Handler::<Vec<i64>>::new();
/// for token in [Token::ArrayStart, Token::Integer(1), Token::Integer(2), Token::ArrayEnd] {
///     handler.feed(token).unwrap();
/// }
/// assert_eq!(handler.finish().unwrap(), vec![1, 2]);
/// ```
pub struct Handler<V> {
    stack: Vec<Box<dyn Frame>>,
    options: ParseOptions,
    failed: bool,
    _value: core::marker::PhantomData<fn() -> V>,
}

impl<V: FieldValue> Handler<V> {
    /// A handler for `V` with default options.
    pub fn new() -> Self {
        Self::with_reader(V::reader(), ParseOptions::new())
    }

    /// A handler for `V` with the given options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self::with_reader(V::reader(), options)
    }
}

impl<V: FieldValue> Default for Handler<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> Handler<V> {
    /// A handler whose top-level value goes through `reader`.
    pub fn with_reader(reader: Reader<V>, options: ParseOptions) -> Self {
        Self {
            stack: vec![Box::new(RootFrame::new(reader)) as Box<dyn Frame>],
            options,
            failed: false,
            _value: core::marker::PhantomData,
        }
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    /// Whether a complete top-level value has been read.
    pub fn is_complete(&self) -> bool {
        !self.failed && self.stack.len() == 1 && self.stack.last().is_some_and(|root| root.state() == State::Finished)
    }

    /// Process one token.
    pub fn feed(&mut self, token: Token<'_>) -> Result<(), ParseError> {
        if self.failed {
            return Err(ParseError::new(ParseErrorKind::Aborted, FieldPath::root()));
        }
        crate::trace!(?token, depth = self.depth(), "feed");
        self.step(token).map_err(|kind| self.fail(kind))
    }

    /// End of input: return the value, or fail if it is incomplete.
    pub fn finish(mut self) -> Result<V, ParseError> {
        if self.failed {
            return Err(ParseError::new(ParseErrorKind::Aborted, FieldPath::root()));
        }
        if self.stack.len() > 1 {
            let expected = self.stack.last().map_or("a value", |top| top.expects());
            return Err(self.fail(ParseErrorKind::UnexpectedEnd { expected }));
        }
        let Some(root) = self.stack.pop() else {
            return Err(ParseError::new(ParseErrorKind::Aborted, FieldPath::root()));
        };
        let produced = root.close().map_err(|kind| ParseError::new(kind, FieldPath::root()))?;
        match produced.downcast::<Option<V>>() {
            Ok(value) => match *value {
                Some(value) => Ok(value),
                None => Err(ParseError::new(
                    ParseErrorKind::UnexpectedEnd { expected: "a value" },
                    FieldPath::root(),
                )),
            },
            Err(_) => Err(ParseError::new(ParseErrorKind::Aborted, FieldPath::root())),
        }
    }

    fn step(&mut self, token: Token<'_>) -> Result<(), ParseErrorKind> {
        let kind = token.kind();
        let depth = self.depth();
        let Some(top) = self.stack.last_mut() else {
            return Err(ParseErrorKind::Aborted);
        };
        match (top.state(), token) {
            (State::Skipping, _) => {
                if top.skip(kind)? {
                    crate::trace!("skipped value");
                    self.stack.pop();
                }
                Ok(())
            }
            (State::ExpectingKey, Token::Key(name)) => match top.accept_key(name)? {
                KeyOutcome::Resolved => Ok(()),
                KeyOutcome::Skip => {
                    self.stack.push(SkipFrame::new(depth, self.options.max_depth));
                    Ok(())
                }
            },
            (State::ExpectingKey, Token::ObjectEnd) | (State::InArray, Token::ArrayEnd) => self.close_top(),
            (State::ExpectingRoot | State::ExpectingValue | State::InArray, token) if kind.starts_value() => {
                match top.accept_value(token, &self.options)? {
                    ValueOutcome::Stored => Ok(()),
                    ValueOutcome::Opened(frame) => self.push(frame),
                }
            }
            (state, _) => Err(ParseErrorKind::MalformedStructure {
                expected: state.expects(),
                got: kind,
            }),
        }
    }

    fn push(&mut self, frame: Box<dyn Frame>) -> Result<(), ParseErrorKind> {
        if self.depth() >= self.options.max_depth {
            return Err(ParseErrorKind::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        self.stack.push(frame);
        crate::trace!(depth = self.depth(), "push");
        Ok(())
    }

    fn close_top(&mut self) -> Result<(), ParseErrorKind> {
        let Some(frame) = self.stack.pop() else {
            return Err(ParseErrorKind::Aborted);
        };
        let produced = frame.close()?;
        crate::trace!(depth = self.depth(), "pop");
        match self.stack.last_mut() {
            Some(parent) => parent.accept_child(produced),
            None => Err(ParseErrorKind::Aborted),
        }
    }

    /// Record the failure, drop every frame, and attach the path.
    fn fail(&mut self, kind: ParseErrorKind) -> ParseError {
        let path: FieldPath = self.stack.iter().filter_map(|frame| frame.segment()).collect();
        crate::debug!(error = %kind, %path, "parse failed");
        self.failed = true;
        self.stack.clear();
        ParseError::new(kind, path)
    }
}

/// Parse a value from a sequence of tokens with default options.
pub fn parse_tokens<'de, V, I>(tokens: I) -> Result<V, ParseError>
where
    V: FieldValue,
    I: IntoIterator<Item = Token<'de>>,
{
    parse_tokens_with(tokens, ParseOptions::new())
}

/// Parse a value from a sequence of tokens.
pub fn parse_tokens_with<'de, V, I>(tokens: I, options: ParseOptions) -> Result<V, ParseError>
where
    V: FieldValue,
    I: IntoIterator<Item = Token<'de>>,
{
    let mut handler = Handler::<V>::with_options(options);
    for token in tokens {
        handler.feed(token)?;
    }
    handler.finish()
}

/// Pull every token from `source` and parse a value, with default options.
pub fn decode<'de, V, S>(source: S) -> Result<V, DecodeError<S::Error>>
where
    V: FieldValue,
    S: TokenSource<'de>,
{
    decode_with(source, ParseOptions::new())
}

/// Pull every token from `source` and parse a value.
///
/// Tokens are pulled only until the handler fails, so a parse error is
/// reported even if the rest of the input is not valid for the source.
pub fn decode_with<'de, V, S>(mut source: S, options: ParseOptions) -> Result<V, DecodeError<S::Error>>
where
    V: FieldValue,
    S: TokenSource<'de>,
{
    let mut handler = Handler::<V>::with_options(options);
    while let Some(token) = source.next_token().map_err(DecodeError::Source)? {
        handler.feed(token)?;
    }
    Ok(handler.finish()?)
}
