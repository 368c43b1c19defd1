//! Frames of the parse stack.
//!
//! Each open container in the document has one frame on the
//! [`Handler`](crate::Handler)'s stack. The top frame receives the next
//! token. When a container closes, its frame is popped, turned into a value
//! with [`Frame::close`], and handed to the frame below through
//! [`Frame::accept_child`].

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::mem;

use crate::reader::{Convert, Read};
use crate::setter::{Dispatched, Store};
use crate::{
    Composable, DuplicateFieldPolicy, FieldRegistry, FreeObject, JsonValue, ParseErrorKind, ParseOptions, PathSegment,
    Reader, Rejection, Token, TokenKind, UnknownFieldPolicy,
};

/// What the top frame is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// The root value has not started yet.
    ExpectingRoot,
    /// Inside an object, before a key or `}`.
    ExpectingKey,
    /// Inside an object, right after a key.
    ExpectingValue,
    /// Inside an array, before an element or `]`.
    InArray,
    /// Consuming an ignored value.
    Skipping,
    /// The root value is complete.
    Finished,
}

impl State {
    pub(crate) const fn expects(self) -> &'static str {
        match self {
            State::ExpectingRoot => "a value",
            State::ExpectingKey => "a field key or '}'",
            State::ExpectingValue => "a field value",
            State::InArray => "an array element or ']'",
            State::Skipping => "a value",
            State::Finished => "end of input",
        }
    }
}

pub(crate) enum KeyOutcome {
    /// The key names a field; its value comes next.
    Resolved,
    /// The key is ignored; skip its value.
    Skip,
}

pub(crate) enum ValueOutcome {
    Stored,
    Opened(Box<dyn Frame>),
}

pub(crate) trait Frame {
    fn state(&self) -> State;

    fn accept_key(&mut self, key: Cow<'_, str>) -> Result<KeyOutcome, ParseErrorKind> {
        let _ = key;
        Err(self.unexpected(TokenKind::Key))
    }

    fn accept_value(&mut self, token: Token<'_>, options: &ParseOptions) -> Result<ValueOutcome, ParseErrorKind> {
        let _ = options;
        Err(self.unexpected(token.kind()))
    }

    /// Store the value produced by a closed child frame.
    fn accept_child(&mut self, produced: Box<dyn Any>) -> Result<(), ParseErrorKind>;

    /// Feed one token to a skipping frame. `Ok(true)` once the skipped value
    /// is complete.
    fn skip(&mut self, token: TokenKind) -> Result<bool, ParseErrorKind> {
        Err(self.unexpected(token))
    }

    /// Finish the container and produce its value.
    fn close(self: Box<Self>) -> Result<Box<dyn Any>, ParseErrorKind>;

    /// Path step to the value this frame is currently reading, if any.
    fn segment(&self) -> Option<PathSegment> {
        None
    }

    /// What the frame accepts next, for diagnostics.
    fn expects(&self) -> &'static str {
        self.state().expects()
    }

    fn unexpected(&self, got: TokenKind) -> ParseErrorKind {
        ParseErrorKind::MalformedStructure {
            expected: self.expects(),
            got,
        }
    }
}

/// A container opened by a reader, waiting for its frame to close.
struct Pending<V> {
    close: Convert<Box<dyn Any>, V>,
    opened: TokenKind,
}

impl<V> Pending<V> {
    fn finish(self, produced: Box<dyn Any>) -> Result<V, ParseErrorKind> {
        (self.close)(produced).map_err(|rejection| mismatch(rejection, self.opened))
    }
}

fn mismatch(rejection: Rejection, got: TokenKind) -> ParseErrorKind {
    ParseErrorKind::TypeMismatch {
        expected: Cow::Borrowed(rejection.description()),
        got,
    }
}

fn no_child(state: State) -> ParseErrorKind {
    ParseErrorKind::MalformedStructure {
        expected: state.expects(),
        got: TokenKind::ObjectEnd,
    }
}

enum Mode<T> {
    Key,
    Value {
        index: usize,
    },
    Child {
        index: usize,
        deposit: Store<T, Box<dyn Any>>,
        opened: TokenKind,
    },
}

/// An object being read into a [`Composable`] type through its registry.
pub(crate) struct ObjectFrame<T> {
    value: T,
    registry: Rc<FieldRegistry<T>>,
    seen: Vec<bool>,
    unknown_fields: UnknownFieldPolicy,
    duplicate_fields: DuplicateFieldPolicy,
    mode: Mode<T>,
}

impl<T: Composable> ObjectFrame<T> {
    pub(crate) fn open(options: &ParseOptions) -> Result<Box<dyn Frame>, ParseErrorKind> {
        let registry = FieldRegistry::<T>::shared()?;
        crate::trace!(type_name = registry.type_name(), fields = registry.len(), "open object");
        Ok(Box::new(Self {
            value: T::default(),
            seen: vec![false; registry.len()],
            registry,
            unknown_fields: options.unknown_fields,
            duplicate_fields: options.duplicate_fields,
            mode: Mode::Key,
        }))
    }

    fn mark_seen(&mut self, index: usize) {
        if let Some(seen) = self.seen.get_mut(index) {
            *seen = true;
        }
    }
}

impl<T: Composable> Frame for ObjectFrame<T> {
    fn state(&self) -> State {
        match self.mode {
            Mode::Key => State::ExpectingKey,
            Mode::Value { .. } | Mode::Child { .. } => State::ExpectingValue,
        }
    }

    fn accept_key(&mut self, key: Cow<'_, str>) -> Result<KeyOutcome, ParseErrorKind> {
        match self.registry.index_of(&key) {
            Some(index) => {
                let repeated = self.seen.get(index).copied().unwrap_or(false);
                if repeated && self.duplicate_fields == DuplicateFieldPolicy::Reject {
                    return Err(ParseErrorKind::DuplicateField { field: key.into_owned() });
                }
                self.mode = Mode::Value { index };
                Ok(KeyOutcome::Resolved)
            }
            None => match self.unknown_fields {
                UnknownFieldPolicy::Ignore => {
                    crate::trace!(field = %key, type_name = self.registry.type_name(), "skipping unknown field");
                    Ok(KeyOutcome::Skip)
                }
                UnknownFieldPolicy::Reject => Err(ParseErrorKind::UnknownField {
                    suggestion: self.registry.suggest(&key),
                    field: key.into_owned(),
                }),
            },
        }
    }

    fn accept_value(&mut self, token: Token<'_>, options: &ParseOptions) -> Result<ValueOutcome, ParseErrorKind> {
        let Mode::Value { index } = self.mode else {
            return Err(self.unexpected(token.kind()));
        };
        let opened = token.kind();
        match self.registry.setter(index).dispatch(&mut self.value, token, options)? {
            Dispatched::Stored => {
                self.mark_seen(index);
                self.mode = Mode::Key;
                Ok(ValueOutcome::Stored)
            }
            Dispatched::Opened { frame, deposit } => {
                self.mode = Mode::Child { index, deposit, opened };
                Ok(ValueOutcome::Opened(frame))
            }
        }
    }

    fn accept_child(&mut self, produced: Box<dyn Any>) -> Result<(), ParseErrorKind> {
        let Mode::Child { index, deposit, opened } = mem::replace(&mut self.mode, Mode::Key) else {
            return Err(no_child(self.state()));
        };
        match deposit(&mut self.value, produced) {
            Ok(()) => {
                self.mark_seen(index);
                Ok(())
            }
            Err(rejection) => {
                self.mode = Mode::Value { index };
                Err(mismatch(rejection, opened))
            }
        }
    }

    fn close(self: Box<Self>) -> Result<Box<dyn Any>, ParseErrorKind> {
        let type_name = self.registry.type_name();
        if let Some(field) = self.registry.first_missing(&self.seen) {
            return Err(ParseErrorKind::MissingRequiredField { field, type_name });
        }
        if !self.registry.is_valid(&self.value) {
            return Err(ParseErrorKind::InvalidObject { type_name });
        }
        crate::trace!(type_name, "close object");
        Ok(Box::new(self.value))
    }

    fn segment(&self) -> Option<PathSegment> {
        match self.mode {
            Mode::Key => None,
            Mode::Value { index } | Mode::Child { index, .. } => {
                Some(PathSegment::Field(self.registry.name(index).into()))
            }
        }
    }
}

/// An array whose elements all go through one reader.
pub(crate) struct ArrayFrame<E> {
    items: Vec<E>,
    element: Reader<E>,
    pending: Option<Pending<E>>,
}

impl<E: 'static> ArrayFrame<E> {
    pub(crate) fn open(element: Reader<E>) -> Box<dyn Frame> {
        crate::trace!(accepts = %element.accepts(), "open array");
        Box::new(Self {
            items: Vec::new(),
            element,
            pending: None,
        })
    }
}

impl<E: 'static> Frame for ArrayFrame<E> {
    fn state(&self) -> State {
        State::InArray
    }

    fn accept_value(&mut self, token: Token<'_>, options: &ParseOptions) -> Result<ValueOutcome, ParseErrorKind> {
        let opened = token.kind();
        match self.element.read(token, options)? {
            Read::Done(item) => {
                self.items.push(item);
                Ok(ValueOutcome::Stored)
            }
            Read::Opened { frame, close } => {
                self.pending = Some(Pending { close, opened });
                Ok(ValueOutcome::Opened(frame))
            }
        }
    }

    fn accept_child(&mut self, produced: Box<dyn Any>) -> Result<(), ParseErrorKind> {
        let Some(pending) = self.pending.take() else {
            return Err(no_child(self.state()));
        };
        self.items.push(pending.finish(produced)?);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<Box<dyn Any>, ParseErrorKind> {
        crate::trace!(len = self.items.len(), "close array");
        Ok(Box::new(self.items))
    }

    fn segment(&self) -> Option<PathSegment> {
        Some(PathSegment::Index(self.items.len()))
    }
}

enum FreeMode {
    Key,
    Value(String),
    Child(String, Pending<JsonValue>),
}

/// An object in an untyped position: every member is kept.
pub(crate) struct FreeObjectFrame {
    object: FreeObject,
    duplicate_fields: DuplicateFieldPolicy,
    member: Reader<JsonValue>,
    mode: FreeMode,
}

impl FreeObjectFrame {
    pub(crate) fn open(options: &ParseOptions) -> Box<dyn Frame> {
        crate::trace!("open free-form object");
        Box::new(Self {
            object: FreeObject::new(),
            duplicate_fields: options.duplicate_fields,
            member: Reader::any(),
            mode: FreeMode::Key,
        })
    }
}

impl Frame for FreeObjectFrame {
    fn state(&self) -> State {
        match self.mode {
            FreeMode::Key => State::ExpectingKey,
            FreeMode::Value(_) | FreeMode::Child(..) => State::ExpectingValue,
        }
    }

    fn accept_key(&mut self, key: Cow<'_, str>) -> Result<KeyOutcome, ParseErrorKind> {
        if self.duplicate_fields == DuplicateFieldPolicy::Reject && self.object.contains_key(&key) {
            return Err(ParseErrorKind::DuplicateField { field: key.into_owned() });
        }
        self.mode = FreeMode::Value(key.into_owned());
        Ok(KeyOutcome::Resolved)
    }

    fn accept_value(&mut self, token: Token<'_>, options: &ParseOptions) -> Result<ValueOutcome, ParseErrorKind> {
        let FreeMode::Value(key) = mem::replace(&mut self.mode, FreeMode::Key) else {
            return Err(self.unexpected(token.kind()));
        };
        let opened = token.kind();
        match self.member.read(token, options) {
            Ok(Read::Done(value)) => {
                self.object.insert(key, value);
                Ok(ValueOutcome::Stored)
            }
            Ok(Read::Opened { frame, close }) => {
                self.mode = FreeMode::Child(key, Pending { close, opened });
                Ok(ValueOutcome::Opened(frame))
            }
            Err(error) => {
                self.mode = FreeMode::Value(key);
                Err(error)
            }
        }
    }

    fn accept_child(&mut self, produced: Box<dyn Any>) -> Result<(), ParseErrorKind> {
        let FreeMode::Child(key, pending) = mem::replace(&mut self.mode, FreeMode::Key) else {
            return Err(no_child(self.state()));
        };
        let value = pending.finish(produced)?;
        self.object.insert(key, value);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<Box<dyn Any>, ParseErrorKind> {
        Ok(Box::new(self.object))
    }

    fn segment(&self) -> Option<PathSegment> {
        match &self.mode {
            FreeMode::Key => None,
            FreeMode::Value(key) | FreeMode::Child(key, _) => Some(PathSegment::Field(key.clone())),
        }
    }
}

/// A container open inside a skipped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skipped {
    /// Inside an object, before a key or `}`.
    ObjectKey,
    /// Inside an object, right after a key.
    ObjectValue,
    Array,
}

/// Consumes exactly one value structurally and discards it.
///
/// Skipped content is held to the same shape rules as parsed content: keys
/// and values alternate inside objects, and ends must match their starts.
pub(crate) struct SkipFrame {
    open: Vec<Skipped>,
    /// Containers that may still open before the depth limit is hit.
    room: usize,
    limit: usize,
}

impl SkipFrame {
    pub(crate) fn new(depth: usize, limit: usize) -> Box<dyn Frame> {
        Box::new(Self {
            open: Vec::new(),
            room: limit.saturating_sub(depth),
            limit,
        })
    }

    /// A value starts: it fills the pending slot of the enclosing object.
    fn begin_value(&mut self, token: TokenKind) -> Result<(), ParseErrorKind> {
        match self.open.last().copied() {
            Some(Skipped::ObjectValue) => {
                self.open.pop();
                self.open.push(Skipped::ObjectKey);
                Ok(())
            }
            Some(Skipped::ObjectKey) => Err(self.unexpected(token)),
            Some(Skipped::Array) | None => Ok(()),
        }
    }
}

impl Frame for SkipFrame {
    fn state(&self) -> State {
        State::Skipping
    }

    fn accept_child(&mut self, _produced: Box<dyn Any>) -> Result<(), ParseErrorKind> {
        Err(no_child(self.state()))
    }

    fn skip(&mut self, token: TokenKind) -> Result<bool, ParseErrorKind> {
        match (token, self.open.last().copied()) {
            (TokenKind::ObjectStart | TokenKind::ArrayStart, _) => {
                if self.open.len() >= self.room {
                    return Err(ParseErrorKind::DepthLimitExceeded { limit: self.limit });
                }
                self.begin_value(token)?;
                self.open.push(if token == TokenKind::ObjectStart {
                    Skipped::ObjectKey
                } else {
                    Skipped::Array
                });
                Ok(false)
            }
            (TokenKind::ObjectEnd, Some(Skipped::ObjectKey)) | (TokenKind::ArrayEnd, Some(Skipped::Array)) => {
                self.open.pop();
                Ok(self.open.is_empty())
            }
            (TokenKind::Key, Some(Skipped::ObjectKey)) => {
                self.open.pop();
                self.open.push(Skipped::ObjectValue);
                Ok(false)
            }
            (TokenKind::Text | TokenKind::Integer | TokenKind::Real | TokenKind::Boolean | TokenKind::Null, _) => {
                self.begin_value(token)?;
                Ok(self.open.is_empty())
            }
            (TokenKind::Key | TokenKind::ObjectEnd | TokenKind::ArrayEnd, _) => Err(self.unexpected(token)),
        }
    }

    fn close(self: Box<Self>) -> Result<Box<dyn Any>, ParseErrorKind> {
        Ok(Box::new(()))
    }

    fn expects(&self) -> &'static str {
        match self.open.last() {
            None => State::Skipping.expects(),
            Some(Skipped::ObjectKey) => State::ExpectingKey.expects(),
            Some(Skipped::ObjectValue) => State::ExpectingValue.expects(),
            Some(Skipped::Array) => State::InArray.expects(),
        }
    }
}

/// Bottom of the stack: holds the single top-level value.
pub(crate) struct RootFrame<V> {
    reader: Reader<V>,
    value: Option<V>,
    pending: Option<Pending<V>>,
}

impl<V: 'static> RootFrame<V> {
    pub(crate) fn new(reader: Reader<V>) -> Self {
        Self {
            reader,
            value: None,
            pending: None,
        }
    }
}

impl<V: 'static> Frame for RootFrame<V> {
    fn state(&self) -> State {
        if self.value.is_some() {
            State::Finished
        } else {
            State::ExpectingRoot
        }
    }

    fn accept_value(&mut self, token: Token<'_>, options: &ParseOptions) -> Result<ValueOutcome, ParseErrorKind> {
        if self.value.is_some() {
            return Err(self.unexpected(token.kind()));
        }
        let opened = token.kind();
        match self.reader.read(token, options)? {
            Read::Done(value) => {
                self.value = Some(value);
                Ok(ValueOutcome::Stored)
            }
            Read::Opened { frame, close } => {
                self.pending = Some(Pending { close, opened });
                Ok(ValueOutcome::Opened(frame))
            }
        }
    }

    fn accept_child(&mut self, produced: Box<dyn Any>) -> Result<(), ParseErrorKind> {
        let Some(pending) = self.pending.take() else {
            return Err(no_child(self.state()));
        };
        self.value = Some(pending.finish(produced)?);
        Ok(())
    }

    /// Produces the `Option<V>` held so far.
    fn close(self: Box<Self>) -> Result<Box<dyn Any>, ParseErrorKind> {
        Ok(Box::new(self.value))
    }
}
