//! Readers: how a run of tokens becomes one value.
//!
//! A [`Reader<V>`] carries up to six callbacks, one per kind of value a JSON
//! document can hold at a given position. The kind of the first token picks
//! the callback, which is how unions are decoded without a wire tag: a
//! `Range | Location[]` reader simply registers an object callback and an
//! array callback. A reader is the value-level half of a
//! [`FieldSetter`](crate::FieldSetter); binding it to a storage slot gives
//! the field-level half.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::composable::short_type_name;
use crate::frame::{ArrayFrame, Frame, FreeObjectFrame, ObjectFrame};
use crate::{
    Composable, FreeObject, JsonValue, Number, ObjectValue, ParseErrorKind, ParseOptions, Token, TokenKind, TokenSink,
};

/// A reader callback refused the value it was given.
///
/// Turned into [`ParseErrorKind::TypeMismatch`] at the field's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    expected: &'static str,
}

impl Rejection {
    /// Refuse a value, describing what would have been accepted.
    pub const fn expected(expected: &'static str) -> Self {
        Self { expected }
    }

    /// What would have been accepted.
    pub const fn description(&self) -> &'static str {
        self.expected
    }
}

/// The kinds of value a reader can be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A string.
    Text,
    /// An integer or real number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// `null`.
    Null,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl ValueKind {
    const ALL: [ValueKind; 6] = [
        ValueKind::Text,
        ValueKind::Number,
        ValueKind::Boolean,
        ValueKind::Null,
        ValueKind::Array,
        ValueKind::Object,
    ];

    /// The value kind a token opens, if it opens one.
    pub const fn of(token: TokenKind) -> Option<ValueKind> {
        match token {
            TokenKind::Text => Some(ValueKind::Text),
            TokenKind::Integer | TokenKind::Real => Some(ValueKind::Number),
            TokenKind::Boolean => Some(ValueKind::Boolean),
            TokenKind::Null => Some(ValueKind::Null),
            TokenKind::ArrayStart => Some(ValueKind::Array),
            TokenKind::ObjectStart => Some(ValueKind::Object),
            TokenKind::Key | TokenKind::ArrayEnd | TokenKind::ObjectEnd => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    const fn name(self) -> &'static str {
        match self {
            ValueKind::Text => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`ValueKind`]s.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Kinds(u8);

impl Kinds {
    /// The empty set.
    pub const NONE: Kinds = Kinds(0);

    /// Add a kind.
    pub const fn with(self, kind: ValueKind) -> Self {
        Kinds(self.0 | kind.bit())
    }

    /// Whether `kind` is in the set.
    pub const fn contains(self, kind: ValueKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in a fixed order.
    pub fn iter(self) -> impl Iterator<Item = ValueKind> {
        ValueKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Debug for Kinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Kinds {
    /// Renders like `string, number or object`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<ValueKind> = self.iter().collect();
        match kinds.as_slice() {
            [] => f.write_str("nothing"),
            [only] => write!(f, "{only}"),
            [init @ .., last] => {
                for (i, kind) in init.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{kind}")?;
                }
                write!(f, " or {last}")
            }
        }
    }
}

pub(crate) type Convert<A, V> = Rc<dyn Fn(A) -> Result<V, Rejection>>;

pub(crate) type OpenFrame = Rc<dyn Fn(&ParseOptions) -> Result<Box<dyn Frame>, ParseErrorKind>>;

/// A nested container: how to open its frame, and how to turn what the
/// frame produces into a `V`.
pub(crate) struct Nested<V> {
    pub(crate) open: OpenFrame,
    pub(crate) close: Convert<Box<dyn Any>, V>,
}

impl<V> Clone for Nested<V> {
    fn clone(&self) -> Self {
        Self {
            open: self.open.clone(),
            close: self.close.clone(),
        }
    }
}

/// How tokens become a `V`, one optional callback per value kind.
pub struct Reader<V> {
    pub(crate) text: Option<Convert<String, V>>,
    pub(crate) number: Option<Convert<Number, V>>,
    pub(crate) boolean: Option<Convert<bool, V>>,
    pub(crate) null: Option<Convert<(), V>>,
    pub(crate) array: Option<Nested<V>>,
    pub(crate) object: Option<Nested<V>>,
}

impl<V> Clone for Reader<V> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            number: self.number.clone(),
            boolean: self.boolean.clone(),
            null: self.null.clone(),
            array: self.array.clone(),
            object: self.object.clone(),
        }
    }
}

impl<V> Default for Reader<V> {
    fn default() -> Self {
        Self {
            text: None,
            number: None,
            boolean: None,
            null: None,
            array: None,
            object: None,
        }
    }
}

impl<V: 'static> fmt::Debug for Reader<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reader").field(&self.accepts()).finish()
    }
}

fn chain<A: 'static, V: 'static, U: 'static>(
    inner: Convert<A, V>,
    then: Rc<dyn Fn(V) -> Result<U, Rejection>>,
) -> Convert<A, U> {
    Rc::new(move |arg: A| inner(arg).and_then(|value| then(value)))
}

fn chain_nested<V: 'static, U: 'static>(
    inner: Nested<V>,
    then: Rc<dyn Fn(V) -> Result<U, Rejection>>,
) -> Nested<U> {
    Nested {
        open: inner.open,
        close: chain(inner.close, then),
    }
}

fn downcast<T: 'static>(produced: Box<dyn Any>) -> Result<T, Rejection> {
    produced
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| Rejection::expected(short_type_name::<T>()))
}

impl<V: 'static> Reader<V> {
    /// A reader that accepts nothing. Add callbacks with the `on_*` methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept strings.
    pub fn on_text(mut self, convert: impl Fn(String) -> Result<V, Rejection> + 'static) -> Self {
        self.text = Some(Rc::new(convert));
        self
    }

    /// Accept numbers, integer or real.
    pub fn on_number(mut self, convert: impl Fn(Number) -> Result<V, Rejection> + 'static) -> Self {
        self.number = Some(Rc::new(convert));
        self
    }

    /// Accept booleans.
    pub fn on_bool(mut self, convert: impl Fn(bool) -> Result<V, Rejection> + 'static) -> Self {
        self.boolean = Some(Rc::new(convert));
        self
    }

    /// Accept `null`.
    pub fn on_null(mut self, convert: impl Fn() -> Result<V, Rejection> + 'static) -> Self {
        self.null = Some(Rc::new(move |()| convert()));
        self
    }

    /// Accept `null` as `value`.
    pub fn with_null(self, value: V) -> Self
    where
        V: Clone,
    {
        self.on_null(move || Ok(value.clone()))
    }

    /// The kinds this reader has a callback for.
    pub fn accepts(&self) -> Kinds {
        let mut kinds = Kinds::NONE;
        let slots = [
            (self.text.is_some(), ValueKind::Text),
            (self.number.is_some(), ValueKind::Number),
            (self.boolean.is_some(), ValueKind::Boolean),
            (self.null.is_some(), ValueKind::Null),
            (self.array.is_some(), ValueKind::Array),
            (self.object.is_some(), ValueKind::Object),
        ];
        for (present, kind) in slots {
            if present {
                kinds = kinds.with(kind);
            }
        }
        kinds
    }

    /// Convert every value this reader produces, possibly refusing it.
    pub fn try_map<U: 'static>(self, convert: impl Fn(V) -> Result<U, Rejection> + 'static) -> Reader<U> {
        let then: Rc<dyn Fn(V) -> Result<U, Rejection>> = Rc::new(convert);
        Reader {
            text: self.text.map(|inner| chain(inner, then.clone())),
            number: self.number.map(|inner| chain(inner, then.clone())),
            boolean: self.boolean.map(|inner| chain(inner, then.clone())),
            null: self.null.map(|inner| chain(inner, then.clone())),
            array: self.array.map(|inner| chain_nested(inner, then.clone())),
            object: self.object.map(|inner| chain_nested(inner, then.clone())),
        }
    }

    /// Convert every value this reader produces.
    pub fn map<U: 'static>(self, convert: impl Fn(V) -> U + 'static) -> Reader<U> {
        self.try_map(move |value| Ok(convert(value)))
    }

    /// Union with `other`: kinds this reader has no callback for are taken
    /// from `other`. Where both accept a kind, this reader wins.
    pub fn or(self, other: Reader<V>) -> Self {
        Self {
            text: self.text.or(other.text),
            number: self.number.or(other.number),
            boolean: self.boolean.or(other.boolean),
            null: self.null.or(other.null),
            array: self.array.or(other.array),
            object: self.object.or(other.object),
        }
    }
}

/// Outcome of offering one value token to a [`Reader`].
pub(crate) enum Read<V> {
    /// A scalar was converted.
    Done(V),
    /// A container opened; `close` converts what `frame` produces.
    Opened {
        frame: Box<dyn Frame>,
        close: Convert<Box<dyn Any>, V>,
    },
}

impl<V: 'static> Reader<V> {
    fn mismatch(&self, got: TokenKind) -> ParseErrorKind {
        ParseErrorKind::TypeMismatch {
            expected: Cow::Owned(self.accepts().to_string()),
            got,
        }
    }

    fn open(&self, nested: Option<&Nested<V>>, got: TokenKind, options: &ParseOptions) -> Result<Read<V>, ParseErrorKind> {
        match nested {
            Some(nested) => Ok(Read::Opened {
                frame: (nested.open)(options)?,
                close: nested.close.clone(),
            }),
            None => Err(self.mismatch(got)),
        }
    }

    /// Pick the callback for `token` and run it.
    pub(crate) fn read(&self, token: Token<'_>, options: &ParseOptions) -> Result<Read<V>, ParseErrorKind> {
        let got = token.kind();
        let converted = match token {
            Token::Text(text) => self.text.as_ref().map(|convert| convert(text.into_owned())),
            Token::Integer(value) => self.number.as_ref().map(|convert| convert(Number::Integer(value))),
            Token::Real(value) => self.number.as_ref().map(|convert| convert(Number::Real(value))),
            Token::Boolean(value) => self.boolean.as_ref().map(|convert| convert(value)),
            Token::Null => self.null.as_ref().map(|convert| convert(())),
            Token::ArrayStart => return self.open(self.array.as_ref(), got, options),
            Token::ObjectStart => return self.open(self.object.as_ref(), got, options),
            Token::Key(_) | Token::ArrayEnd | Token::ObjectEnd => {
                return Err(ParseErrorKind::MalformedStructure { expected: "a value", got });
            }
        };
        match converted {
            Some(Ok(value)) => Ok(Read::Done(value)),
            Some(Err(rejection)) => Err(ParseErrorKind::TypeMismatch {
                expected: Cow::Borrowed(rejection.description()),
                got,
            }),
            None => Err(self.mismatch(got)),
        }
    }
}

impl<V: 'static> Reader<Vec<V>> {
    /// Read an array whose elements all go through `element`.
    pub fn array_with(element: Reader<V>) -> Self {
        Reader {
            array: Some(Nested {
                open: Rc::new(move |_: &ParseOptions| Ok(ArrayFrame::open(element.clone()))),
                close: Rc::new(downcast::<Vec<V>>),
            }),
            ..Reader::default()
        }
    }
}

impl<E: FieldValue> Reader<Vec<E>> {
    /// Read an array of `E`. The element reader is created when the array
    /// opens, so recursive element types are fine.
    pub fn array() -> Self {
        Reader {
            array: Some(Nested {
                open: Rc::new(|_: &ParseOptions| Ok(ArrayFrame::open(E::reader()))),
                close: Rc::new(downcast::<Vec<E>>),
            }),
            ..Reader::default()
        }
    }
}

impl<T: Composable> Reader<T> {
    /// Read an object through `T`'s field registry.
    pub fn object() -> Self {
        Reader {
            object: Some(Nested {
                open: Rc::new(ObjectFrame::<T>::open),
                close: Rc::new(downcast::<T>),
            }),
            ..Reader::default()
        }
    }
}

impl Reader<FreeObject> {
    /// Read any object, keeping every member.
    pub fn free_object() -> Self {
        Reader {
            object: Some(Nested {
                open: Rc::new(|options: &ParseOptions| Ok(FreeObjectFrame::open(options))),
                close: Rc::new(downcast::<FreeObject>),
            }),
            ..Reader::default()
        }
    }
}

impl Reader<JsonValue> {
    /// Read any value at all into the tagged value model.
    pub fn any() -> Self {
        let array = Nested {
            open: Rc::new(|_: &ParseOptions| Ok(ArrayFrame::open(Reader::<JsonValue>::any()))),
            close: Rc::new(|produced: Box<dyn Any>| downcast::<Vec<JsonValue>>(produced).map(JsonValue::Sequence)),
        };
        Reader::new()
            .on_text(|text| Ok(JsonValue::Text(text)))
            .on_number(|number| Ok(number.into()))
            .on_bool(|value| Ok(JsonValue::Boolean(value)))
            .on_null(|| Ok(JsonValue::Null))
            .or(Reader {
                array: Some(array),
                ..Reader::default()
            })
            .or(Reader::free_object().map(JsonValue::from))
    }
}

/// A type that can be stored in a field: it knows how to be read from tokens
/// and how to write itself back.
///
/// Composable types get this through [`object_value!`](crate::object_value).
pub trait FieldValue: 'static {
    /// How tokens become a `Self`.
    fn reader() -> Reader<Self>
    where
        Self: Sized;

    /// Emit `self` as exactly one value.
    fn write(&self, sink: &mut dyn TokenSink);
}

impl FieldValue for String {
    fn reader() -> Reader<Self> {
        Reader::new().on_text(Ok)
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.text(self);
    }
}

impl FieldValue for bool {
    fn reader() -> Reader<Self> {
        Reader::new().on_bool(Ok)
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.boolean(*self);
    }
}

impl FieldValue for i64 {
    fn reader() -> Reader<Self> {
        Reader::new().on_number(|number| number.as_i64().ok_or(Rejection::expected("integer")))
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.integer(*self);
    }
}

impl FieldValue for i32 {
    fn reader() -> Reader<Self> {
        Reader::new().on_number(|number| {
            number
                .as_i64()
                .and_then(|value| i32::try_from(value).ok())
                .ok_or(Rejection::expected("32-bit integer"))
        })
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.integer(i64::from(*self));
    }
}

impl FieldValue for u32 {
    fn reader() -> Reader<Self> {
        Reader::new().on_number(|number| {
            number
                .as_i64()
                .and_then(|value| u32::try_from(value).ok())
                .ok_or(Rejection::expected("unsigned 32-bit integer"))
        })
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.integer(i64::from(*self));
    }
}

/// Only floating literals are accepted: an integer literal in a real-typed
/// field is a mismatch, so integer/real distinctions survive a round trip.
impl FieldValue for f64 {
    fn reader() -> Reader<Self> {
        Reader::new().on_number(|number| match number {
            Number::Real(value) => Ok(value),
            Number::Integer(_) => Err(Rejection::expected("real number")),
        })
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.real(*self);
    }
}

impl FieldValue for Number {
    fn reader() -> Reader<Self> {
        Reader::new().on_number(Ok)
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        match *self {
            Number::Integer(value) => sink.integer(value),
            Number::Real(value) => sink.real(value),
        }
    }
}

impl FieldValue for JsonValue {
    fn reader() -> Reader<Self> {
        Reader::any()
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        JsonValue::write(self, sink);
    }
}

impl FieldValue for FreeObject {
    fn reader() -> Reader<Self> {
        Reader::free_object()
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        self.write_object(sink);
    }
}

impl<E: FieldValue> FieldValue for Vec<E> {
    fn reader() -> Reader<Self> {
        Reader::array()
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.begin_array();
        for item in self {
            item.write(sink);
        }
        sink.end_array();
    }
}

/// `null` reads as `None` even when `V` itself accepts `null`.
impl<V: FieldValue> FieldValue for Option<V> {
    fn reader() -> Reader<Self> {
        Reader::new().on_null(|| Ok(None)).or(V::reader().map(Some))
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        match self {
            Some(value) => value.write(sink),
            None => sink.null(),
        }
    }
}

impl<V: FieldValue> FieldValue for Box<V> {
    fn reader() -> Reader<Self> {
        V::reader().map(Box::new)
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        (**self).write(sink);
    }
}
