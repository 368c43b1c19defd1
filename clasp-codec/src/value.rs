//! The tagged value model used for free-form fields and heterogeneous arrays.
//!
//! Typed messages never go through [`JsonValue`]; it only appears where a
//! protocol declares a field as "any" (or an array whose elements have no
//! common type). Objects found in such positions are kept as
//! [`FreeObject`]s, an insertion-ordered map, while objects placed there by
//! application code may be typed [`Composable`](crate::Composable) values.
//! Both kinds sit behind [`ObjectRef`] and compare structurally.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use indexmap::IndexMap;

use crate::{Composable, TokenSink};

/// A JSON number that remembers how it was written.
///
/// An integer literal stays an integer and a floating literal stays a
/// float through any number of parse/write cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Written without fraction or exponent.
    Integer(i64),
    /// Written with a fraction or exponent.
    Real(f64),
}

impl Number {
    /// The integer payload, if this is an integer.
    pub const fn as_i64(self) -> Option<i64> {
        match self {
            Number::Integer(value) => Some(value),
            Number::Real(_) => None,
        }
    }

    /// The numeric value as a float, whatever its tag.
    pub const fn as_f64(self) -> f64 {
        match self {
            Number::Integer(value) => value as f64,
            Number::Real(value) => value,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{value}"),
            Number::Real(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Real(value)
    }
}

/// Any JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// A string.
    Text(String),
    /// An integer literal.
    Integer(i64),
    /// A floating literal.
    Real(f64),
    /// `true` / `false`.
    Boolean(bool),
    /// `null`.
    Null,
    /// An array whose elements may be of any kind.
    Sequence(Vec<JsonValue>),
    /// An object, typed or free-form.
    Object(ObjectRef),
}

impl JsonValue {
    /// Wrap a typed object.
    pub fn object<T>(value: T) -> Self
    where
        T: Composable + Clone + fmt::Debug,
    {
        JsonValue::Object(ObjectRef::new(value))
    }

    /// The string payload, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number.
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            JsonValue::Integer(value) => Some(Number::Integer(*value)),
            JsonValue::Real(value) => Some(Number::Real(*value)),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether this is `null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// The elements, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The object, if this is one.
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            JsonValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Emit this value, recursing into sequences and objects.
    pub fn write(&self, sink: &mut dyn TokenSink) {
        match self {
            JsonValue::Text(text) => sink.text(text),
            JsonValue::Integer(value) => sink.integer(*value),
            JsonValue::Real(value) => sink.real(*value),
            JsonValue::Boolean(value) => sink.boolean(*value),
            JsonValue::Null => sink.null(),
            JsonValue::Sequence(items) => {
                sink.begin_array();
                for item in items {
                    item.write(sink);
                }
                sink.end_array();
            }
            JsonValue::Object(object) => object.write(sink),
        }
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::Text(value.into())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::Text(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Integer(value)
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Real(value)
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Boolean(value)
    }
}

impl From<Number> for JsonValue {
    fn from(value: Number) -> Self {
        match value {
            Number::Integer(value) => JsonValue::Integer(value),
            Number::Real(value) => JsonValue::Real(value),
        }
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Sequence(items)
    }
}

impl From<FreeObject> for JsonValue {
    fn from(object: FreeObject) -> Self {
        JsonValue::Object(ObjectRef::free(object))
    }
}

/// Object-safe view of a value that serializes as a JSON object.
///
/// Implemented for [`FreeObject`] and, through [`ObjectRef::new`], for any
/// [`Composable`] type that is also `Clone + Debug`.
pub trait ObjectValue: Any + fmt::Debug {
    /// Emit the object, braces included.
    fn write_object(&self, sink: &mut dyn TokenSink);

    /// Clone behind the trait object.
    fn clone_object(&self) -> Box<dyn ObjectValue>;

    /// Human-readable name of the concrete type.
    fn type_name(&self) -> &'static str;

    /// Borrow as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert into `Any` for downcasting by value.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

struct Typed<T>(T);

impl<T: fmt::Debug> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> ObjectValue for Typed<T>
where
    T: Composable + Clone + fmt::Debug,
{
    fn write_object(&self, sink: &mut dyn TokenSink) {
        self.0.write_to(sink);
    }

    fn clone_object(&self) -> Box<dyn ObjectValue> {
        Box::new(Typed(self.0.clone()))
    }

    fn type_name(&self) -> &'static str {
        crate::composable::short_type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        Box::new(self.0)
    }
}

/// Owned, type-erased handle to an object stored inside a [`JsonValue`].
///
/// Ownership is exclusive: cloning an `ObjectRef` deep-copies the object.
/// Equality is structural, so a typed object equals the [`FreeObject`]
/// obtained by writing and re-parsing it.
pub struct ObjectRef(Box<dyn ObjectValue>);

impl ObjectRef {
    /// Wrap a typed object.
    pub fn new<T>(value: T) -> Self
    where
        T: Composable + Clone + fmt::Debug,
    {
        ObjectRef(Box::new(Typed(value)))
    }

    /// Wrap a free-form object.
    pub fn free(object: FreeObject) -> Self {
        ObjectRef(Box::new(object))
    }

    /// Wrap any other [`ObjectValue`] implementation.
    pub fn from_boxed(object: Box<dyn ObjectValue>) -> Self {
        ObjectRef(object)
    }

    /// Borrow the object as `T` if that is its concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Name of the concrete type behind the handle.
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Emit the object.
    pub fn write(&self, sink: &mut dyn TokenSink) {
        self.0.write_object(sink);
    }

    /// Structural copy of the object as a free-form map.
    pub fn to_free(&self) -> FreeObject {
        match self.downcast_ref::<FreeObject>() {
            Some(object) => object.clone(),
            None => render_free(self.0.as_ref()),
        }
    }

    /// Convert into a free-form map, reusing the map if it already is one.
    pub fn into_free(self) -> FreeObject {
        if self.0.as_any().is::<FreeObject>() {
            if let Ok(object) = self.0.into_any().downcast::<FreeObject>() {
                return *object;
            }
            return FreeObject::new();
        }
        render_free(self.0.as_ref())
    }
}

fn render_free(object: &dyn ObjectValue) -> FreeObject {
    let mut builder = ValueBuilder::new();
    object.write_object(&mut builder);
    match builder.finish() {
        Some(JsonValue::Object(object)) => object.into_free(),
        _ => FreeObject::new(),
    }
}

impl Clone for ObjectRef {
    fn clone(&self) -> Self {
        ObjectRef(self.0.clone_object())
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.to_free() == other.to_free()
    }
}

/// A JSON object with no declared schema, keeping keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreeObject {
    entries: IndexMap<String, JsonValue>,
}

impl FreeObject {
    /// An empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a member. A replaced member keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a member.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    /// Remove a member, preserving the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.shift_remove(key)
    }

    /// Whether a member exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for FreeObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl ObjectValue for FreeObject {
    fn write_object(&self, sink: &mut dyn TokenSink) {
        sink.begin_object();
        for (key, value) in &self.entries {
            sink.key(key);
            value.write(sink);
        }
        sink.end_object();
    }

    fn clone_object(&self) -> Box<dyn ObjectValue> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        "FreeObject"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

enum Open {
    Array(Vec<JsonValue>),
    Object {
        members: FreeObject,
        key: Option<String>,
    },
}

/// A [`TokenSink`] that materializes what is written into a [`JsonValue`].
///
/// Objects become [`FreeObject`]s. Calls that break the sink protocol (a
/// member value without a key, an unmatched end) are ignored.
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Open>,
    root: Option<JsonValue>,
}

impl ValueBuilder {
    /// A builder with nothing written yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The completed value, or `None` if no value was completed.
    pub fn finish(self) -> Option<JsonValue> {
        if self.stack.is_empty() { self.root } else { None }
    }

    fn push_value(&mut self, value: JsonValue) {
        match self.stack.last_mut() {
            Some(Open::Array(items)) => items.push(value),
            Some(Open::Object { members, key }) => {
                if let Some(key) = key.take() {
                    members.insert(key, value);
                }
            }
            None => self.root = Some(value),
        }
    }
}

impl TokenSink for ValueBuilder {
    fn begin_object(&mut self) {
        self.stack.push(Open::Object {
            members: FreeObject::new(),
            key: None,
        });
    }

    fn key(&mut self, name: &str) {
        if let Some(Open::Object { key, .. }) = self.stack.last_mut() {
            *key = Some(name.into());
        }
    }

    fn end_object(&mut self) {
        if let Some(Open::Object { .. }) = self.stack.last()
            && let Some(Open::Object { members, .. }) = self.stack.pop()
        {
            self.push_value(members.into());
        }
    }

    fn begin_array(&mut self) {
        self.stack.push(Open::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        if let Some(Open::Array(_)) = self.stack.last()
            && let Some(Open::Array(items)) = self.stack.pop()
        {
            self.push_value(JsonValue::Sequence(items));
        }
    }

    fn text(&mut self, value: &str) {
        self.push_value(JsonValue::Text(value.into()));
    }

    fn integer(&mut self, value: i64) {
        self.push_value(JsonValue::Integer(value));
    }

    fn real(&mut self, value: f64) {
        self.push_value(JsonValue::Real(value));
    }

    fn boolean(&mut self, value: bool) {
        self.push_value(JsonValue::Boolean(value));
    }

    fn null(&mut self) {
        self.push_value(JsonValue::Null);
    }
}
