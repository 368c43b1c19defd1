use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use crate::frame::Frame;
use crate::reader::{Convert, Nested, OpenFrame};
use crate::{Kinds, Number, ParseErrorKind, ParseOptions, Reader, Rejection, Token, TokenKind, ValueKind};

pub(crate) type Store<T, A> = Rc<dyn Fn(&mut T, A) -> Result<(), Rejection>>;

/// Opens the nested frame for an array or object field, and deposits what
/// the frame produced into the owning value once it closes.
pub(crate) struct Opener<T> {
    open: OpenFrame,
    deposit: Store<T, Box<dyn Any>>,
}

impl<T> Clone for Opener<T> {
    fn clone(&self) -> Self {
        Self {
            open: self.open.clone(),
            deposit: self.deposit.clone(),
        }
    }
}

/// Result of handing one value token to a [`FieldSetter`].
pub(crate) enum Dispatched<T> {
    /// A scalar was converted and stored.
    Stored,
    /// A container opened; `frame` receives its contents and `deposit`
    /// stores the result when it closes.
    Opened {
        frame: Box<dyn Frame>,
        deposit: Store<T, Box<dyn Any>>,
    },
}

/// Per-field dispatch record for an object of type `T`.
///
/// Holds up to six callbacks, one per kind of token that can start a value.
/// Exactly one fires per field occurrence, picked by the observed token;
/// a missing callback is a [`ParseErrorKind::TypeMismatch`], never a silent
/// skip.
pub struct FieldSetter<T> {
    on_text: Option<Store<T, String>>,
    on_number: Option<Store<T, Number>>,
    on_bool: Option<Store<T, bool>>,
    on_null: Option<Store<T, ()>>,
    on_array_start: Option<Opener<T>>,
    on_object_start: Option<Opener<T>>,
}

impl<T> Clone for FieldSetter<T> {
    fn clone(&self) -> Self {
        Self {
            on_text: self.on_text.clone(),
            on_number: self.on_number.clone(),
            on_bool: self.on_bool.clone(),
            on_null: self.on_null.clone(),
            on_array_start: self.on_array_start.clone(),
            on_object_start: self.on_object_start.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for FieldSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldSetter").field(&self.accepts()).finish()
    }
}

fn bind<T: 'static, A: 'static, V: 'static>(
    convert: Convert<A, V>,
    store: Rc<dyn Fn(&mut T, V)>,
) -> Store<T, A> {
    Rc::new(move |target: &mut T, arg: A| {
        let value = convert(arg)?;
        store(target, value);
        Ok(())
    })
}

fn bind_nested<T: 'static, V: 'static>(nested: Nested<V>, store: Rc<dyn Fn(&mut T, V)>) -> Opener<T> {
    Opener {
        open: nested.open,
        deposit: bind(nested.close, store),
    }
}

fn lift<T: 'static, U: 'static, A: 'static>(inner: Store<T, A>, get_mut: fn(&mut U) -> &mut T) -> Store<U, A> {
    Rc::new(move |target: &mut U, arg: A| inner(get_mut(target), arg))
}

fn lift_opener<T: 'static, U: 'static>(inner: Opener<T>, get_mut: fn(&mut U) -> &mut T) -> Opener<U> {
    Opener {
        open: inner.open,
        deposit: lift(inner.deposit, get_mut),
    }
}

impl<T: 'static> FieldSetter<T> {
    /// Bind `reader` to a storage slot: every value it produces is handed
    /// to `store` together with the owning object.
    pub fn from_reader<V: 'static>(reader: Reader<V>, store: impl Fn(&mut T, V) + 'static) -> Self {
        let store: Rc<dyn Fn(&mut T, V)> = Rc::new(store);
        Self {
            on_text: reader.text.map(|convert| bind(convert, store.clone())),
            on_number: reader.number.map(|convert| bind(convert, store.clone())),
            on_bool: reader.boolean.map(|convert| bind(convert, store.clone())),
            on_null: reader.null.map(|convert| bind(convert, store.clone())),
            on_array_start: reader.array.map(|nested| bind_nested(nested, store.clone())),
            on_object_start: reader.object.map(|nested| bind_nested(nested, store.clone())),
        }
    }

    /// Lift a mixin's setter into a type that embeds the mixin.
    pub fn project<U: 'static>(self, get_mut: fn(&mut U) -> &mut T) -> FieldSetter<U> {
        FieldSetter {
            on_text: self.on_text.map(|store| lift(store, get_mut)),
            on_number: self.on_number.map(|store| lift(store, get_mut)),
            on_bool: self.on_bool.map(|store| lift(store, get_mut)),
            on_null: self.on_null.map(|store| lift(store, get_mut)),
            on_array_start: self.on_array_start.map(|opener| lift_opener(opener, get_mut)),
            on_object_start: self.on_object_start.map(|opener| lift_opener(opener, get_mut)),
        }
    }

    /// The kinds of value this setter has a callback for.
    pub fn accepts(&self) -> Kinds {
        let slots = [
            (self.on_text.is_some(), ValueKind::Text),
            (self.on_number.is_some(), ValueKind::Number),
            (self.on_bool.is_some(), ValueKind::Boolean),
            (self.on_null.is_some(), ValueKind::Null),
            (self.on_array_start.is_some(), ValueKind::Array),
            (self.on_object_start.is_some(), ValueKind::Object),
        ];
        slots
            .into_iter()
            .filter(|(present, _)| *present)
            .fold(Kinds::NONE, |kinds, (_, kind)| kinds.with(kind))
    }

    fn mismatch(&self, got: TokenKind) -> ParseErrorKind {
        ParseErrorKind::TypeMismatch {
            expected: Cow::Owned(self.accepts().to_string()),
            got,
        }
    }

    fn open(&self, opener: Option<&Opener<T>>, got: TokenKind, options: &ParseOptions) -> Result<Dispatched<T>, ParseErrorKind> {
        match opener {
            Some(opener) => Ok(Dispatched::Opened {
                frame: (opener.open)(options)?,
                deposit: opener.deposit.clone(),
            }),
            None => Err(self.mismatch(got)),
        }
    }

    /// Route one value token to the callback for its kind.
    pub(crate) fn dispatch(&self, target: &mut T, token: Token<'_>, options: &ParseOptions) -> Result<Dispatched<T>, ParseErrorKind> {
        let got = token.kind();
        let stored = match token {
            Token::Text(text) => self.on_text.as_ref().map(|store| store(target, text.into_owned())),
            Token::Integer(value) => self.on_number.as_ref().map(|store| store(target, Number::Integer(value))),
            Token::Real(value) => self.on_number.as_ref().map(|store| store(target, Number::Real(value))),
            Token::Boolean(value) => self.on_bool.as_ref().map(|store| store(target, value)),
            Token::Null => self.on_null.as_ref().map(|store| store(target, ())),
            Token::ArrayStart => return self.open(self.on_array_start.as_ref(), got, options),
            Token::ObjectStart => return self.open(self.on_object_start.as_ref(), got, options),
            Token::Key(_) | Token::ArrayEnd | Token::ObjectEnd => {
                return Err(ParseErrorKind::MalformedStructure { expected: "a value", got });
            }
        };
        match stored {
            Some(Ok(())) => Ok(Dispatched::Stored),
            Some(Err(rejection)) => Err(ParseErrorKind::TypeMismatch {
                expected: Cow::Borrowed(rejection.description()),
                got,
            }),
            None => Err(self.mismatch(got)),
        }
    }
}
