use crate::{FieldRegistry, Fields, TokenSink};

/// A message type assembled from mixins and its own fields.
///
/// ```
/// use clasp_codec::{Composable, Fields};
///
/// #[derive(Default)]
/// struct Position {
///     line: u32,
///     character: u32,
/// }
///
/// impl Composable for Position {
///     fn declare(fields: &mut Fields<Self>) {
///         fields
///             .required("line", |p| &p.line, |p| &mut p.line)
///             .required("character", |p| &p.character, |p| &mut p.character);
///     }
/// }
/// ```
///
/// Parsing starts from `Self::default()` and fills in fields as their keys
/// arrive, so optional fields left untouched keep their default (`None`).
pub trait Composable: Default + 'static {
    /// Declare mixins (first, in composition order) and then own fields.
    fn declare(fields: &mut Fields<Self>);

    /// Extra check run once, after all required fields were seen, when the
    /// object's closing brace arrives. A `false` fails the parse with
    /// [`ParseErrorKind::InvalidObject`](crate::ParseErrorKind::InvalidObject).
    fn is_valid(&self) -> bool {
        true
    }

    /// Emit `self` as one object.
    fn write_to(&self, sink: &mut dyn TokenSink) {
        write_object(self, sink);
    }
}

/// Emit `value` as an object: every present field in declaration order,
/// mixins first.
///
/// # Panics
///
/// If `T`'s declarations clash (see [`FieldRegistry::build`]). Such a type
/// has no valid JSON form, and a token sink cannot report errors.
pub fn write_object<T: Composable>(value: &T, sink: &mut dyn TokenSink) {
    match FieldRegistry::<T>::shared() {
        Ok(registry) => registry.write(value, sink),
        Err(error) => panic!("cannot write `{}`: {error}", short_type_name::<T>()),
    }
}

/// Implement [`FieldValue`](crate::FieldValue) for one or more
/// [`Composable`] types, so they can be used as field types, array
/// elements, and parse targets.
#[macro_export]
macro_rules! object_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {
                fn reader() -> $crate::Reader<Self> {
                    $crate::Reader::object()
                }

                fn write(&self, sink: &mut dyn $crate::TokenSink) {
                    $crate::Composable::write_to(self, sink)
                }
            }
        )+
    };
}

/// `core::any::type_name` without the module path: `Vec<foo::Bar>` rather
/// than `alloc::vec::Vec<foo::Bar>`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = core::any::type_name::<T>();
    let base_end = full.find('<').unwrap_or(full.len());
    let start = full[..base_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}
