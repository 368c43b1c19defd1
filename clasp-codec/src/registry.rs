//! Field declarations and the per-type registry built from them.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::cell::RefCell;
use core::fmt;
use std::collections::HashMap;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::composable::short_type_name;
use crate::{Composable, CompositionError, FieldSetter, FieldValue, TokenSink};

/// Whether a field must appear in every well-formed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The object is rejected if the key is absent.
    Required,
    /// The key may be absent; absence is kept and the field is omitted on write.
    Optional,
}

type Emit<T> = Rc<dyn Fn(&T, &mut dyn TokenSink)>;
type Check<T> = Rc<dyn Fn(&T) -> bool>;

pub(crate) struct FieldDecl<T> {
    pub(crate) name: &'static str,
    pub(crate) presence: Presence,
    pub(crate) setter: FieldSetter<T>,
    /// Writes key and value, or nothing when an optional field is absent.
    pub(crate) emit: Emit<T>,
}

impl<T: 'static> FieldDecl<T> {
    fn project<U: 'static>(self, get: fn(&U) -> &T, get_mut: fn(&mut U) -> &mut T) -> FieldDecl<U> {
        let emit = self.emit;
        FieldDecl {
            name: self.name,
            presence: self.presence,
            setter: self.setter.project(get_mut),
            emit: Rc::new(move |owner: &U, sink: &mut dyn TokenSink| emit(get(owner), sink)),
        }
    }
}

/// Ordered field declarations for `T`, filled in by
/// [`Composable::declare`].
///
/// Mixins are declared through [`Fields::mixin`], which splices the mixin's
/// own declarations in place. Declaration order is write order.
pub struct Fields<T> {
    decls: Vec<FieldDecl<T>>,
    /// `is_valid` hooks of every spliced mixin, innermost first.
    checks: Vec<Check<T>>,
}

impl<T> Default for Fields<T> {
    fn default() -> Self {
        Self {
            decls: Vec::new(),
            checks: Vec::new(),
        }
    }
}

impl<T: 'static> Fields<T> {
    /// No declarations yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The declarations of `T`'s [`Composable::declare`].
    pub fn of() -> Self
    where
        T: Composable,
    {
        let mut fields = Self::new();
        T::declare(&mut fields);
        fields
    }

    /// Declare a field that must be present.
    ///
    /// With `V = Option<X>` the field is nullable: it must be present, may be
    /// `null`, and writes `null` for `None`.
    pub fn required<V: FieldValue>(&mut self, name: &'static str, get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> &mut Self {
        self.decls.push(FieldDecl {
            name,
            presence: Presence::Required,
            setter: FieldSetter::from_reader(V::reader(), move |owner: &mut T, value| *get_mut(owner) = value),
            emit: Rc::new(move |owner: &T, sink: &mut dyn TokenSink| {
                sink.key(name);
                get(owner).write(sink);
            }),
        });
        self
    }

    /// Declare a field that may be absent. Absent fields are not written.
    pub fn optional<V: FieldValue>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &Option<V>,
        get_mut: fn(&mut T) -> &mut Option<V>,
    ) -> &mut Self {
        self.decls.push(FieldDecl {
            name,
            presence: Presence::Optional,
            setter: FieldSetter::from_reader(V::reader(), move |owner: &mut T, value| *get_mut(owner) = Some(value)),
            emit: Rc::new(move |owner: &T, sink: &mut dyn TokenSink| {
                if let Some(value) = get(owner) {
                    sink.key(name);
                    value.write(sink);
                }
            }),
        });
        self
    }

    /// Splice in every field of the mixin `M`, reached through the given
    /// projections.
    ///
    /// `M::is_valid` (and that of any mixin `M` composes) still runs: it is
    /// checked on the projected part when an object of `T` closes, before
    /// `T::is_valid`.
    pub fn mixin<M: Composable>(&mut self, get: fn(&T) -> &M, get_mut: fn(&mut T) -> &mut M) -> &mut Self {
        let mixin = Fields::<M>::of();
        for decl in mixin.decls {
            self.decls.push(decl.project(get, get_mut));
        }
        for check in mixin.checks {
            self.checks.push(Rc::new(move |owner: &T| check(get(owner))));
        }
        self.checks.push(Rc::new(move |owner: &T| get(owner).is_valid()));
        self
    }

    /// Declared wire names, in order. Repeats are kept.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decls.iter().map(|decl| decl.name)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

struct Slot<T> {
    name: &'static str,
    presence: Presence,
    setter: FieldSetter<T>,
    emit: Emit<T>,
}

/// Name-indexed view of a type's declarations, used to parse and to write
/// its objects.
///
/// [`FieldRegistry::shared`] builds and checks it once per type and
/// thread; every object of that type is then read and written through the
/// same table. Per-object state (which fields were seen) lives in the parse
/// frame, for one object's span.
pub struct FieldRegistry<T> {
    type_name: &'static str,
    slots: IndexMap<&'static str, Slot<T>>,
    checks: Vec<Check<T>>,
}

thread_local! {
    /// `TypeId` of `T` to its `Result<Rc<FieldRegistry<T>>, CompositionError>`.
    static REGISTRIES: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

impl<T> fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("type_name", &self.type_name)
            .field("fields", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Composable> FieldRegistry<T> {
    /// Collect `T`'s declarations, mixins included, into a fresh registry.
    pub fn build() -> Result<Self, CompositionError> {
        Self::from_fields(Fields::of())
    }

    /// `T`'s registry, built on first use on this thread and reused after.
    /// A composition error is cached too, and returned to every caller.
    pub fn shared() -> Result<Rc<Self>, CompositionError> {
        let key = TypeId::of::<T>();
        let cached = REGISTRIES.with(|cache| cache.borrow().get(&key).cloned());
        let entry = match cached {
            Some(entry) => entry,
            None => {
                crate::trace!(type_name = short_type_name::<T>(), "building registry");
                let entry: Rc<dyn Any> = Rc::new(Self::build().map(Rc::new));
                REGISTRIES.with(|cache| cache.borrow_mut().insert(key, entry.clone()));
                entry
            }
        };
        match entry.downcast_ref::<Result<Rc<Self>, CompositionError>>() {
            Some(result) => result.clone(),
            None => Self::build().map(Rc::new),
        }
    }
}

impl<T: 'static> FieldRegistry<T> {
    /// Index a set of declarations by name. A name declared twice, whether
    /// by two mixins or by a mixin and the type itself, is an error.
    pub fn from_fields(fields: Fields<T>) -> Result<Self, CompositionError> {
        let type_name = short_type_name::<T>();
        let mut slots = IndexMap::with_capacity(fields.len());
        for decl in fields.decls {
            match slots.entry(decl.name) {
                Entry::Occupied(_) => {
                    crate::debug!(field = decl.name, type_name, "field declared twice");
                    return Err(CompositionError::DuplicateField {
                        field: decl.name,
                        type_name,
                    });
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(Slot {
                        name: decl.name,
                        presence: decl.presence,
                        setter: decl.setter,
                        emit: decl.emit,
                    });
                }
            }
        }
        Ok(Self {
            type_name,
            slots,
            checks: fields.checks,
        })
    }
}

impl<T: Composable> FieldRegistry<T> {
    /// Emit `owner` as an object, fields in declaration order.
    pub(crate) fn write(&self, owner: &T, sink: &mut dyn TokenSink) {
        sink.begin_object();
        for slot in self.slots.values() {
            (slot.emit)(owner, sink);
        }
        sink.end_object();
    }

    /// The mixins' `is_valid` hooks, then `T`'s own.
    pub(crate) fn is_valid(&self, owner: &T) -> bool {
        self.checks.iter().all(|check| check(owner)) && owner.is_valid()
    }
}

impl<T> FieldRegistry<T> {
    /// Short name of the owning type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the type has no fields.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.keys().copied()
    }

    /// Required field names in declaration order.
    pub fn required_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots
            .values()
            .filter(|slot| slot.presence == Presence::Required)
            .map(|slot| slot.name)
    }

    /// Look up a field's setter and presence.
    pub fn get(&self, name: &str) -> Option<(&FieldSetter<T>, Presence)> {
        self.slots.get(name).map(|slot| (&slot.setter, slot.presence))
    }

    /// A declared name similar to `unknown`, for diagnostics.
    pub fn suggest(&self, unknown: &str) -> Option<&'static str> {
        const SIMILARITY_THRESHOLD: f64 = 0.7;

        let mut best: Option<(&'static str, f64)> = None;
        for known in self.slots.keys() {
            let similarity = strsim::jaro_winkler(unknown, known);
            if similarity > SIMILARITY_THRESHOLD && best.is_none_or(|(_, score)| similarity > score) {
                best = Some((*known, similarity));
            }
        }
        best.map(|(known, _)| known)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.get_index_of(name)
    }

    pub(crate) fn name(&self, index: usize) -> &'static str {
        self.slots[index].name
    }

    pub(crate) fn setter(&self, index: usize) -> &FieldSetter<T> {
        &self.slots[index].setter
    }

    /// First required field, in declaration order, whose flag in `seen` is
    /// not set.
    pub(crate) fn first_missing(&self, seen: &[bool]) -> Option<&'static str> {
        self.slots
            .values()
            .zip(seen)
            .find(|(slot, seen)| slot.presence == Presence::Required && !**seen)
            .map(|(slot, _)| slot.name)
    }
}
