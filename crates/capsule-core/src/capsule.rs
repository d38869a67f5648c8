#![forbid(unsafe_code)]

//! The observable, shape-frozen property container.
//!
//! # Architecture
//!
//! `Capsule` uses `Rc<RefCell<..>>` for single-threaded shared ownership
//! (clones are handles to the same store). Each declared property owns a
//! slot: its type token, the validator resolved once at construction, the
//! current value, and an ordered subscriber list.
//!
//! Writes are validate-then-commit-then-notify: a rejected value leaves the
//! slot untouched and fires nothing; an accepted value is committed first
//! and only then are subscribers invoked, in registration order, with the
//! new/old pair. The interior borrow is released before callbacks run, so a
//! subscriber may re-entrantly read or write the capsule.
//!
//! # Invariants
//!
//! 1. The property name set is fixed at construction. No operation adds or
//!    removes a name afterwards; addressing an undeclared name fails with
//!    [`CapsuleError::UnknownProperty`].
//! 2. At every observable point a slot's value satisfies its cached
//!    validator, or the property has never been assigned and reads as
//!    [`Value::Null`].
//! 3. Subscribers fire only after a commit, in registration order, exactly
//!    once per accepted write. Every accepted write notifies, including a
//!    write of a value equal to the stored one.
//! 4. A panicking subscriber unwinds through [`set`](Capsule::set) *after*
//!    the commit; it never rolls the write back.
//!
//! There is no internal locking: concurrent mutation from multiple threads
//! of control must be serialized by the caller (`Rc` keeps the type out of
//! `Send`/`Sync` by construction).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use capsule_value::Value;

use crate::error::{CapsuleError, Result};
use crate::resolver::{Validator, resolve};
use crate::schema::PropertyDecl;
use crate::token::TypeToken;

/// A change callback: receives the committed new value and the previous one.
pub type Subscriber = Rc<dyn Fn(&Value, &Value)>;

struct Slot {
    name: String,
    token: TypeToken,
    validator: Validator,
    value: Value,
    subscribers: Vec<Subscriber>,
}

struct Inner {
    slots: Vec<Slot>,
    index: AHashMap<String, usize>,
}

/// Schema-constrained, observable property container.
///
/// Cloning produces another handle to the **same** store.
#[derive(Clone)]
pub struct Capsule {
    inner: Rc<RefCell<Inner>>,
}

impl Capsule {
    /// Construction entry point, reached through
    /// [`Schema::build`](crate::Schema::build).
    pub(crate) fn from_declarations(declarations: Vec<PropertyDecl>) -> Result<Self> {
        let mut slots = Vec::with_capacity(declarations.len());
        let mut index = AHashMap::with_capacity(declarations.len());

        for decl in declarations {
            if index.contains_key(&decl.name) {
                return Err(CapsuleError::DuplicateProperty {
                    property: decl.name,
                });
            }
            let validator = resolve(&decl.token);
            let value = match decl.default {
                Some(default) => {
                    if !validator(&default) {
                        return Err(CapsuleError::InvalidDefault {
                            property: decl.name,
                            expected: decl.token,
                            actual: default.kind(),
                        });
                    }
                    default
                }
                None => Value::Null,
            };
            index.insert(decl.name.clone(), slots.len());
            slots.push(Slot {
                name: decl.name,
                token: decl.token,
                validator,
                value,
                subscribers: Vec::new(),
            });
        }

        Ok(Self {
            inner: Rc::new(RefCell::new(Inner { slots, index })),
        })
    }

    /// Read the current value of a declared property.
    ///
    /// A property that has never been assigned and has no default reads as
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// [`CapsuleError::UnknownProperty`] if `name` is not declared.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.with(name, Value::clone)
    }

    /// Read a declared property by reference, without cloning.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::UnknownProperty`] if `name` is not declared.
    pub fn with<R>(&self, name: &str, f: impl FnOnce(&Value) -> R) -> Result<R> {
        let inner = self.inner.borrow();
        let idx = Self::slot_index(&inner, name)?;
        Ok(f(&inner.slots[idx].value))
    }

    /// Write a declared property.
    ///
    /// The value runs through the validator cached for the property at
    /// construction. On success the value is committed and every subscriber
    /// for the property is invoked synchronously, in registration order,
    /// with `(new, old)`. On failure nothing is stored and nothing fires.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::UnknownProperty`] if `name` is not declared (the
    /// shape is frozen; no property is created), or
    /// [`CapsuleError::TypeMismatch`] if the value fails validation — the
    /// rejected value rides back to the caller inside the error.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let (old, subscribers) = {
            let mut inner = self.inner.borrow_mut();
            let idx = Self::slot_index(&inner, name)?;
            let slot = &mut inner.slots[idx];

            if !(slot.validator)(&value) {
                tracing::debug!(
                    property = %slot.name,
                    expected = %slot.token,
                    actual = %value.kind(),
                    "write rejected"
                );
                return Err(CapsuleError::TypeMismatch {
                    property: slot.name.clone(),
                    expected: slot.token.clone(),
                    actual: value.kind(),
                    value,
                });
            }

            tracing::trace!(property = %slot.name, "write committed");
            if slot.subscribers.is_empty() {
                slot.value = value;
                return Ok(());
            }
            let old = std::mem::replace(&mut slot.value, value.clone());
            (old, slot.subscribers.clone())
        };

        // Borrow released: subscribers may re-enter the capsule.
        for subscriber in &subscribers {
            subscriber(&value, &old);
        }
        Ok(())
    }

    /// Register a change callback for a declared property.
    ///
    /// Callbacks fire in registration order; duplicates are allowed and
    /// fire once per registration. A callback registered while a
    /// notification for the same property is in flight first fires on the
    /// next write.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::UnknownProperty`] if `name` is not declared.
    pub fn subscribe(&self, name: &str, callback: impl Fn(&Value, &Value) + 'static) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let idx = Self::slot_index(&inner, name)?;
        inner.slots[idx].subscribers.push(Rc::new(callback));
        Ok(())
    }

    /// Drop **all** subscribers for a declared property.
    ///
    /// Deliberately coarse-grained: [`subscribe`](Capsule::subscribe) hands
    /// out no removal token, so the whole list is the unit of removal.
    /// Clearing a property with no subscribers is a no-op.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::UnknownProperty`] if `name` is not declared.
    pub fn unsubscribe(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let idx = Self::slot_index(&inner, name)?;
        inner.slots[idx].subscribers.clear();
        Ok(())
    }

    /// Declared property names, in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let inner = self.inner.borrow();
        inner.slots.iter().map(|slot| slot.name.clone()).collect()
    }

    /// Whether `name` is a declared property.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().index.contains_key(name)
    }

    /// The type token a property was declared with.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::UnknownProperty`] if `name` is not declared.
    pub fn declared_type(&self, name: &str) -> Result<TypeToken> {
        let inner = self.inner.borrow();
        let idx = Self::slot_index(&inner, name)?;
        Ok(inner.slots[idx].token.clone())
    }

    /// Number of callbacks currently registered for a property.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::UnknownProperty`] if `name` is not declared.
    pub fn subscriber_count(&self, name: &str) -> Result<usize> {
        let inner = self.inner.borrow();
        let idx = Self::slot_index(&inner, name)?;
        Ok(inner.slots[idx].subscribers.len())
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().slots.is_empty()
    }

    fn slot_index(inner: &Inner, name: &str) -> Result<usize> {
        inner
            .index
            .get(name)
            .copied()
            .ok_or_else(|| CapsuleError::unknown(name))
    }
}

impl fmt::Debug for Capsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut dbg = f.debug_struct("Capsule");
        for slot in &inner.slots {
            dbg.field(&slot.name, &slot.value);
        }
        dbg.finish()
    }
}
