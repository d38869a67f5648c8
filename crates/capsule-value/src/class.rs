#![forbid(unsafe_code)]

//! Class descriptors and type-erased instances.
//!
//! A [`Class`] is a reference-counted descriptor with a name and an optional
//! parent. An [`Instance`] pairs a class handle with an opaque payload. The
//! instance-of relationship walks the parent chain, so an instance of a
//! subclass satisfies a check against any ancestor class.
//!
//! Identity is descriptor identity: two classes created independently are
//! distinct even when their names collide. Clones of one handle refer to the
//! same class.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct ClassInner {
    name: String,
    parent: Option<Class>,
}

/// A class descriptor, usable as the class arm of a type token.
#[derive(Debug, Clone)]
pub struct Class {
    inner: Rc<ClassInner>,
}

impl Class {
    /// Create a new root class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ClassInner {
                name: name.into(),
                parent: None,
            }),
        }
    }

    /// Create a class whose parent is `self`.
    #[must_use]
    pub fn subclass(&self, name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ClassInner {
                name: name.into(),
                parent: Some(self.clone()),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Class> {
        self.inner.parent.as_ref()
    }

    /// Whether `self` is `ancestor` or a transitive subclass of it.
    #[must_use]
    pub fn is(&self, ancestor: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if Rc::ptr_eq(&class.inner, &ancestor.inner) {
                return true;
            }
            current = class.parent();
        }
        false
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An instance of a [`Class`] carrying a type-erased payload.
#[derive(Clone)]
pub struct Instance {
    class: Class,
    payload: Rc<dyn Any>,
}

impl Instance {
    /// Wrap `payload` as an instance of `class`.
    #[must_use]
    pub fn new(class: &Class, payload: impl Any) -> Self {
        Self {
            class: class.clone(),
            payload: Rc::new(payload),
        }
    }

    #[must_use]
    pub fn class(&self) -> &Class {
        &self.class
    }

    /// Instance-of check against `class` or any of its subclasses.
    #[must_use]
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.class.is(class)
    }

    /// Borrow the payload as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Instance {
    /// Two handles are equal iff they share the same underlying payload.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.payload), Rc::as_ptr(&other.payload))
    }
}
