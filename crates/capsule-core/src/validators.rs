#![forbid(unsafe_code)]

//! Built-in validation predicates and the class-validator factory.
//!
//! Each built-in kind exposes a single predicate `fn(&Value) -> bool`; the
//! class factory produces a predicate closed over a class descriptor. The
//! resolver is agnostic to how many kinds exist — it depends only on this
//! shape.
//!
//! All built-in predicates reject `Null` and callables; those pass only
//! under the wildcard token.

use std::rc::Rc;

use capsule_value::{Class, Value};

/// A resolved validation predicate, cached per property for the lifetime of
/// its container.
pub type Validator = Rc<dyn Fn(&Value) -> bool>;

/// Character-sequence values.
#[must_use]
pub fn is_text(value: &Value) -> bool {
    matches!(value, Value::Text(_))
}

/// Finite numeric values. NaN and the infinities are not storable numbers.
#[must_use]
pub fn is_number(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_finite())
}

/// Two-valued booleans.
#[must_use]
pub fn is_bool(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

/// Ordered sequence containers.
#[must_use]
pub fn is_list(value: &Value) -> bool {
    matches!(value, Value::List(_))
}

/// Plain key-value records. Lists are composite too but must not pass here.
#[must_use]
pub fn is_record(value: &Value) -> bool {
    matches!(value, Value::Record(_))
}

/// Factory for class validators: true iff the value is an instance of
/// `class` or of a subclass.
#[must_use]
pub fn instance_check(class: &Class) -> Validator {
    let class = class.clone();
    Rc::new(move |value| match value {
        Value::Instance(instance) => instance.is_instance_of(&class),
        _ => false,
    })
}
