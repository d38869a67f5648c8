#![forbid(unsafe_code)]

//! Dynamic values stored in a capsule.
//!
//! Every capsule property holds a [`Value`]: a tagged union over the kinds
//! the container can validate (text, numbers, booleans, lists, records) plus
//! the kinds only a wildcard-typed property admits (callables, class
//! instances, `Null`).
//!
//! # Invariants
//!
//! 1. `Value::kind()` is total and constant-time.
//! 2. `Clone` is shallow for `Func` and `Instance` (shared `Rc` payload);
//!    equality for those kinds is payload identity, not structure.
//! 3. `Null` is the unset marker: a declared property that has never been
//!    assigned and has no default reads as `Null`.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::class::Instance;

/// A callable value.
///
/// Wraps a shared closure over positional [`Value`] arguments. Admitted only
/// by wildcard-typed properties; none of the built-in validators accept it.
#[derive(Clone)]
pub struct NativeFn(Rc<dyn Fn(&[Value]) -> Value>);

impl NativeFn {
    pub fn new(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the wrapped closure.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn(@{:p})", Rc::as_ptr(&self.0))
    }
}

impl PartialEq for NativeFn {
    /// Two handles are equal iff they share the same underlying closure.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The unset marker. Rejected by every built-in validator; only a
    /// wildcard-typed property can be assigned `Null` explicitly.
    #[default]
    Null,
    /// A character-sequence value.
    Text(String),
    /// A numeric value. Finiteness is a validator concern, not a
    /// representation concern.
    Number(f64),
    /// A two-valued boolean.
    Bool(bool),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A plain key-value record. Distinct from [`Value::List`] even though
    /// both are composite.
    Record(BTreeMap<String, Value>),
    /// A callable value.
    Func(NativeFn),
    /// An instance of a user- or library-defined class.
    Instance(Instance),
}

/// Flat mirror of the [`Value`] variants, used for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Text,
    Number,
    Bool,
    List,
    Record,
    Func,
    Instance,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Text => "text",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Record => "record",
            Self::Func => "function",
            Self::Instance => "instance",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Build a text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Build a record value from key/value pairs.
    #[must_use]
    pub fn record<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a callable value.
    #[must_use]
    pub fn func(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self::Func(NativeFn::new(f))
    }

    /// The kind tag for this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Text(_) => ValueKind::Text,
            Self::Number(_) => ValueKind::Number,
            Self::Bool(_) => ValueKind::Bool,
            Self::List(_) => ValueKind::List,
            Self::Record(_) => ValueKind::Record,
            Self::Func(_) => ValueKind::Func,
            Self::Instance(_) => ValueKind::Instance,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Record(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_func(&self) -> Option<&NativeFn> {
        match self {
            Self::Func(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(inst) => Some(inst),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Record(map)
    }
}

impl From<NativeFn> for Value {
    fn from(f: NativeFn) -> Self {
        Self::Func(f)
    }
}

impl From<Instance> for Value {
    fn from(inst: Instance) -> Self {
        Self::Instance(inst)
    }
}
