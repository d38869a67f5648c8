#![forbid(unsafe_code)]

//! Type tokens: the declared constraint for a capsule property.

use std::fmt;

use capsule_value::Class;

/// What kind of value a property accepts.
///
/// Five built-in markers, a wildcard, and an open-ended class arm. The
/// wildcard admits anything — callables, class instances, `Null` — and is
/// the declared type for callback-valued or otherwise unconstrained
/// properties.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeToken {
    /// Character-sequence values.
    Text,
    /// Finite numeric values.
    Number,
    /// Two-valued booleans.
    Bool,
    /// Ordered sequence containers.
    List,
    /// Plain key-value records (ordered sequences excluded).
    Record,
    /// No constraint.
    Any,
    /// Instances of the referenced class or any subclass of it.
    Class(Class),
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Number => f.write_str("number"),
            Self::Bool => f.write_str("bool"),
            Self::List => f.write_str("list"),
            Self::Record => f.write_str("record"),
            Self::Any => f.write_str("any"),
            Self::Class(class) => write!(f, "class {}", class.name()),
        }
    }
}
