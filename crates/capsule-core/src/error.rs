#![forbid(unsafe_code)]

//! Error taxonomy for capsule operations.
//!
//! Three families, all surfaced synchronously and never recovered
//! internally:
//!
//! - shape violations ([`CapsuleError::UnknownProperty`]): an operation
//!   addressed a name outside the frozen property set;
//! - type mismatches ([`CapsuleError::TypeMismatch`]): a write whose value
//!   failed the property's validator — the store is left untouched;
//! - schema defects ([`CapsuleError::InvalidDefault`],
//!   [`CapsuleError::DuplicateProperty`]): construction-time only, fatal,
//!   since they indicate a broken schema rather than a bad runtime input.

use capsule_value::{Value, ValueKind};
use thiserror::Error;

use crate::token::TypeToken;

pub type Result<T> = std::result::Result<T, CapsuleError>;

#[derive(Debug, Error)]
pub enum CapsuleError {
    /// The property set is fixed at construction; this name is not in it.
    #[error("no declared property `{property}`; the capsule shape is frozen")]
    UnknownProperty { property: String },

    /// A write failed validation. Carries the rejected value so ownership
    /// returns to the caller.
    #[error("trying to set `{property}` ({expected}) to a {actual} value")]
    TypeMismatch {
        property: String,
        expected: TypeToken,
        actual: ValueKind,
        value: Value,
    },

    /// A declared default failed its own validator.
    #[error("default for `{property}` ({expected}) is a {actual} value")]
    InvalidDefault {
        property: String,
        expected: TypeToken,
        actual: ValueKind,
    },

    /// The same name was declared twice in one schema.
    #[error("property `{property}` declared more than once")]
    DuplicateProperty { property: String },
}

impl CapsuleError {
    #[must_use]
    pub fn unknown(property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            property: property.into(),
        }
    }

    /// Whether this error is a construction-time schema defect.
    #[must_use]
    pub fn is_schema_defect(&self) -> bool {
        matches!(
            self,
            Self::InvalidDefault { .. } | Self::DuplicateProperty { .. }
        )
    }
}
