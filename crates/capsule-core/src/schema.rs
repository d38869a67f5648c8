#![forbid(unsafe_code)]

//! Schema declaration: the construction phase of a capsule.
//!
//! A [`Schema`] collects ordered property declarations (name, type token,
//! optional default) and [`build`](Schema::build)s the frozen container.
//! Declaration is the only point where the property set can be shaped;
//! nothing re-declares shape afterwards.

use capsule_value::Value;

use crate::capsule::Capsule;
use crate::error::Result;
use crate::token::TypeToken;

pub(crate) struct PropertyDecl {
    pub(crate) name: String,
    pub(crate) token: TypeToken,
    pub(crate) default: Option<Value>,
}

/// Ordered property declarations for one capsule.
#[derive(Default)]
pub struct Schema {
    declarations: Vec<PropertyDecl>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property with no default. Until its first write it reads
    /// as [`Value::Null`].
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, token: TypeToken) -> Self {
        self.declarations.push(PropertyDecl {
            name: name.into(),
            token,
            default: None,
        });
        self
    }

    /// Declare a property seeded with `default`. The default is validated
    /// at build time; a failing default is a fatal schema defect.
    #[must_use]
    pub fn property_with_default(
        mut self,
        name: impl Into<String>,
        token: TypeToken,
        default: impl Into<Value>,
    ) -> Self {
        self.declarations.push(PropertyDecl {
            name: name.into(),
            token,
            default: Some(default.into()),
        });
        self
    }

    /// Number of declarations so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Resolve validators, validate defaults, seed values, and freeze the
    /// shape.
    ///
    /// # Errors
    ///
    /// [`CapsuleError::DuplicateProperty`](crate::CapsuleError) if a name is
    /// declared twice, [`CapsuleError::InvalidDefault`](crate::CapsuleError)
    /// if a default fails its own validator. Both indicate an inconsistent
    /// schema and abort construction.
    pub fn build(self) -> Result<Capsule> {
        Capsule::from_declarations(self.declarations)
    }
}
