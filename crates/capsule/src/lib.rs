#![forbid(unsafe_code)]

//! Capsule public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub use capsule_core::{Capsule, CapsuleError, Result, Schema, Subscriber, TypeToken, Validator};
pub use capsule_value::{Class, Instance, NativeFn, Value, ValueKind};

pub mod prelude {
    pub use capsule_core as core;
    pub use capsule_value as value;

    pub use capsule_core::{
        Capsule, CapsuleError, Result, Schema, TypeToken, Validator, resolve,
    };
    pub use capsule_value::{Class, Instance, NativeFn, Value, ValueKind};
}
