#![forbid(unsafe_code)]

//! Core: type-dispatch, schema freezing, and observable property storage.
//!
//! Declare a schema once, build the frozen container, then read, write, and
//! observe:
//!
//! ```
//! use capsule_core::{Schema, TypeToken};
//! use capsule_value::Value;
//!
//! let store = Schema::new()
//!     .property("name", TypeToken::Text)
//!     .property_with_default("is_citizen", TypeToken::Bool, true)
//!     .build()?;
//!
//! store.subscribe("name", |new, old| {
//!     println!("name: {old:?} -> {new:?}");
//! })?;
//! store.set("name", "Name")?;
//! assert_eq!(store.get("name")?, Value::text("Name"));
//! # Ok::<(), capsule_core::CapsuleError>(())
//! ```

pub mod capsule;
pub mod error;
pub mod resolver;
pub mod schema;
pub mod token;
pub mod validators;

pub use capsule::{Capsule, Subscriber};
pub use error::{CapsuleError, Result};
pub use resolver::resolve;
pub use schema::Schema;
pub use token::TypeToken;
pub use validators::Validator;
