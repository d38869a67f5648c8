#![forbid(unsafe_code)]

//! Token → validator resolution.
//!
//! [`resolve`] maps a declared [`TypeToken`] to its [`Validator`]. It is
//! pure, total, and deterministic: the same token always yields an
//! equivalent predicate, and no token fails to resolve. Class tokens — the
//! open-ended arm covering every user- or library-defined class — resolve
//! to an instance-of check.
//!
//! Resolution happens once per property at construction time; the returned
//! handle is cached in the property slot and reused for every subsequent
//! write. Nothing re-dispatches on the token afterwards.

use std::rc::Rc;

use crate::token::TypeToken;
use crate::validators;

pub use crate::validators::Validator;

/// Resolve a type token to its validation predicate.
#[must_use]
pub fn resolve(token: &TypeToken) -> Validator {
    match token {
        TypeToken::Text => Rc::new(validators::is_text),
        TypeToken::Number => Rc::new(validators::is_number),
        TypeToken::Bool => Rc::new(validators::is_bool),
        TypeToken::List => Rc::new(validators::is_list),
        TypeToken::Record => Rc::new(validators::is_record),
        TypeToken::Any => Rc::new(|_| true),
        TypeToken::Class(class) => validators::instance_check(class),
    }
}
