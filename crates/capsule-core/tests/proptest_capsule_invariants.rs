//! Property-based invariant tests for the capsule container, the resolver,
//! and schema construction.
//!
//! These tests verify structural invariants that must hold for any valid
//! inputs:
//!
//! 1. An accepted write reads back exactly, and the committed value
//!    satisfies the property's validator.
//! 2. A mismatched write fails with `TypeMismatch` naming the property and
//!    the offending kind, leaves the stored value untouched, and fires no
//!    subscriber.
//! 3. Writes to undeclared names always fail with `UnknownProperty` and
//!    never change the declared name set (frozen shape).
//! 4. Resolution is deterministic: the same token yields equivalent
//!    validators.
//! 5. The wildcard validator accepts every value.
//! 6. A valid default seeds the property before any explicit write.
//! 7. Subscribers fire exactly once per accepted write, and the old/new
//!    pairs chain across consecutive writes.

use capsule_core::{CapsuleError, Schema, TypeToken, resolve};
use capsule_value::{Class, Instance, Value};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// ── Helpers ─────────────────────────────────────────────────────────────

fn builtin_token(index: usize) -> TypeToken {
    match index {
        0 => TypeToken::Text,
        1 => TypeToken::Number,
        2 => TypeToken::Bool,
        3 => TypeToken::List,
        _ => TypeToken::Record,
    }
}

fn leaf_values() -> BoxedStrategy<Value> {
    prop_oneof![
        any::<String>().prop_map(Value::Text),
        (-1.0e12_f64..1.0e12).prop_map(Value::Number),
        any::<bool>().prop_map(Value::Bool),
    ]
    .boxed()
}

/// Values matching the builtin token at `index`.
fn values_of_kind(index: usize) -> BoxedStrategy<Value> {
    match index {
        0 => any::<String>().prop_map(Value::Text).boxed(),
        1 => (-1.0e12_f64..1.0e12).prop_map(Value::Number).boxed(),
        2 => any::<bool>().prop_map(Value::Bool).boxed(),
        3 => proptest::collection::vec(leaf_values(), 0..4)
            .prop_map(Value::List)
            .boxed(),
        _ => proptest::collection::btree_map("[a-z]{1,6}", leaf_values(), 0..4)
            .prop_map(Value::Record)
            .boxed(),
    }
}

/// Any value at all, including the wildcard-only kinds.
fn arbitrary_values() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        values_of_kind(0),
        values_of_kind(1),
        values_of_kind(2),
        values_of_kind(3),
        values_of_kind(4),
        any::<u8>().prop_map(|_| Value::func(|_| Value::Null)),
        any::<u32>().prop_map(|n| Value::from(Instance::new(&Class::new("Opaque"), n))),
    ]
    .boxed()
}

/// A builtin token index with one matching and one mismatching value.
fn token_with_match_and_mismatch() -> impl Strategy<Value = (usize, Value, Value)> {
    (0usize..5).prop_flat_map(|index| {
        let mismatch = (0usize..5)
            .prop_filter("mismatching kind", move |other| *other != index)
            .prop_flat_map(values_of_kind);
        (Just(index), values_of_kind(index), mismatch)
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Accepted writes read back exactly
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn accepted_write_reads_back_exact((index, value, _) in token_with_match_and_mismatch()) {
        let token = builtin_token(index);
        let store = Schema::new().property("p", token.clone()).build().unwrap();

        store.set("p", value.clone()).unwrap();
        prop_assert_eq!(store.get("p").unwrap(), value.clone());

        let validator = resolve(&token);
        prop_assert!(validator(&value), "committed value fails its validator");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Mismatched writes are silent no-ops apart from the error
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn mismatched_write_changes_nothing(
        (index, good, bad) in token_with_match_and_mismatch()
    ) {
        let store = Schema::new()
            .property("p", builtin_token(index))
            .build()
            .unwrap();
        store.set("p", good.clone()).unwrap();

        let fired = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&fired);
        store.subscribe("p", move |_, _| *sink.borrow_mut() += 1).unwrap();

        let err = store.set("p", bad.clone()).unwrap_err();
        match err {
            CapsuleError::TypeMismatch { property, actual, value, .. } => {
                prop_assert_eq!(property, "p");
                prop_assert_eq!(actual, bad.kind());
                prop_assert_eq!(value, bad);
            }
            other => prop_assert!(false, "expected TypeMismatch, got {other:?}"),
        }

        prop_assert_eq!(store.get("p").unwrap(), good);
        prop_assert_eq!(*fired.borrow(), 0, "rejected write must not notify");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Shape is frozen under arbitrary name probes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_names_never_extend_the_shape(
        probe in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        value in arbitrary_values()
    ) {
        let store = Schema::new()
            .property("declared", TypeToken::Any)
            .build()
            .unwrap();
        prop_assume!(probe != "declared");

        let err = store.set(&probe, value).unwrap_err();
        prop_assert!(matches!(err, CapsuleError::UnknownProperty { .. }));
        prop_assert_eq!(store.names(), vec!["declared".to_owned()]);
        prop_assert!(!store.contains(&probe));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Resolution is deterministic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolver_is_deterministic(
        index in 0usize..5,
        values in proptest::collection::vec(arbitrary_values(), 1..8)
    ) {
        let token = builtin_token(index);
        let first = resolve(&token);
        let second = resolve(&token);
        for value in &values {
            prop_assert_eq!(
                first(value),
                second(value),
                "token {} disagrees with itself on {:?}",
                token,
                value.kind()
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. The wildcard accepts every value
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wildcard_accepts_everything(value in arbitrary_values()) {
        let validator = resolve(&TypeToken::Any);
        prop_assert!(validator(&value));

        let store = Schema::new().property("p", TypeToken::Any).build().unwrap();
        store.set("p", value.clone()).unwrap();
        prop_assert_eq!(store.get("p").unwrap(), value);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Valid defaults seed the property
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn valid_default_seeds_the_property((index, default, _) in token_with_match_and_mismatch()) {
        let store = Schema::new()
            .property_with_default("p", builtin_token(index), default.clone())
            .build()
            .unwrap();
        prop_assert_eq!(store.get("p").unwrap(), default);
    }
}

proptest! {
    #[test]
    fn invalid_default_is_fatal((index, _, bad) in token_with_match_and_mismatch()) {
        let err = Schema::new()
            .property_with_default("p", builtin_token(index), bad)
            .build()
            .unwrap_err();
        prop_assert!(err.is_schema_defect());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Notification count and old/new chaining
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn notifications_chain_across_writes(
        index in 0usize..5,
        writes in (0usize..5).prop_flat_map(|i| {
            proptest::collection::vec(values_of_kind(i), 1..6).prop_map(move |v| (i, v))
        })
    ) {
        // `index` seeds an unrelated property so multi-property stores are
        // exercised too.
        let (write_index, writes) = writes;
        let store = Schema::new()
            .property("p", builtin_token(write_index))
            .property("other", builtin_token(index))
            .build()
            .unwrap();

        let log: Rc<RefCell<Vec<(Value, Value)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        store
            .subscribe("p", move |new, old| {
                sink.borrow_mut().push((new.clone(), old.clone()));
            })
            .unwrap();

        for value in &writes {
            store.set("p", value.clone()).unwrap();
        }

        let log = log.borrow();
        prop_assert_eq!(log.len(), writes.len(), "one notification per accepted write");
        for (k, (new, old)) in log.iter().enumerate() {
            prop_assert_eq!(new, &writes[k]);
            if k == 0 {
                prop_assert!(old.is_null(), "first old value must be the unset marker");
            } else {
                prop_assert_eq!(old, &writes[k - 1]);
            }
        }
    }
}
