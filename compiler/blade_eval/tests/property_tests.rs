//! Property-based tests for the specializing operators.
//!
//! These tests use proptest to generate operand pairs and verify:
//! 1. Exactness: integer `+`, `*` and `/` stay integers whenever the exact
//!    result exists
//! 2. Generalization: after one overflow, a site computes in floating point
//!    for every later integer pair, while other sites are unaffected
//! 3. Slot kinds only ever widen

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::cast_precision_loss,
    clippy::float_cmp,
    reason = "expected values are computed the same way the operators do"
)]

use blade_eval::{evaluate_binary, OperatorSite, SlotKind, SlotTable, Value};
use blade_ir::{BinaryOp, SlotId};
use proptest::prelude::*;

fn eval(site: &OperatorSite, a: Value, b: Value) -> Value {
    evaluate_binary(site, a, b).expect("numeric operands never fail")
}

fn numeric_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        (-1.0e12..1.0e12f64).prop_map(Value::Float),
    ]
}

proptest! {
    #[test]
    fn add_is_exact_without_overflow(a in any::<i64>(), b in any::<i64>()) {
        let site = OperatorSite::new(BinaryOp::Add);
        let expected = match a.checked_add(b) {
            Some(sum) => Value::Int(sum),
            None => Value::Float(a as f64 + b as f64),
        };
        prop_assert_eq!(eval(&site, Value::Int(a), Value::Int(b)), expected);
    }

    #[test]
    fn mul_is_exact_without_overflow(a in any::<i64>(), b in any::<i64>()) {
        let site = OperatorSite::new(BinaryOp::Mul);
        let expected = match a.checked_mul(b) {
            Some(product) => Value::Int(product),
            None => Value::Float(a as f64 * b as f64),
        };
        prop_assert_eq!(eval(&site, Value::Int(a), Value::Int(b)), expected);
    }

    #[test]
    fn small_ints_always_add_exactly(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let site = OperatorSite::new(BinaryOp::Add);
        prop_assert_eq!(eval(&site, Value::Int(a), Value::Int(b)), Value::Int(a + b));
        prop_assert_eq!(site.active_strategy(), Some("int+int"));
    }

    #[test]
    fn overflow_generalizes_only_its_site(a in -1_000i64..1_000, b in -1_000i64..1_000) {
        let overflowed = OperatorSite::new(BinaryOp::Add);
        let untouched = OperatorSite::new(BinaryOp::Add);

        let first = eval(&overflowed, Value::Int(i64::MAX), Value::Int(1));
        prop_assert_eq!(first, Value::Float(i64::MAX as f64 + 1.0));

        prop_assert_eq!(
            eval(&overflowed, Value::Int(a), Value::Int(b)),
            Value::Float(a as f64 + b as f64)
        );
        prop_assert_eq!(eval(&untouched, Value::Int(a), Value::Int(b)), Value::Int(a + b));
        prop_assert_eq!(overflowed.excluded_strategies(), vec!["int+int"]);
    }

    #[test]
    fn integer_division_is_exact_when_divisible(q in -1_000_000i64..1_000_000, d in 1i64..1_000) {
        let site = OperatorSite::new(BinaryOp::Div);
        prop_assert_eq!(eval(&site, Value::Int(q * d), Value::Int(d)), Value::Int(q));
        // A later inexact division does not change the next exact one.
        let inexact = eval(&site, Value::Int(2 * d + 1), Value::Int(2 * d));
        prop_assert!(matches!(inexact, Value::Float(_)));
        prop_assert_eq!(eval(&site, Value::Int(q * d), Value::Int(d)), Value::Int(q));
    }

    #[test]
    fn mixed_numbers_add_as_floats(a in numeric_value(), b in numeric_value()) {
        let site = OperatorSite::new(BinaryOp::Add);
        let result = eval(&site, a.clone(), b.clone());
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) if x.checked_add(*y).is_some() => {
                prop_assert_eq!(result, Value::Int(x + y));
            }
            _ => {
                let expected = a.as_number().unwrap() + b.as_number().unwrap();
                prop_assert_eq!(result, Value::Float(expected));
            }
        }
    }

    #[test]
    fn slot_kinds_only_widen(values in prop::collection::vec(numeric_value(), 1..20)) {
        let table = SlotTable::new(["x"]);
        let slot = SlotId::new(0);
        let mut frame = table.new_frame();
        let mut previous = SlotKind::Untyped;
        for value in values {
            table.assign(&mut frame, slot, value);
            let kind = table.kind(slot);
            prop_assert!(kind >= previous);
            previous = kind;
        }
    }
}
