//! Comparisons that stay meaningful across unsigned, signed and floating domains.
//!
//! Integer pairs are compared exactly: a negative signed value is less than any
//! unsigned or [`LargeInt`](crate::LargeInt) value and never wraps around. When
//! one side is floating point the integer side is converted to `f64` first, so
//! integers beyond 2^53 compare equal to the float they round to.

use std::cmp::Ordering;

use crate::{ladder::Counter, value::Value};

pub fn safe_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    use Value::*;
    match (a, b) {
        (Float(x), Float(y)) => x.partial_cmp(y),
        (Float(x), other) => x.partial_cmp(&other.to_f64()),
        (other, Float(y)) => other.to_f64().partial_cmp(y),

        (Unsigned(x), Unsigned(y)) => Some(x.cmp(y)),
        (Signed(x), Signed(y)) => Some(x.cmp(y)),
        (Large(x), Large(y)) => Some(x.cmp(y)),

        (Unsigned(x), Signed(y)) => Some(cmp_unsigned_signed(*x, *y)),
        (Signed(x), Unsigned(y)) => Some(cmp_unsigned_signed(*y, *x).reverse()),
        (Large(x), Unsigned(y)) => Some(x.cmp_u64(*y)),
        (Unsigned(x), Large(y)) => Some(y.cmp_u64(*x).reverse()),
        (Large(x), Signed(y)) => Some(match u64::try_from(*y) {
            Ok(y) => x.cmp_u64(y),
            Err(_) => Ordering::Greater,
        }),
        (Signed(x), Large(y)) => Some(match u64::try_from(*x) {
            Ok(x) => y.cmp_u64(x).reverse(),
            Err(_) => Ordering::Less,
        }),
    }
}

pub fn safe_eq(a: &Value, b: &Value) -> bool {
    safe_cmp(a, b) == Some(Ordering::Equal)
}

fn cmp_unsigned_signed(x: u64, y: i64) -> Ordering {
    match u64::try_from(y) {
        Ok(y) => x.cmp(&y),
        Err(_) => Ordering::Greater,
    }
}

/// Equality of two cells that may live in different representations.
pub(crate) fn counters_eq<A: Counter, B: Counter>(a: &A, b: &B) -> bool {
    match (a.to_u64(), b.to_u64()) {
        (Some(x), Some(y)) => x == y,
        _ => safe_eq(&a.to_value(), &b.to_value()),
    }
}
