//! Operands accepted by the counter operations.

use std::{cmp::Ordering, fmt};

use crate::{
    compare::safe_cmp,
    ladder::{Cells, Rung},
    large_int::LargeInt,
};

/// A numeric operand snapshotted by value.
///
/// Converting through [`Arithmetic::into_value`] keeps `Signed` for negative
/// numbers only; nonnegative signed inputs become `Unsigned`.
#[derive(Debug, Clone)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Large(LargeInt),
    Float(f64),
}

impl Value {
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Unsigned(v) => *v as f64,
            Value::Signed(v) => *v as f64,
            Value::Large(v) => v.to_f64(),
            Value::Float(v) => *v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(v) => fmt::Display::fmt(v, f),
            Value::Signed(v) => fmt::Display::fmt(v, f),
            Value::Large(v) => fmt::Display::fmt(v, f),
            Value::Float(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        safe_cmp(self, other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        safe_cmp(self, other)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Types that may be stored in or combined with a cell.
///
/// Sealed: only primitive numbers, [`LargeInt`] and [`Value`] qualify, so a
/// non-numeric operand is a compile error rather than a runtime failure.
pub trait Arithmetic: sealed::Sealed + Sized {
    fn into_value(self) -> Value;

    /// Typed array for a sequence of these values. Ladder members keep their
    /// representation, everything else is stored as `f64`.
    fn collect_cells(values: Vec<Self>) -> Cells {
        let floats = values.into_iter().map(|v| v.into_value().to_f64());
        Cells::F64(floats.collect())
    }
}

macro_rules! arithmetic_ladder {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Arithmetic for $t {
            fn into_value(self) -> Value {
                Value::Unsigned(u64::from(self))
            }
            fn collect_cells(values: Vec<Self>) -> Cells {
                <$t as Rung>::into_cells(values)
            }
        }
    )*};
}
arithmetic_ladder!(u8, u16, u32, u64);

macro_rules! arithmetic_signed {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Arithmetic for $t {
            fn into_value(self) -> Value {
                let v = self as i64;
                if v >= 0 {
                    Value::Unsigned(v as u64)
                } else {
                    Value::Signed(v)
                }
            }
        }
    )*};
}
arithmetic_signed!(i8, i16, i32, i64, isize);

impl sealed::Sealed for usize {}
impl Arithmetic for usize {
    fn into_value(self) -> Value {
        Value::Unsigned(self as u64)
    }
    fn collect_cells(values: Vec<Self>) -> Cells {
        Cells::U64(values.into_iter().map(|v| v as u64).collect())
    }
}

impl sealed::Sealed for f32 {}
impl Arithmetic for f32 {
    fn into_value(self) -> Value {
        Value::Float(self as f64)
    }
}

impl sealed::Sealed for f64 {}
impl Arithmetic for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
    fn collect_cells(values: Vec<Self>) -> Cells {
        Cells::F64(values)
    }
}

impl sealed::Sealed for LargeInt {}
impl Arithmetic for LargeInt {
    fn into_value(self) -> Value {
        Value::Large(self)
    }
    fn collect_cells(values: Vec<Self>) -> Cells {
        Cells::LargeInt(values)
    }
}

impl sealed::Sealed for &LargeInt {}
impl Arithmetic for &LargeInt {
    fn into_value(self) -> Value {
        Value::Large(self.clone())
    }
    fn collect_cells(values: Vec<Self>) -> Cells {
        Cells::LargeInt(values.into_iter().cloned().collect())
    }
}

impl sealed::Sealed for Value {}
impl Arithmetic for Value {
    fn into_value(self) -> Value {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::Repr;

    #[test]
    fn signed_values_normalize() {
        assert!(matches!(5i32.into_value(), Value::Unsigned(5)));
        assert!(matches!((-5i64).into_value(), Value::Signed(-5)));
        assert!(matches!(0isize.into_value(), Value::Unsigned(0)));
        let half = (-0.5f32).into_value();
        assert!(matches!(half, Value::Float(v) if v == -0.5));
    }

    #[test]
    fn sequences_keep_ladder_members() {
        assert_eq!(u16::collect_cells(vec![1, 2]).repr(), Repr::U16);
        assert_eq!(usize::collect_cells(vec![1, 2]).repr(), Repr::U64);
        assert_eq!(i32::collect_cells(vec![1, -2]).repr(), Repr::F64);
        assert_eq!(f32::collect_cells(vec![1.5]).repr(), Repr::F64);
        assert_eq!(
            LargeInt::collect_cells(vec![LargeInt::from(1u8)]).repr(),
            Repr::LargeInt
        );
    }

    #[test]
    fn values_compare_across_domains() {
        assert_eq!(Value::Unsigned(3), Value::Float(3.0));
        assert_eq!(Value::Large(LargeInt::from(7u8)), Value::Unsigned(7));
        assert!(Value::Signed(-1) < Value::Unsigned(0));
        assert!(Value::Float(f64::NAN) != Value::Float(f64::NAN));
        assert_eq!(
            Value::Large(LargeInt::from_words(&[0, 1])).to_string(),
            "18446744073709551616"
        );
    }
}
