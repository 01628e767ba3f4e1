//! The fixed ladder of cell representations and the typed arrays that hold them.
//!
//! ```text
//! u8 -> u16 -> u32 -> u64 -> LargeInt -> f64
//! ```
//!
//! Every step but the last is value preserving. Widening only moves to the right.

use std::fmt;

use crate::{large_int::LargeInt, value::Value};

/// Tag of a ladder member, ordered from narrowest to the floating fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Repr {
    #[default]
    U8,
    U16,
    U32,
    U64,
    LargeInt,
    F64,
}

impl Repr {
    pub const LADDER: [Repr; 6] = [
        Repr::U8,
        Repr::U16,
        Repr::U32,
        Repr::U64,
        Repr::LargeInt,
        Repr::F64,
    ];

    pub fn next(self) -> Option<Repr> {
        match self {
            Repr::U8 => Some(Repr::U16),
            Repr::U16 => Some(Repr::U32),
            Repr::U32 => Some(Repr::U64),
            Repr::U64 => Some(Repr::LargeInt),
            Repr::LargeInt => Some(Repr::F64),
            Repr::F64 => None,
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Repr::U8 => "u8",
            Repr::U16 => "u16",
            Repr::U32 => "u32",
            Repr::U64 => "u64",
            Repr::LargeInt => "large_int",
            Repr::F64 => "f64",
        };
        f.write_str(name)
    }
}

pub(crate) mod sealed {
    use super::{Cells, Counter};

    /// Conversions between ladder members. Only widening preserves the value,
    /// so these stay inside the crate.
    pub trait Rung: Sized {
        /// Converts a cell of a narrower ladder member into this one.
        fn from_counter<S: Counter>(src: &S) -> Self;

        fn into_cells(cells: Vec<Self>) -> Cells;
    }
}
pub(crate) use sealed::Rung;

/// A ladder member that can be stored in a cell.
///
/// Implemented for `u8`, `u16`, `u32`, `u64`, [`LargeInt`] and `f64` only.
/// Conversions between members are not part of the public API:
///
/// ```compile_fail
/// use unlimited_storage::Counter;
///
/// let narrowed = u8::from_counter(&300u16);
/// ```
pub trait Counter: Clone + Default + PartialEq + fmt::Debug + fmt::Display + Rung + 'static {
    const REPR: Repr;

    fn to_f64(&self) -> f64;

    /// Exact value as one word. Always `None` for `f64`.
    fn to_u64(&self) -> Option<u64>;

    /// Exact value as a [`LargeInt`]. Always `None` for `f64`.
    fn to_large_int(&self) -> Option<LargeInt>;

    fn to_value(&self) -> Value;
}

/// Ladder members with a fixed bit width, the only ones that can overflow.
pub(crate) trait FixedWidth: Counter + Copy {
    /// Adds one in place, returns `false` and leaves the cell untouched on overflow.
    fn checked_increment(&mut self) -> bool;
    /// Adds `x` in place, returns `false` and leaves the cell untouched on overflow.
    fn checked_add_u64(&mut self, x: u64) -> bool;
}

macro_rules! fixed_width_counter {
    ($($t:ty => $variant:ident),*) => {$(
        impl Rung for $t {
            fn from_counter<S: Counter>(src: &S) -> Self {
                let v = src.to_u64().and_then(|v| <$t>::try_from(v).ok());
                debug_assert!(v.is_some(), "{src} does not fit into {}", Self::REPR);
                v.unwrap_or_default()
            }
            fn into_cells(cells: Vec<Self>) -> Cells {
                Cells::$variant(cells)
            }
        }

        impl Counter for $t {
            const REPR: Repr = Repr::$variant;

            fn to_f64(&self) -> f64 {
                *self as f64
            }
            fn to_u64(&self) -> Option<u64> {
                Some(u64::from(*self))
            }
            fn to_large_int(&self) -> Option<LargeInt> {
                Some(LargeInt::from(*self))
            }
            fn to_value(&self) -> Value {
                Value::Unsigned(u64::from(*self))
            }
        }

        impl FixedWidth for $t {
            fn checked_increment(&mut self) -> bool {
                match self.checked_add(1) {
                    Some(v) => {
                        *self = v;
                        true
                    }
                    None => false,
                }
            }
            fn checked_add_u64(&mut self, x: u64) -> bool {
                match <$t>::try_from(x).ok().and_then(|x| self.checked_add(x)) {
                    Some(v) => {
                        *self = v;
                        true
                    }
                    None => false,
                }
            }
        }
    )*};
}
fixed_width_counter!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl Rung for LargeInt {
    fn from_counter<S: Counter>(src: &S) -> Self {
        let v = src.to_large_int();
        debug_assert!(v.is_some(), "{src} is not an integer");
        v.unwrap_or_default()
    }
    fn into_cells(cells: Vec<Self>) -> Cells {
        Cells::LargeInt(cells)
    }
}

impl Counter for LargeInt {
    const REPR: Repr = Repr::LargeInt;

    fn to_f64(&self) -> f64 {
        LargeInt::to_f64(self)
    }
    fn to_u64(&self) -> Option<u64> {
        LargeInt::to_u64(self)
    }
    fn to_large_int(&self) -> Option<LargeInt> {
        Some(self.clone())
    }
    fn to_value(&self) -> Value {
        Value::Large(self.clone())
    }
}

impl Rung for f64 {
    fn from_counter<S: Counter>(src: &S) -> Self {
        // may round for very large integers
        src.to_f64()
    }
    fn into_cells(cells: Vec<Self>) -> Cells {
        Cells::F64(cells)
    }
}

impl Counter for f64 {
    const REPR: Repr = Repr::F64;

    fn to_f64(&self) -> f64 {
        *self
    }
    fn to_u64(&self) -> Option<u64> {
        None
    }
    fn to_large_int(&self) -> Option<LargeInt> {
        None
    }
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

/// A homogeneous array of cells tagged with its ladder member.
#[derive(Debug, Clone)]
pub enum Cells {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    LargeInt(Vec<LargeInt>),
    F64(Vec<f64>),
}

impl Default for Cells {
    fn default() -> Self {
        Cells::U8(Vec::new())
    }
}

/// Runs `$body` with `$v` bound to the typed array inside `$cells`.
///
/// Arms are tried from the narrowest member to `f64`, the same order as the
/// ladder, which keeps the common small-integer cases first.
macro_rules! visit_cells {
    ($cells:expr, $v:ident => $body:expr) => {
        match $cells {
            $crate::ladder::Cells::U8($v) => $body,
            $crate::ladder::Cells::U16($v) => $body,
            $crate::ladder::Cells::U32($v) => $body,
            $crate::ladder::Cells::U64($v) => $body,
            $crate::ladder::Cells::LargeInt($v) => $body,
            $crate::ladder::Cells::F64($v) => $body,
        }
    };
}
pub(crate) use visit_cells;

impl Cells {
    pub fn repr(&self) -> Repr {
        match self {
            Cells::U8(_) => Repr::U8,
            Cells::U16(_) => Repr::U16,
            Cells::U32(_) => Repr::U32,
            Cells::U64(_) => Repr::U64,
            Cells::LargeInt(_) => Repr::LargeInt,
            Cells::F64(_) => Repr::F64,
        }
    }

    pub fn len(&self) -> usize {
        visit_cells!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to the typed array behind a buffer.
pub trait Visitor {
    type Output;
    fn visit<T: Counter>(self, cells: &[T]) -> Self::Output;
}

/// Write access to the typed array behind a buffer.
///
/// Values written here stay in the current representation; nothing is widened.
pub trait VisitorMut {
    type Output;
    fn visit_mut<T: Counter>(self, cells: &mut [T]) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_ordered_and_ends_in_float() {
        let mut repr = Repr::U8;
        let mut seen = vec![repr];
        while let Some(next) = repr.next() {
            assert!(next > repr);
            seen.push(next);
            repr = next;
        }
        assert_eq!(seen, Repr::LADDER.to_vec());
        assert_eq!(repr, Repr::F64);
    }

    #[test]
    fn checked_ops_leave_cell_untouched_on_overflow() {
        let mut x = 255u8;
        assert!(!x.checked_increment());
        assert_eq!(x, 255);
        let mut y = 200u8;
        assert!(!y.checked_add_u64(56));
        assert!(!y.checked_add_u64(1000));
        assert_eq!(y, 200);
        assert!(y.checked_add_u64(55));
        assert_eq!(y, 255);
        let mut z = u64::MAX - 1;
        assert!(z.checked_increment());
        assert!(!z.checked_add_u64(1));
    }

    #[test]
    fn widening_conversions_preserve_value() {
        assert_eq!(u16::from_counter(&255u8), 255u16);
        assert_eq!(u64::from_counter(&u32::MAX), u32::MAX as u64);
        let max = LargeInt::from_counter(&u64::MAX);
        assert_eq!(max, LargeInt::from(u64::MAX));
        assert_eq!(
            f64::from_counter(&LargeInt::from_words(&[0, 1])),
            2f64.powi(64)
        );
        assert_eq!(<u8 as Rung>::into_cells(vec![1, 2]).repr(), Repr::U8);
        assert_eq!(Cells::default().repr(), Repr::U8);
        assert!(Cells::default().is_empty());
    }
}
