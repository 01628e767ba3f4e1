//! Cursors into a single cell of a [`Buffer`].
//!
//! A cursor is a buffer reference plus an index. It never caches the value or
//! the representation, so it stays valid when the buffer widens underneath it.
//! Writes go through the promotion algorithms; reads and comparisons visit
//! whatever representation is current.

use std::{
    cmp::Ordering,
    fmt,
    ops::{AddAssign, DivAssign, MulAssign, SubAssign},
};

use crate::{
    buffer::Buffer,
    compare::{safe_cmp, safe_eq},
    ladder::Repr,
    large_int::LargeInt,
    value::{Arithmetic, Value},
};

/// Read-only cursor.
#[derive(Clone, Copy)]
pub struct CellRef<'a> {
    buffer: &'a Buffer,
    index: usize,
}

impl<'a> CellRef<'a> {
    pub fn new(buffer: &'a Buffer, index: usize) -> Self {
        debug_assert!(
            index < buffer.len(),
            "cell index {index} out of range for {} cells",
            buffer.len()
        );
        Self { buffer, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn repr(&self) -> Repr {
        self.buffer.repr()
    }

    pub fn value(&self) -> Value {
        self.buffer.value(self.index)
    }

    pub fn to_f64(&self) -> f64 {
        self.buffer.to_f64(self.index)
    }
}

impl From<CellRef<'_>> for f64 {
    fn from(cell: CellRef<'_>) -> Self {
        cell.to_f64()
    }
}

impl fmt::Debug for CellRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellRef")
            .field("index", &self.index)
            .field("repr", &self.repr())
            .field("value", &self.value())
            .finish()
    }
}

impl fmt::Display for CellRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

impl PartialEq<CellRef<'_>> for CellRef<'_> {
    fn eq(&self, other: &CellRef<'_>) -> bool {
        safe_eq(&self.value(), &other.value())
    }
}

impl PartialOrd<CellRef<'_>> for CellRef<'_> {
    fn partial_cmp(&self, other: &CellRef<'_>) -> Option<Ordering> {
        safe_cmp(&self.value(), &other.value())
    }
}

/// Mutable cursor. Assignment writes through to the cell, it never rebinds the cursor.
pub struct CellMut<'a> {
    buffer: &'a mut Buffer,
    index: usize,
}

impl<'a> CellMut<'a> {
    pub fn new(buffer: &'a mut Buffer, index: usize) -> Self {
        debug_assert!(
            index < buffer.len(),
            "cell index {index} out of range for {} cells",
            buffer.len()
        );
        Self { buffer, index }
    }

    /// Read-only view of the same cell.
    pub fn get(&self) -> CellRef<'_> {
        CellRef::new(self.buffer, self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn repr(&self) -> Repr {
        self.buffer.repr()
    }

    pub fn value(&self) -> Value {
        self.buffer.value(self.index)
    }

    pub fn to_f64(&self) -> f64 {
        self.buffer.to_f64(self.index)
    }

    pub fn set<T: Arithmetic>(&mut self, x: T) {
        self.buffer.set(self.index, x);
    }

    pub fn add<T: Arithmetic>(&mut self, x: T) {
        self.buffer.add(self.index, x);
    }

    /// Add the current value of cell `src` of the same buffer, which may be this cell.
    pub fn add_from(&mut self, src: usize) {
        let x = self.buffer.value(src);
        self.buffer.add_value(self.index, x);
    }

    pub fn sub(&mut self, x: f64) {
        self.add(-x);
    }

    pub fn mul(&mut self, x: f64) {
        self.buffer.scale(self.index, x);
    }

    pub fn div(&mut self, x: f64) {
        self.mul(1.0 / x);
    }

    pub fn increment(&mut self) {
        self.buffer.increment(self.index);
    }
}

impl fmt::Debug for CellMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellMut")
            .field("index", &self.index)
            .field("repr", &self.repr())
            .field("value", &self.value())
            .finish()
    }
}

impl<T: Arithmetic> AddAssign<T> for CellMut<'_> {
    fn add_assign(&mut self, rhs: T) {
        self.add(rhs);
    }
}

impl SubAssign<f64> for CellMut<'_> {
    fn sub_assign(&mut self, rhs: f64) {
        self.sub(rhs);
    }
}

impl MulAssign<f64> for CellMut<'_> {
    fn mul_assign(&mut self, rhs: f64) {
        self.mul(rhs);
    }
}

impl DivAssign<f64> for CellMut<'_> {
    fn div_assign(&mut self, rhs: f64) {
        self.div(rhs);
    }
}

macro_rules! impl_numeric_cmp {
    ($cursor:ident: $($t:ty),*) => {$(
        impl PartialEq<$t> for $cursor<'_> {
            fn eq(&self, other: &$t) -> bool {
                safe_eq(&self.value(), &(*other).into_value())
            }
        }
        impl PartialOrd<$t> for $cursor<'_> {
            fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                safe_cmp(&self.value(), &(*other).into_value())
            }
        }
        impl PartialEq<$cursor<'_>> for $t {
            fn eq(&self, other: &$cursor<'_>) -> bool {
                other == self
            }
        }
        impl PartialOrd<$cursor<'_>> for $t {
            fn partial_cmp(&self, other: &$cursor<'_>) -> Option<Ordering> {
                other.partial_cmp(self).map(Ordering::reverse)
            }
        }
    )*};
}
impl_numeric_cmp!(CellRef: u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
impl_numeric_cmp!(CellMut: u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

macro_rules! impl_large_int_cmp {
    ($($cursor:ident),*) => {$(
        impl PartialEq<LargeInt> for $cursor<'_> {
            fn eq(&self, other: &LargeInt) -> bool {
                safe_eq(&self.value(), &other.into_value())
            }
        }
        impl PartialOrd<LargeInt> for $cursor<'_> {
            fn partial_cmp(&self, other: &LargeInt) -> Option<Ordering> {
                safe_cmp(&self.value(), &other.into_value())
            }
        }
        impl PartialEq<$cursor<'_>> for LargeInt {
            fn eq(&self, other: &$cursor<'_>) -> bool {
                other == self
            }
        }
        impl PartialOrd<$cursor<'_>> for LargeInt {
            fn partial_cmp(&self, other: &$cursor<'_>) -> Option<Ordering> {
                other.partial_cmp(self).map(Ordering::reverse)
            }
        }
    )*};
}
impl_large_int_cmp!(CellRef, CellMut);
