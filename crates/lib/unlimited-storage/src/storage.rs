//! The storage handed to a histogram: a [`Buffer`] with indexed cursor access.

use std::ops::{DivAssign, MulAssign};

use itertools::{EitherOrBoth, Itertools};

use crate::{
    buffer::Buffer,
    cell::{CellMut, CellRef},
    compare::{counters_eq, safe_eq},
    error::StorageError,
    iter::{CellsMut, Iter},
    ladder::{Counter, Repr, Visitor, VisitorMut, visit_cells},
    value::Arithmetic,
};


/// Memory-efficient counters that cannot overflow when filled with integral weights.
///
/// All cells share one representation. When an operation would overflow a
/// cell, the whole array is replaced with the next wider type and the operation
/// is carried out there: `u8`, `u16`, `u32`, `u64`, then [`LargeInt`](crate::LargeInt).
/// Adding a float or a negative weight, or scaling, turns the cells into `f64`,
/// which gives up the no-overflow guarantee.
///
/// Not thread safe. Fill independent storages and merge them with
/// [`add`](CellMut::add) if work has to be split across threads.
#[derive(Debug, Clone, Default)]
pub struct UnlimitedStorage {
    buffer: Buffer,
}

impl UnlimitedStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// `n` zeroed cells of the narrowest representation.
    pub fn with_size(n: usize) -> Self {
        let mut storage = Self::new();
        storage.reset(n);
        storage
    }

    pub fn reset(&mut self, n: usize) {
        self.buffer.reset(n);
    }

    pub fn try_reset(&mut self, n: usize) -> Result<(), StorageError> {
        self.buffer.try_reset(n)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current representation. Useful for diagnostics; the numeric contract
    /// does not depend on it.
    pub fn repr(&self) -> Repr {
        self.buffer.repr()
    }

    pub fn get(&self, index: usize) -> CellRef<'_> {
        CellRef::new(&self.buffer, index)
    }

    pub fn get_mut(&mut self, index: usize) -> CellMut<'_> {
        CellMut::new(&mut self.buffer, index)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.buffer)
    }

    pub fn cells_mut(&mut self) -> CellsMut<'_> {
        CellsMut::new(&mut self.buffer)
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(CellMut<'_>)) {
        let mut cells = self.cells_mut();
        while let Some(cell) = cells.next_cell() {
            f(cell);
        }
    }

    /// Multiply every cell by `x`. The storage holds `f64` afterwards.
    pub fn scale(&mut self, x: f64) {
        self.buffer.scale_all(x);
    }

    pub fn visit<V: Visitor>(&self, visitor: V) -> V::Output {
        self.buffer.visit(visitor)
    }

    pub fn visit_mut<V: VisitorMut>(&mut self, visitor: V) -> V::Output {
        self.buffer.visit_mut(visitor)
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.iter().map(f64::from).collect()
    }

    /// Element-wise comparison with any numeric sequence, whatever the current
    /// representation. Sequences of a different length are never equal.
    pub fn eq_values<I>(&self, values: I) -> bool
    where
        I: IntoIterator,
        I::Item: Arithmetic,
    {
        visit_cells!(self.buffer.cells(), cells => {
            cells.iter().zip_longest(values).all(both_equal)
        })
    }

    /// Replace the contents with `values`, see [`FromIterator`].
    pub fn assign<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Arithmetic,
    {
        *self = values.into_iter().collect();
    }

    /// Move the cells out, leaving this storage empty.
    pub fn take(&mut self) -> UnlimitedStorage {
        Self {
            buffer: self.buffer.take(),
        }
    }
}

fn both_equal<T: Counter, V: Arithmetic>(pair: EitherOrBoth<&T, V>) -> bool {
    match pair {
        EitherOrBoth::Both(cell, value) => safe_eq(&cell.to_value(), &value.into_value()),
        _ => false,
    }
}

fn slices_equal<A: Counter, B: Counter>(lhs: &[A], rhs: &[B]) -> bool {
    lhs.iter().zip(rhs).all(|(a, b)| counters_eq(a, b))
}

impl PartialEq for UnlimitedStorage {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        visit_cells!(self.buffer.cells(), lhs => {
            visit_cells!(other.buffer.cells(), rhs => slices_equal(lhs, rhs))
        })
    }
}

impl<T: Arithmetic + Clone> PartialEq<[T]> for UnlimitedStorage {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.eq_values(other.iter().cloned())
    }
}

impl<T: Arithmetic + Clone> PartialEq<Vec<T>> for UnlimitedStorage {
    fn eq(&self, other: &Vec<T>) -> bool {
        self == other.as_slice()
    }
}

impl<T: Arithmetic + Clone, const N: usize> PartialEq<[T; N]> for UnlimitedStorage {
    fn eq(&self, other: &[T; N]) -> bool {
        self == other.as_slice()
    }
}

impl MulAssign<f64> for UnlimitedStorage {
    fn mul_assign(&mut self, rhs: f64) {
        self.scale(rhs);
    }
}

impl DivAssign<f64> for UnlimitedStorage {
    fn div_assign(&mut self, rhs: f64) {
        self.scale(1.0 / rhs);
    }
}

/// Ladder members keep their representation; other numeric types are stored as `f64`.
impl<T: Arithmetic> FromIterator<T> for UnlimitedStorage {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let values = iter.into_iter().collect::<Vec<_>>();
        Self {
            buffer: Buffer::from_cells(T::collect_cells(values)),
        }
    }
}

impl<T: Arithmetic> From<Vec<T>> for UnlimitedStorage {
    fn from(values: Vec<T>) -> Self {
        Self {
            buffer: Buffer::from_cells(T::collect_cells(values)),
        }
    }
}

impl<'a> IntoIterator for &'a UnlimitedStorage {
    type Item = CellRef<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
