//! Owner of the typed cell array.
//!
//! A [`Buffer`] holds exactly one [`Cells`] array. Its representation changes
//! through two distinct operations with different ordering guarantees:
//!
//! - [`Buffer::reset`] releases the current array first and then allocates a
//!   zeroed `u8` array. The old contents are discarded.
//! - [`Buffer::transform_to`] builds the converted array from the current one
//!   and only then releases the old array, because the new contents are
//!   derived from the old ones.
//!
//! The promotion algorithms (increment, add, multiply) live in
//! [`promote`](crate::promote) and widen through `transform_to`.

use crate::{
    error::StorageError,
    ladder::{Cells, Counter, Repr, Rung, Visitor, VisitorMut, visit_cells},
    value::Value,
};

#[derive(Debug, Clone, Default)]
pub struct Buffer {
    pub(crate) cells: Cells,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an already built array, keeping its representation.
    pub fn from_cells(cells: Cells) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn repr(&self) -> Repr {
        self.cells.repr()
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    /// Drop all cells and start over with `n` zeroed `u8` cells.
    pub fn reset(&mut self, n: usize) {
        log::trace!("reset: {} cells of {}", n, self.repr());
        self.cells = Cells::default();
        self.cells = Cells::U8(vec![0; n]);
    }

    /// Like [`reset`](Buffer::reset), but reports allocation failure instead of aborting.
    ///
    /// On failure the buffer is left empty.
    pub fn try_reset(&mut self, n: usize) -> Result<(), StorageError> {
        log::trace!("try_reset: {} cells of {}", n, self.repr());
        self.cells = Cells::default();
        let mut data = Vec::new();
        if let Err(source) = data.try_reserve_exact(n) {
            return Err(StorageError::Allocation {
                cells: n,
                repr: Repr::U8,
                source,
            });
        }
        data.resize(n, 0u8);
        self.cells = Cells::U8(data);
        Ok(())
    }

    /// Convert every cell into `T`, which must not be narrower than the current representation.
    ///
    /// The converted array is complete before the current one is released.
    pub(crate) fn transform_to<T: Counter>(&mut self) {
        debug_assert!(
            T::REPR >= self.repr(),
            "cannot narrow {} to {}",
            self.repr(),
            T::REPR
        );
        if T::REPR == self.repr() {
            return;
        }
        log::debug!(
            "widening {} cells: {} -> {}",
            self.len(),
            self.repr(),
            T::REPR
        );
        let converted: Vec<T> =
            visit_cells!(&self.cells, src => src.iter().map(T::from_counter).collect());
        debug_assert_eq!(converted.len(), self.len());
        self.cells = T::into_cells(converted);
    }

    /// Move to the next ladder member. No-op once the buffer holds `f64`.
    pub(crate) fn widen(&mut self) {
        match self.repr().next() {
            Some(Repr::U16) => self.transform_to::<u16>(),
            Some(Repr::U32) => self.transform_to::<u32>(),
            Some(Repr::U64) => self.transform_to::<u64>(),
            Some(Repr::LargeInt) => self.transform_to::<crate::LargeInt>(),
            Some(Repr::F64) => self.transform_to::<f64>(),
            Some(Repr::U8) | None => {}
        }
    }

    pub fn visit<V: Visitor>(&self, visitor: V) -> V::Output {
        visit_cells!(&self.cells, cells => visitor.visit(cells.as_slice()))
    }

    pub fn visit_mut<V: VisitorMut>(&mut self, visitor: V) -> V::Output {
        visit_cells!(&mut self.cells, cells => visitor.visit_mut(cells.as_mut_slice()))
    }

    /// Snapshot of one cell.
    pub fn value(&self, index: usize) -> Value {
        visit_cells!(&self.cells, cells => cells[index].to_value())
    }

    pub fn to_f64(&self, index: usize) -> f64 {
        visit_cells!(&self.cells, cells => cells[index].to_f64())
    }

    /// Move the cells out, leaving an empty `u8` buffer behind.
    pub fn take(&mut self) -> Buffer {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::large_int::LargeInt;

    struct Sum;
    impl Visitor for Sum {
        type Output = f64;
        fn visit<T: Counter>(self, cells: &[T]) -> f64 {
            cells.iter().map(Counter::to_f64).sum()
        }
    }

    struct Fill(u8);
    impl VisitorMut for Fill {
        type Output = usize;
        fn visit_mut<T: Counter>(self, cells: &mut [T]) -> usize {
            for cell in cells.iter_mut() {
                *cell = T::from_counter(&self.0);
            }
            cells.len()
        }
    }

    #[test]
    fn reset_zero_fills_narrowest() {
        let mut buffer = Buffer::from_cells(Cells::F64(vec![1.5, 2.5]));
        buffer.reset(4);
        assert_eq!(buffer.repr(), Repr::U8);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.visit(Sum), 0.0);

        buffer.reset(0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.repr(), Repr::U8);
    }

    #[test]
    fn try_reset_reports_impossible_sizes() {
        let mut buffer = Buffer::from_cells(Cells::U32(vec![7]));
        assert!(buffer.try_reset(3).is_ok());
        assert_eq!(buffer.len(), 3);

        let err = buffer.try_reset(usize::MAX).unwrap_err();
        let StorageError::Allocation { cells, repr, .. } = err;
        assert_eq!((cells, repr), (usize::MAX, Repr::U8));
        assert!(buffer.is_empty());
    }

    #[test]
    fn widen_walks_the_whole_ladder() {
        let mut buffer = Buffer::from_cells(Cells::U8(vec![3, 255]));
        for expected in &Repr::LADDER[1..] {
            buffer.widen();
            assert_eq!(buffer.repr(), *expected);
            assert_eq!(buffer.to_f64(0), 3.0);
            assert_eq!(buffer.to_f64(1), 255.0);
        }
        buffer.widen();
        assert_eq!(buffer.repr(), Repr::F64);
    }

    #[test]
    fn transform_skips_intermediate_members() {
        let mut buffer = Buffer::from_cells(Cells::U16(vec![1, 65535]));
        buffer.transform_to::<LargeInt>();
        assert_eq!(buffer.repr(), Repr::LargeInt);
        assert_eq!(buffer.value(1), Value::Unsigned(65535));
    }

    #[test]
    fn visit_mut_writes_in_place() {
        let mut buffer = Buffer::from_cells(Cells::U32(vec![0; 3]));
        assert_eq!(buffer.visit_mut(Fill(9)), 3);
        assert_eq!(buffer.repr(), Repr::U32);
        assert_eq!(buffer.visit(Sum), 27.0);
    }

    #[test]
    fn copy_is_deep_and_keeps_representation() {
        let original = Buffer::from_cells(Cells::U64(vec![1, 2]));
        let mut copy = original.clone();
        copy.transform_to::<f64>();
        assert_eq!(original.repr(), Repr::U64);
        assert_eq!(copy.repr(), Repr::F64);
    }

    #[test]
    fn take_leaves_empty_narrowest_buffer() {
        let mut buffer = Buffer::from_cells(Cells::LargeInt(vec![LargeInt::from(3u8)]));
        let moved = buffer.take();
        assert_eq!(moved.repr(), Repr::LargeInt);
        assert_eq!(moved.len(), 1);
        assert!(buffer.is_empty());
        assert_eq!(buffer.repr(), Repr::U8);
    }
}
