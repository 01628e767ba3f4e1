//! Positional traversal over the cells of a [`Buffer`].

use std::{cmp::Ordering, iter::FusedIterator};

use crate::{
    buffer::Buffer,
    cell::{CellMut, CellRef},
};

/// Random-access iterator producing [`CellRef`]s in index order.
///
/// `==` and `<`/`>` compare positions within the same buffer, not cell values.
/// Iterators over different buffers are unequal and unordered. The method forms
/// `a.eq(b)`, `a.lt(b)` and `a.partial_cmp(b)` resolve to the [`Iterator`]
/// methods, which compare the remaining cells by value; use the operators or
/// `PartialOrd::partial_cmp(&a, &b)` for positions.
///
/// Every call to [`get`](Iter::get) or `next` builds a fresh cursor.
#[derive(Debug, Clone, Copy)]
pub struct Iter<'a> {
    buffer: &'a Buffer,
    pos: usize,
    end: usize,
}

impl<'a> Iter<'a> {
    pub fn new(buffer: &'a Buffer) -> Self {
        Self {
            buffer,
            pos: 0,
            end: buffer.len(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Cursor at the current position without advancing.
    pub fn get(&self) -> Option<CellRef<'a>> {
        (self.pos < self.end).then(|| CellRef::new(self.buffer, self.pos))
    }

    /// Iterator moved by `offset` cells. The result must stay within `0..=len`.
    pub fn offset(self, offset: isize) -> Self {
        let pos = self.pos as isize + offset;
        debug_assert!(
            pos >= 0 && pos as usize <= self.buffer.len(),
            "iterator offset {offset} leaves the buffer"
        );
        Self {
            pos: pos as usize,
            end: self.end.max(pos as usize),
            ..self
        }
    }

    /// Signed number of cells from `self` to `other`.
    pub fn distance(&self, other: &Iter<'_>) -> isize {
        other.pos as isize - self.pos as isize
    }

    fn same_buffer(&self, other: &Iter<'_>) -> bool {
        std::ptr::eq(self.buffer, other.buffer)
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = CellRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.get()?;
        self.pos += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.pos;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.pos = self.pos.saturating_add(n).min(self.end);
        self.next()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        self.end -= 1;
        Some(CellRef::new(self.buffer, self.end))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

impl PartialEq for Iter<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same_buffer(other) && self.pos == other.pos
    }
}

impl PartialOrd for Iter<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.same_buffer(other).then(|| self.pos.cmp(&other.pos))
    }
}

/// Lending traversal producing one [`CellMut`] at a time.
///
/// Only one mutable cursor can be alive, so this is not an [`Iterator`];
/// call [`next_cell`](CellsMut::next_cell) in a `while let` loop instead.
#[derive(Debug)]
pub struct CellsMut<'a> {
    buffer: &'a mut Buffer,
    pos: usize,
}

impl<'a> CellsMut<'a> {
    pub fn new(buffer: &'a mut Buffer) -> Self {
        Self { buffer, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        debug_assert!(pos <= self.buffer.len());
        self.pos = pos;
    }

    pub fn next_cell(&mut self) -> Option<CellMut<'_>> {
        if self.pos >= self.buffer.len() {
            return None;
        }
        let index = self.pos;
        self.pos += 1;
        Some(CellMut::new(self.buffer, index))
    }
}
