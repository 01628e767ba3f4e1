//! Overflow-free cell arithmetic.
//!
//! Each operation first tries to work on the current representation. If that
//! would overflow, the whole buffer is widened to the next ladder member and the
//! operation is retried. [`LargeInt`] and `f64` cells never overflow, so the retry
//! loop always terminates.
//!
//! Policy:
//! - adding a float or a negative number moves the buffer to `f64` for good,
//!   since the integer ladder only holds nonnegative values;
//! - scaling always moves the buffer to `f64` first;
//! - nothing ever moves back towards a narrower member.

use crate::{
    buffer::Buffer,
    ladder::{Cells, FixedWidth, visit_cells},
    large_int::LargeInt,
    value::{Arithmetic, Value},
};

impl Buffer {
    /// `cell += 1`
    pub fn increment(&mut self, index: usize) {
        loop {
            let done = match &mut self.cells {
                Cells::U8(cells) => cells[index].checked_increment(),
                Cells::U16(cells) => cells[index].checked_increment(),
                Cells::U32(cells) => cells[index].checked_increment(),
                Cells::U64(cells) => cells[index].checked_increment(),
                Cells::LargeInt(cells) => {
                    cells[index].increment();
                    true
                }
                Cells::F64(cells) => {
                    cells[index] += 1.0;
                    true
                }
            };
            if done {
                return;
            }
            self.widen();
        }
    }

    /// `cell += x`
    pub fn add<T: Arithmetic>(&mut self, index: usize, x: T) {
        self.add_value(index, x.into_value());
    }

    /// `x` is owned here, so it can't change when the array is replaced,
    /// even if it was read from the very cell being updated.
    pub(crate) fn add_value(&mut self, index: usize, x: Value) {
        match x {
            Value::Unsigned(x) => self.add_unsigned(index, x),
            Value::Signed(x) => match u64::try_from(x) {
                Ok(x) => self.add_unsigned(index, x),
                Err(_) => self.add_float(index, x as f64),
            },
            Value::Large(x) => match x.to_u64() {
                Some(x) => self.add_unsigned(index, x),
                None => self.add_large(index, x),
            },
            Value::Float(x) => self.add_float(index, x),
        }
    }

    fn add_unsigned(&mut self, index: usize, x: u64) {
        loop {
            let done = match &mut self.cells {
                Cells::U8(cells) => cells[index].checked_add_u64(x),
                Cells::U16(cells) => cells[index].checked_add_u64(x),
                Cells::U32(cells) => cells[index].checked_add_u64(x),
                Cells::U64(cells) => cells[index].checked_add_u64(x),
                Cells::LargeInt(cells) => {
                    cells[index].add_u64(x);
                    true
                }
                Cells::F64(cells) => {
                    cells[index] += x as f64;
                    true
                }
            };
            if done {
                return;
            }
            self.widen();
        }
    }

    fn add_large(&mut self, index: usize, x: LargeInt) {
        match &mut self.cells {
            Cells::LargeInt(cells) => cells[index] += &x,
            Cells::F64(cells) => cells[index] += x.to_f64(),
            _ => {
                self.transform_to::<LargeInt>();
                self.add_large(index, x);
            }
        }
    }

    fn add_float(&mut self, index: usize, x: f64) {
        match &mut self.cells {
            Cells::F64(cells) => cells[index] += x,
            _ => {
                log::warn!(
                    "adding {x} to a {} cell, storage falls back to f64 and can no longer guarantee exact counts",
                    self.repr()
                );
                self.transform_to::<f64>();
                self.add_float(index, x);
            }
        }
    }

    /// `cell = x`, implemented as zeroing the cell and adding `x`.
    pub fn set<T: Arithmetic>(&mut self, index: usize, x: T) {
        let x = x.into_value();
        visit_cells!(&mut self.cells, cells => cells[index] = Default::default());
        self.add_value(index, x);
    }

    /// `cell *= x`
    pub fn scale(&mut self, index: usize, x: f64) {
        match &mut self.cells {
            Cells::F64(cells) => cells[index] *= x,
            _ => {
                self.transform_to::<f64>();
                self.scale(index, x);
            }
        }
    }

    /// Multiply every cell by `x`.
    pub fn scale_all(&mut self, x: f64) {
        match &mut self.cells {
            Cells::F64(cells) => cells.iter_mut().for_each(|cell| *cell *= x),
            _ => {
                self.transform_to::<f64>();
                self.scale_all(x);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::Repr;

    fn buffer(n: usize) -> Buffer {
        let mut b = Buffer::new();
        b.reset(n);
        b
    }

    #[test]
    fn increment_widens_once_at_256() {
        let mut b = buffer(2);
        for _ in 0..255 {
            b.increment(0);
        }
        assert_eq!(b.repr(), Repr::U8);
        b.increment(0);
        assert_eq!(b.repr(), Repr::U16);
        assert_eq!(b.value(0), Value::Unsigned(256));
        assert_eq!(b.value(1), Value::Unsigned(0));
    }

    #[test]
    fn increment_past_u64_reaches_large_int() {
        let mut b = Buffer::from_cells(Cells::U64(vec![u64::MAX]));
        b.increment(0);
        assert_eq!(b.repr(), Repr::LargeInt);
        assert_eq!(b.value(0), Value::Large(LargeInt::from_words(&[0, 1])));
        b.increment(0);
        assert_eq!(b.value(0), Value::Large(LargeInt::from_words(&[1, 1])));
    }

    #[test]
    fn add_retries_until_it_fits() {
        let mut b = buffer(1);
        b.add(0, 70_000u32);
        assert_eq!(b.repr(), Repr::U32);
        assert_eq!(b.value(0), Value::Unsigned(70_000));

        b.add(0, u64::MAX);
        assert_eq!(b.repr(), Repr::LargeInt);
        assert_eq!(
            b.value(0),
            Value::Large(LargeInt::from_words(&[70_000 - 1, 1]))
        );
    }

    #[test]
    fn add_nonnegative_signed_stays_integral() {
        let mut b = buffer(1);
        b.add(0, 300i32);
        assert_eq!(b.repr(), Repr::U16);
        assert_eq!(b.value(0), Value::Unsigned(300));
    }

    #[test]
    fn add_negative_moves_everything_to_float() {
        let mut b = buffer(3);
        b.add(1, 7u8);
        b.add(0, -2i64);
        assert_eq!(b.repr(), Repr::F64);
        assert_eq!(b.to_f64(0), -2.0);
        assert_eq!(b.to_f64(1), 7.0);
        // integer adds stay on f64 from now on
        b.add(2, 1u8);
        assert_eq!(b.repr(), Repr::F64);
        assert_eq!(b.to_f64(2), 1.0);
    }

    #[test]
    fn add_float_is_irreversible() {
        let mut b = buffer(1);
        b.add(0, 0.5f32);
        assert_eq!(b.repr(), Repr::F64);
        b.increment(0);
        assert_eq!(b.to_f64(0), 1.5);
    }

    #[test]
    fn add_large_operand() {
        let mut b = buffer(2);
        b.add(0, LargeInt::from(12u8));
        assert_eq!(b.repr(), Repr::U8);
        assert_eq!(b.value(0), Value::Unsigned(12));

        let big = LargeInt::from_words(&[5, 2]);
        b.add(1, &big);
        assert_eq!(b.repr(), Repr::LargeInt);
        assert_eq!(b.value(1), Value::Large(big.clone()));
        assert_eq!(b.value(0), Value::Unsigned(12));

        b.add(1, &big);
        assert_eq!(b.value(1), Value::Large(LargeInt::from_words(&[10, 4])));

        b.add(0, 0.25f64);
        b.add(1, &big);
        assert_eq!(b.repr(), Repr::F64);
        assert_eq!(b.to_f64(0), 12.25);
    }

    #[test]
    fn set_zeroes_then_adds() {
        let mut b = buffer(2);
        b.add(0, 200u8);
        b.set(0, 1000u16);
        assert_eq!(b.repr(), Repr::U16);
        assert_eq!(b.value(0), Value::Unsigned(1000));
        b.set(0, 3u8);
        assert_eq!(b.value(0), Value::Unsigned(3));
        b.set(1, -1i32);
        assert_eq!(b.repr(), Repr::F64);
        assert_eq!(b.to_f64(1), -1.0);
    }

    #[test]
    fn self_aliased_add_matches_snapshot() {
        let mut aliased = buffer(1);
        let mut snapshotted = buffer(1);
        aliased.add(0, 200u8);
        snapshotted.add(0, 200u8);

        aliased.add_value(0, aliased.value(0));
        let snapshot = 200u64;
        snapshotted.add(0, snapshot);

        assert_eq!(aliased.repr(), Repr::U16);
        assert_eq!(aliased.value(0), snapshotted.value(0));
        assert_eq!(aliased.value(0), Value::Unsigned(400));
    }

    #[test]
    fn scaling_always_goes_float() {
        let mut b = buffer(3);
        b.add(0, 2u8);
        b.add(1, 3u8);
        b.scale(1, 1.0);
        assert_eq!(b.repr(), Repr::F64);

        let mut all = buffer(2);
        all.add(0, 4u8);
        all.add(1, 6u8);
        all.scale_all(0.5);
        assert_eq!(all.repr(), Repr::F64);
        assert_eq!(all.to_f64(0), 2.0);
        assert_eq!(all.to_f64(1), 3.0);

        let mut empty = Buffer::new();
        empty.scale_all(2.0);
        assert_eq!(empty.repr(), Repr::F64);
        assert!(empty.is_empty());
    }
}
