//! Histogram cell counters that never silently overflow.
//!
//! [`UnlimitedStorage`] keeps one contiguous array of counters whose element type
//! is chosen from a fixed ladder:
//!
//! ```text
//! u8 -> u16 -> u32 -> u64 -> LargeInt -> f64
//! ```
//!
//! A fresh storage starts with `u8` cells. Whenever an increment or an integral
//! add would overflow a cell, the whole array is converted to the next member and
//! the operation is retried, so integral fills stay exact while small counts stay
//! compact. Floating or negative weights and scaling move the array to `f64`.
//!
//! ```
//! use unlimited_storage::{Repr, UnlimitedStorage};
//!
//! let mut storage = UnlimitedStorage::with_size(4);
//! for _ in 0..300 {
//!     storage.get_mut(1).increment();
//! }
//! assert_eq!(storage.repr(), Repr::U16);
//! assert!(storage.get(1) == 300u16);
//! ```

pub mod buffer;
pub mod cell;
pub mod compare;
pub mod error;
pub mod iter;
pub mod ladder;
pub mod large_int;
mod promote;
pub mod storage;
pub mod value;

pub use buffer::Buffer;
pub use cell::{CellMut, CellRef};
pub use error::StorageError;
pub use iter::{CellsMut, Iter};
pub use ladder::{Cells, Counter, Repr, Visitor, VisitorMut};
pub use large_int::{LargeInt, ParseLargeIntError};
pub use log;
pub use storage::UnlimitedStorage;
pub use value::{Arithmetic, Value};
