use std::collections::TryReserveError;

use thiserror::Error;

use crate::ladder::Repr;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to allocate {cells} cells of {repr}: {source}")]
    Allocation {
        cells: usize,
        repr: Repr,
        source: TryReserveError,
    },
}
