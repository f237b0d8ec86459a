use serde::{Deserialize, Serialize};

/// A logical cell position in the unbounded grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: i64,
    pub col: i64,
}

impl CellCoord {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

impl From<(i64, i64)> for CellCoord {
    fn from((row, col): (i64, i64)) -> Self {
        Self { row, col }
    }
}

/// One write in a `set_cells` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellUpdate<S> {
    pub row: i64,
    pub col: i64,
    pub status: S,
}

impl<S> CellUpdate<S> {
    pub fn new(row: i64, col: i64, status: S) -> Self {
        Self { row, col, status }
    }

    /// The logical coordinate this update writes to.
    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.col)
    }
}
