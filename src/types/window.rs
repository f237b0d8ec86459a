use serde::{Deserialize, Serialize};

use super::CellCoord;

/// Fixed address of a render slot inside the viewport window.
///
/// Rows range over `[-1, rows]` and columns over `[-1, cols]`; the `-1` and
/// `rows`/`cols` entries form the one-cell overscan border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowIndex {
    pub row: i32,
    pub col: i32,
}

impl WindowIndex {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Integer number of cells the logical grid is shifted relative to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellOffset {
    pub row: i64,
    pub col: i64,
}

impl CellOffset {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Logical coordinate bound to `index` under this offset: `(r - off_r, c - off_c)`.
    pub fn bind(self, index: WindowIndex) -> CellCoord {
        CellCoord::new(
            i64::from(index.row) - self.row,
            i64::from(index.col) - self.col,
        )
    }
}
