//! Sparse storage for the unbounded logical grid.
//!
//! Only coordinates that were written, read with materialize-on-read enabled,
//! or bound by a window refresh have an entry. Everything else is implicitly
//! at the default status supplied by the caller.

use std::collections::HashMap;

use crate::types::{CellCoord, CellUpdate};

/// Sparse `(row, col) -> status` map with lazy default-fill.
#[derive(Debug, Clone)]
pub struct LogicalGrid<S> {
    cells: HashMap<CellCoord, S>,
    init_on_access: bool,
    warn_threshold: usize,
    warned: bool,
}

impl<S: Clone> LogicalGrid<S> {
    /// Create an empty store.
    ///
    /// With `init_on_access`, [`get`](Self::get) stores the default of any
    /// unmaterialized coordinate it reads.
    pub fn new(init_on_access: bool) -> Self {
        Self {
            cells: HashMap::new(),
            init_on_access,
            warn_threshold: usize::MAX,
            warned: false,
        }
    }

    /// Log a warning once the number of materialized cells reaches `threshold`.
    #[must_use]
    pub fn with_warn_threshold(mut self, threshold: usize) -> Self {
        self.warn_threshold = threshold;
        self
    }

    /// Status at `coord`, falling back to `default(coord)` for unmaterialized cells.
    pub fn get<F>(&mut self, coord: CellCoord, default: F) -> S
    where
        F: FnOnce(CellCoord) -> S,
    {
        if let Some(status) = self.cells.get(&coord) {
            return status.clone();
        }
        let status = default(coord);
        if self.init_on_access {
            self.insert(coord, status.clone());
        }
        status
    }

    /// Status at `coord`, materializing the default if absent regardless of
    /// the read policy. Used when a render slot binds to a coordinate.
    pub fn get_or_materialize<F>(&mut self, coord: CellCoord, default: F) -> S
    where
        F: FnOnce(CellCoord) -> S,
    {
        if let Some(status) = self.cells.get(&coord) {
            return status.clone();
        }
        let status = default(coord);
        self.insert(coord, status.clone());
        status
    }

    /// Stored status at `coord` without any side effect.
    pub fn peek(&self, coord: CellCoord) -> Option<&S> {
        self.cells.get(&coord)
    }

    /// Store `status` at `coord`.
    pub fn set(&mut self, coord: CellCoord, status: S) {
        self.insert(coord, status);
    }

    /// Store every update, in order. Later writes to the same coordinate win.
    pub fn set_many<I>(&mut self, updates: I) -> usize
    where
        I: IntoIterator<Item = CellUpdate<S>>,
    {
        let mut applied = 0;
        for update in updates {
            self.insert(update.coord(), update.status);
            applied += 1;
        }
        applied
    }

    /// Reset every materialized coordinate to `default(coord)`.
    ///
    /// Entries are kept, only their status changes; coordinates that were never
    /// materialized stay that way.
    pub fn reset_materialized<F>(&mut self, mut default: F)
    where
        F: FnMut(CellCoord) -> S,
    {
        for (coord, status) in &mut self.cells {
            *status = default(*coord);
        }
    }

    pub fn is_materialized(&self, coord: CellCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Number of materialized coordinates.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over materialized entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &S)> {
        self.cells.iter().map(|(coord, status)| (*coord, status))
    }

    fn insert(&mut self, coord: CellCoord, status: S) {
        self.cells.insert(coord, status);
        if !self.warned && self.cells.len() >= self.warn_threshold {
            self.warned = true;
            tracing::warn!(
                materialized = self.cells.len(),
                threshold = self.warn_threshold,
                "logical grid store is large; entries are never evicted"
            );
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn diag(coord: CellCoord) -> i64 {
        coord.row + coord.col
    }

    #[test]
    fn test_get_without_materialize() {
        let mut grid: LogicalGrid<i64> = LogicalGrid::new(false);
        let c = CellCoord::new(3, 4);
        assert_eq!(grid.get(c, diag), 7);
        assert_eq!(grid.get(c, diag), 7);
        assert!(!grid.is_materialized(c));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_get_with_materialize_on_access() {
        let mut grid: LogicalGrid<i64> = LogicalGrid::new(true);
        let c = CellCoord::new(-2, 9);
        assert_eq!(grid.get(c, diag), 7);
        assert!(grid.is_materialized(c));
        assert_eq!(grid.peek(c), Some(&7));
    }

    #[test]
    fn test_get_or_materialize_ignores_read_policy() {
        let mut grid: LogicalGrid<i64> = LogicalGrid::new(false);
        let c = CellCoord::new(1, 1);
        assert_eq!(grid.get_or_materialize(c, diag), 2);
        assert!(grid.is_materialized(c));
        // Existing entries are returned as-is.
        grid.set(c, 40);
        assert_eq!(grid.get_or_materialize(c, diag), 40);
    }

    #[test]
    fn test_set_many_last_write_wins() {
        let mut grid: LogicalGrid<&str> = LogicalGrid::new(false);
        let applied = grid.set_many(vec![
            CellUpdate::new(0, 0, "x"),
            CellUpdate::new(0, 1, "y"),
            CellUpdate::new(0, 0, "z"),
        ]);
        assert_eq!(applied, 3);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.peek(CellCoord::new(0, 0)), Some(&"z"));
        assert_eq!(grid.peek(CellCoord::new(0, 1)), Some(&"y"));
    }

    #[test]
    fn test_reset_materialized_keeps_entries() {
        let mut grid: LogicalGrid<i64> = LogicalGrid::new(false);
        grid.set(CellCoord::new(5, 5), 99);
        grid.set(CellCoord::new(-1, 2), 99);
        grid.reset_materialized(diag);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.peek(CellCoord::new(5, 5)), Some(&10));
        assert_eq!(grid.peek(CellCoord::new(-1, 2)), Some(&1));
        assert!(!grid.is_materialized(CellCoord::new(0, 0)));
    }

    #[test]
    fn test_extreme_coordinates() {
        let mut grid: LogicalGrid<u8> = LogicalGrid::new(false);
        let far = CellCoord::new(i64::MIN, i64::MAX);
        grid.set(far, 1);
        assert_eq!(grid.get(far, |_| 0), 1);
    }

    #[test]
    fn test_warn_threshold_fires_once() {
        let mut grid: LogicalGrid<u8> = LogicalGrid::new(false).with_warn_threshold(2);
        grid.set(CellCoord::new(0, 0), 1);
        assert!(!grid.warned);
        grid.set(CellCoord::new(0, 1), 1);
        assert!(grid.warned);
        grid.set(CellCoord::new(0, 2), 1);
        assert!(grid.warned);
    }
}
