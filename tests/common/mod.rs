//! Shared builders and assertions for the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::HashSet;

use ugrid::{
    CellCoord, CellPolicy, FnPolicy, GridSettings, HeadlessRenderer, UnboundedGrid, WindowIndex,
};

pub type TestGrid<P> = UnboundedGrid<P, HeadlessRenderer>;

/// Build a headless grid, panicking on invalid settings.
pub fn build<P: CellPolicy>(settings: GridSettings, policy: P) -> TestGrid<P> {
    UnboundedGrid::build(settings, policy, HeadlessRenderer::new()).unwrap()
}

/// Integer cells that start at 0, count up on click and show their value.
pub fn counter_policy() -> FnPolicy<i64> {
    FnPolicy::new(|_, _| 0)
        .with_on_click(|s: &i64, _, _| s + 1)
        .with_text(|s: &i64, _, _| s.to_string())
        .with_color(|s: &i64, _, _| if *s == 0 { "white".into() } else { "black".into() })
}

/// Counter grid of `rows` x `cols` with default settings otherwise.
pub fn counter_grid(rows: u32, cols: u32) -> TestGrid<FnPolicy<i64>> {
    build(GridSettings::with_size(rows, cols), counter_policy())
}

/// Centre of the slot at `index`, in grid-local viewbox units, with the
/// current translation applied.
pub fn slot_centre<P: CellPolicy>(grid: &TestGrid<P>, index: WindowIndex) -> (f64, f64) {
    let slot = grid.geometry().slot(index);
    let (tx, ty) = grid.translation();
    (slot.x + slot.width / 2.0 + tx, slot.y + slot.height / 2.0 + ty)
}

/// Text painted into the slot at `index`.
pub fn painted_text<P: CellPolicy>(grid: &TestGrid<P>, index: WindowIndex) -> String {
    grid.backend().painted(index).unwrap().text.clone()
}

/// Fill painted into the slot at `index`.
pub fn painted_fill<P: CellPolicy>(grid: &TestGrid<P>, index: WindowIndex) -> String {
    grid.backend().painted(index).unwrap().fill.clone()
}

/// Every slot is bound to `(r - off_r, c - off_c)`, with no duplicates.
pub fn assert_window_covers<P: CellPolicy>(grid: &TestGrid<P>) {
    let offset = grid.cell_offset();
    let mut seen = HashSet::new();
    let mut count = 0;
    for (index, coord) in grid.bindings() {
        let expected = CellCoord::new(
            i64::from(index.row) - offset.row,
            i64::from(index.col) - offset.col,
        );
        assert_eq!(coord, expected, "slot {index:?}");
        assert!(seen.insert(coord), "duplicate binding {coord:?}");
        count += 1;
    }
    assert_eq!(count, grid.geometry().slot_count());
}
