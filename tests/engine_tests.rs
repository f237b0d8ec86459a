//! Engine-level tests: store semantics seen through the grid, batching,
//! `move_to`, `clear` and what ends up on the render backend.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{
    assert_window_covers, build, counter_grid, counter_policy, painted_text, slot_centre,
};
use proptest::prelude::*;
use test_case::test_case;
use ugrid::{
    BinaryPolicy, CellCoord, CellOffset, CellUpdate, FnPolicy, GridSettings, PointerEventSource,
    ScriptedPointerSource, UgridError, WindowIndex,
};

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_set_read_and_move_scenario() {
    let mut grid = counter_grid(3, 3);
    grid.set_cell(1, 1, 9);
    assert_eq!(grid.get_cell(1, 1), 9);
    assert_eq!(grid.get_cell(0, 0), 0);

    let origin = WindowIndex::new(0, 0);
    assert_eq!(grid.bound_coord(origin), Some(CellCoord::new(0, 0)));

    grid.move_to(1.0, 1.0).unwrap();
    assert_eq!(grid.bound_coord(origin), Some(CellCoord::new(1, 1)));
    assert_eq!(painted_text(&grid, origin), "9");
    assert_eq!(grid.translation(), (0.0, 0.0));
    assert_window_covers(&grid);
}

#[test]
fn test_build_materializes_only_the_window() {
    let grid = counter_grid(3, 4);
    assert_eq!(grid.store().len(), 5 * 6);
    assert!(grid.store().is_materialized(CellCoord::new(-1, -1)));
    assert!(grid.store().is_materialized(CellCoord::new(3, 4)));
    assert!(!grid.store().is_materialized(CellCoord::new(4, 4)));
}

#[test]
fn test_initial_status_sees_logical_coordinates() {
    let mut grid = build(
        GridSettings::with_size(2, 2),
        FnPolicy::new(|row, col| row * 100 + col).with_text(|s: &i64, _, _| s.to_string()),
    );
    grid.move_to(-5.0, 7.0).unwrap();
    assert_eq!(painted_text(&grid, WindowIndex::new(0, 0)), "-493");
    assert_eq!(painted_text(&grid, WindowIndex::new(1, 1)), "-392");
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_get_cell_does_not_materialize_by_default() {
    let mut grid = counter_grid(2, 2);
    let before = grid.store().len();
    assert_eq!(grid.get_cell(1000, -1000), 0);
    assert_eq!(grid.get_cell(1000, -1000), 0);
    assert_eq!(grid.store().len(), before);
    assert!(!grid.store().is_materialized(CellCoord::new(1000, -1000)));
}

#[test]
fn test_get_cell_materializes_when_enabled() {
    let settings = GridSettings {
        init_cell_on_access: true,
        ..GridSettings::with_size(2, 2)
    };
    let mut grid = build(settings, counter_policy());
    let before = grid.store().len();
    assert_eq!(grid.get_cell(1000, -1000), 0);
    assert_eq!(grid.store().len(), before + 1);
    assert_eq!(grid.get_cell(1000, -1000), 0);
    assert_eq!(grid.store().len(), before + 1);
}

#[test]
fn test_get_cell_does_not_refresh() {
    let mut grid = counter_grid(2, 2);
    grid.get_cell(5, 5);
    assert_eq!(grid.refresh_count(), 1);
}

proptest! {
    #[test]
    fn prop_write_then_read(
        row in -1_000_000_i64..1_000_000,
        col in -1_000_000_i64..1_000_000,
        v in any::<i64>(),
    ) {
        let mut grid = counter_grid(2, 2);
        grid.set_cell(row, col, v);
        prop_assert_eq!(grid.get_cell(row, col), v);
        prop_assert_eq!(grid.store().peek(CellCoord::new(row, col)), Some(&v));
    }
}

// ============================================================================
// Writes and refresh accounting
// ============================================================================

#[test]
fn test_set_cell_refreshes_once() {
    let mut grid = counter_grid(3, 3);
    grid.set_cell(0, 0, 1);
    assert_eq!(grid.refresh_count(), 2);
    assert_eq!(grid.backend().frames(), 2);
}

#[test]
fn test_set_cells_is_one_refresh() {
    let mut grid = counter_grid(3, 3);
    let applied = grid.set_cells((0..50).map(|i| CellUpdate::new(i, -i, i)));
    assert_eq!(applied, 50);
    assert_eq!(grid.refresh_count(), 2);
    assert_eq!(grid.get_cell(49, -49), 49);
    assert_eq!(painted_text(&grid, WindowIndex::new(2, 0)), "0");
    assert_eq!(painted_text(&grid, WindowIndex::new(1, -1)), "1");
}

#[test]
fn test_set_cells_later_write_wins() {
    let mut grid = counter_grid(3, 3);
    grid.set_cells(vec![CellUpdate::new(0, 0, 1), CellUpdate::new(0, 0, 2)]);
    assert_eq!(grid.get_cell(0, 0), 2);
    assert_eq!(painted_text(&grid, WindowIndex::new(0, 0)), "2");
}

#[test]
fn test_click_after_set_cells_sees_whole_batch() {
    let mut grid = counter_grid(3, 3);
    grid.set_cells(vec![CellUpdate::new(1, 1, 5), CellUpdate::new(1, 2, 7)]);

    let target = WindowIndex::new(1, 1);
    let (x, y) = slot_centre(&grid, target);
    ScriptedPointerSource::click(x, y).pump(&mut grid);

    assert_eq!(grid.get_cell(1, 1), 6);
    assert_eq!(grid.get_cell(1, 2), 7);
    assert_eq!(painted_text(&grid, target), "6");
    assert_eq!(painted_text(&grid, WindowIndex::new(1, 2)), "7");
    assert_eq!(grid.refresh_count(), 2);
}

#[test]
fn test_empty_batch_still_refreshes() {
    let mut grid = counter_grid(3, 3);
    assert_eq!(grid.set_cells(Vec::new()), 0);
    assert_eq!(grid.refresh_count(), 2);
}

#[test]
fn test_extreme_coordinates_store_fine() {
    let mut grid = counter_grid(2, 2);
    grid.set_cell(i64::MAX, i64::MIN, 3);
    assert_eq!(grid.get_cell(i64::MAX, i64::MIN), 3);
}

// ============================================================================
// clear
// ============================================================================

#[test]
fn test_clear_resets_only_materialized_cells() {
    let mut grid = counter_grid(3, 3);
    grid.set_cell(100, 100, 7);
    grid.set_cell(1, 1, 7);
    let before = grid.store().len();

    grid.clear();
    assert_eq!(grid.store().len(), before);
    assert_eq!(grid.store().peek(CellCoord::new(100, 100)), Some(&0));
    assert_eq!(grid.get_cell(1, 1), 0);
    assert!(!grid.store().is_materialized(CellCoord::new(200, 200)));
    assert_eq!(painted_text(&grid, WindowIndex::new(1, 1)), "0");
    assert_eq!(grid.refresh_count(), 4);
}

#[test]
fn test_clear_uses_position_dependent_default() {
    let mut grid = build(
        GridSettings::with_size(2, 2),
        FnPolicy::new(|row, col| row - col),
    );
    grid.set_cell(10, 3, 0);
    grid.clear();
    assert_eq!(grid.store().peek(CellCoord::new(10, 3)), Some(&7));
}

// ============================================================================
// move_to
// ============================================================================

#[test_case(1.5, 0.0 ; "fractional row")]
#[test_case(0.0, -2.5 ; "fractional col")]
#[test_case(f64::NAN, 0.0 ; "nan row")]
#[test_case(0.0, f64::INFINITY ; "infinite col")]
#[test_case(1e300, 0.0 ; "beyond exact range")]
fn test_move_to_rejects(row: f64, col: f64) {
    let mut grid = counter_grid(3, 3);
    grid.move_to(2.0, -2.0).unwrap();
    let refreshes = grid.refresh_count();

    let err = grid.move_to(row, col).unwrap_err();
    assert!(matches!(err, UgridError::InvalidCoordinate { .. }));
    assert_eq!(grid.cell_offset(), CellOffset::new(-2, 2));
    assert_eq!(grid.refresh_count(), refreshes);
}

#[test_case(0, 0)]
#[test_case(1, 1)]
#[test_case(-7, 12)]
#[test_case(123_456_789, -987_654_321)]
fn test_move_to_binds_origin(row: i64, col: i64) {
    let mut grid = counter_grid(4, 3);
    grid.move_to(row as f64, col as f64).unwrap();
    assert_eq!(
        grid.bound_coord(WindowIndex::new(0, 0)),
        Some(CellCoord::new(row, col))
    );
    assert_eq!(
        grid.bound_coord(WindowIndex::new(-1, -1)),
        Some(CellCoord::new(row - 1, col - 1))
    );
    assert_window_covers(&grid);
}

#[test]
fn test_move_to_accepts_negative_zero() {
    let mut grid = counter_grid(2, 2);
    grid.move_to(-0.0, -0.0).unwrap();
    assert_eq!(grid.bound_coord(WindowIndex::new(0, 0)), Some(CellCoord::new(0, 0)));
}

// ============================================================================
// Headless output
// ============================================================================

#[test]
fn test_binary_snapshot_follows_moves() {
    let mut grid = build(GridSettings::with_size(3, 3), BinaryPolicy::default());
    grid.set_cells(vec![CellUpdate::new(0, 0, true), CellUpdate::new(1, 2, true)]);
    let glyph = |p: &ugrid::render::PaintedSlot| if p.fill == "black" { '#' } else { '.' };
    assert_eq!(grid.backend().snapshot(glyph), "#..\n..#\n...\n");

    grid.move_to(1.0, 1.0).unwrap();
    assert_eq!(grid.backend().snapshot(glyph), ".#.\n...\n...\n");
}

#[test]
fn test_settings_from_json_drive_geometry() {
    let settings = GridSettings::from_json(
        r#"{"rows": 4, "cols": 2, "viewbox": {"width": 40, "height": 200}}"#,
    )
    .unwrap();
    let grid = build(settings, counter_policy());
    assert_eq!(grid.geometry().cell_width, 20.0);
    assert_eq!(grid.geometry().cell_height, 50.0);
    assert_eq!(grid.bindings().count(), 6 * 4);
}
