//! Pointer-driven behaviour: drag panning, click toggling and hover highlight.
//!
//! Positions are in viewbox units. With the default 100 x 100 viewbox a
//! 10 x 10 grid has 10 x 10 cells.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_window_covers, build, counter_grid, counter_policy, painted_fill, slot_centre};
use ugrid::{
    CellCoord, CellOffset, DragSpeed, GridSettings, PointerEvent, PointerEventSource, PointerSink,
    ScriptedPointerSource, WindowIndex,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn play<S: PointerSink>(sink: &mut S, events: Vec<PointerEvent>) {
    ScriptedPointerSource::new(events).pump(sink);
}

// ============================================================================
// Drag panning
// ============================================================================

#[test]
fn test_sub_cell_drag_translates_and_rebinds() {
    let mut grid = counter_grid(10, 10);
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 50.0, y: 50.0 },
            PointerEvent::Move { x: 55.5, y: 50.5 },
        ],
    );
    assert!(grid.is_dragging());
    assert_eq!(grid.refresh_count(), 2);
    assert_eq!(grid.cell_offset(), CellOffset::new(1, 1));
    let (tx, ty) = grid.translation();
    assert!(approx(tx, -4.5) && approx(ty, -9.5), "({tx}, {ty})");
    assert_eq!(grid.backend().translation(), (tx, ty));
    // Logical (0, 0) is drawn 5.5 right and 0.5 down of where it started.
    let slot = grid.geometry().slot(WindowIndex::new(1, 1));
    assert!(approx(slot.x + tx, 5.5));
    assert!(approx(slot.y + ty, 0.5));
    assert_eq!(grid.bound_coord(WindowIndex::new(1, 1)), Some(CellCoord::new(0, 0)));
    assert_window_covers(&grid);
}

#[test]
fn test_whole_cell_remainder_skips_refresh() {
    let mut grid = counter_grid(10, 10);
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 50.0, y: 50.0 },
            // Vertical offset stays exactly zero.
            PointerEvent::Move { x: 53.0, y: 50.0 },
            // Horizontal offset lands on a whole cell.
            PointerEvent::Move { x: 60.0, y: 51.0 },
        ],
    );
    assert_eq!(grid.refresh_count(), 1);
    assert_eq!(grid.cell_offset(), CellOffset::new(0, 0));

    play(&mut grid, vec![PointerEvent::Move { x: 62.5, y: 51.0 }]);
    assert_eq!(grid.refresh_count(), 2);
    // 12.5 units right, 1 unit down: nothing of the skipped moves is lost or doubled.
    let (tx, ty) = grid.translation();
    assert_eq!(grid.cell_offset(), CellOffset::new(1, 2));
    assert!(approx(tx, -7.5) && approx(ty, -9.0), "({tx}, {ty})");
}

#[test]
fn test_long_drag_pans_many_cells() {
    let mut grid = counter_grid(10, 10);
    ScriptedPointerSource::drag((0.5, 0.5), (-72.0, -33.0), 29).pump(&mut grid);
    assert!(!grid.is_dragging());
    // Content moved 72.5 left and 33.5 up.
    let origin = grid.bound_coord(WindowIndex::new(0, 0)).unwrap();
    assert_eq!(origin, CellCoord::new(3, 7));
    let (tx, ty) = grid.translation();
    assert!(approx(tx, -2.5) && approx(ty, -3.5), "({tx}, {ty})");
    assert_window_covers(&grid);
}

#[test]
fn test_drag_speed_scales_pan() {
    let settings = GridSettings {
        drag_speed: DragSpeed {
            horizontal: 2.0,
            vertical: -1.0,
        },
        ..GridSettings::with_size(10, 10)
    };
    let mut grid = build(settings, counter_policy());
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 0.0, y: 0.0 },
            PointerEvent::Move { x: 7.5, y: 4.5 },
        ],
    );
    // 15 right, 4.5 up.
    assert_eq!(grid.cell_offset(), CellOffset::new(0, 2));
    let (tx, ty) = grid.translation();
    assert!(approx(tx, -5.0) && approx(ty, -4.5), "({tx}, {ty})");
}

#[test]
fn test_locked_axis_still_pans_the_other() {
    let settings = GridSettings {
        drag_speed: DragSpeed {
            horizontal: 1.0,
            vertical: 0.0,
        },
        ..GridSettings::with_size(10, 10)
    };
    let mut grid = build(settings, counter_policy());
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 0.0, y: 0.0 },
            PointerEvent::Move { x: -25.0, y: 40.0 },
        ],
    );
    assert_eq!(grid.refresh_count(), 2);
    assert_eq!(grid.bound_coord(WindowIndex::new(0, 0)), Some(CellCoord::new(0, 2)));
    assert_eq!(grid.translation().1, 0.0);
}

#[test]
fn test_drag_disabled() {
    let settings = GridSettings {
        translate_on_drag: false,
        ..GridSettings::with_size(10, 10)
    };
    let mut grid = build(settings, counter_policy());
    ScriptedPointerSource::drag((10.0, 10.0), (45.5, 45.5), 5).pump(&mut grid);
    assert!(!grid.is_dragging());
    assert_eq!(grid.cell_offset(), CellOffset::new(0, 0));
    assert_eq!(grid.refresh_count(), 1);
}

#[test]
fn test_move_to_during_drag() {
    let mut grid = counter_grid(10, 10);
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 0.0, y: 0.0 },
            PointerEvent::Move { x: 3.5, y: 3.5 },
        ],
    );
    grid.move_to(20.0, 20.0).unwrap();
    assert_eq!(grid.translation(), (0.0, 0.0));
    play(&mut grid, vec![PointerEvent::Move { x: 5.5, y: 5.5 }]);
    // Continues from the new position: 2 units of motion since the jump.
    let (tx, ty) = grid.translation();
    assert!(approx(tx, -8.0) && approx(ty, -8.0), "({tx}, {ty})");
    assert_eq!(grid.bound_coord(WindowIndex::new(1, 1)), Some(CellCoord::new(20, 20)));
}

#[test]
fn test_pointer_leave_ends_drag() {
    let mut grid = counter_grid(10, 10);
    play(
        &mut grid,
        vec![PointerEvent::Start { x: 0.0, y: 0.0 }, PointerEvent::Leave],
    );
    assert!(!grid.is_dragging());
    play(&mut grid, vec![PointerEvent::Move { x: 30.5, y: 30.5 }]);
    assert_eq!(grid.refresh_count(), 1);
}

// ============================================================================
// Click
// ============================================================================

#[test]
fn test_click_toggles_one_cell() {
    let mut grid = counter_grid(10, 10);
    let paints = grid.backend().paint_count();
    ScriptedPointerSource::click(15.0, 25.0).pump(&mut grid);
    assert_eq!(grid.get_cell(2, 1), 1);
    assert_eq!(grid.refresh_count(), 1);
    assert_eq!(grid.backend().paint_count(), paints + 1);
    assert_eq!(painted_fill(&grid, WindowIndex::new(2, 1)), "black");

    ScriptedPointerSource::click(15.0, 25.0).pump(&mut grid);
    assert_eq!(grid.get_cell(2, 1), 2);
}

#[test]
fn test_click_after_pan_hits_logical_cell() {
    let mut grid = counter_grid(10, 10);
    grid.move_to(-4.0, 9.0).unwrap();
    let (x, y) = slot_centre(&grid, WindowIndex::new(3, 3));
    ScriptedPointerSource::click(x, y).pump(&mut grid);
    assert_eq!(grid.get_cell(-1, 12), 1);
}

#[test]
fn test_click_on_translated_window() {
    let mut grid = counter_grid(10, 10);
    ScriptedPointerSource::drag((50.0, 50.0), (54.5, 53.5), 1).pump(&mut grid);
    // Logical (0, 0) is now drawn at (4.5, 3.5)..(14.5, 13.5).
    ScriptedPointerSource::click(14.0, 4.0).pump(&mut grid);
    assert_eq!(grid.get_cell(0, 0), 1);
}

#[test]
fn test_drag_suppresses_click() {
    let mut grid = counter_grid(10, 10);
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 15.0, y: 25.0 },
            PointerEvent::Move { x: 15.5, y: 25.5 },
            PointerEvent::Move { x: 15.0, y: 25.0 },
            PointerEvent::End,
        ],
    );
    assert!(grid.store().iter().all(|(_, s)| *s == 0));
}

#[test]
fn test_stationary_move_keeps_click() {
    let mut grid = counter_grid(10, 10);
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 15.0, y: 25.0 },
            PointerEvent::Move { x: 15.0, y: 25.0 },
            PointerEvent::End,
        ],
    );
    assert_eq!(grid.get_cell(2, 1), 1);
}

#[test]
fn test_click_disabled() {
    let settings = GridSettings {
        update_on_click: false,
        ..GridSettings::with_size(10, 10)
    };
    let mut grid = build(settings, counter_policy());
    ScriptedPointerSource::click(15.0, 25.0).pump(&mut grid);
    assert_eq!(grid.get_cell(2, 1), 0);
}

#[test]
fn test_click_without_drag_requires_same_slot() {
    let settings = GridSettings {
        translate_on_drag: false,
        ..GridSettings::with_size(10, 10)
    };
    let mut grid = build(settings, counter_policy());
    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 15.0, y: 25.0 },
            PointerEvent::Move { x: 18.0, y: 27.0 },
            PointerEvent::End,
        ],
    );
    assert_eq!(grid.get_cell(2, 1), 1);

    play(
        &mut grid,
        vec![
            PointerEvent::Start { x: 15.0, y: 25.0 },
            PointerEvent::Move { x: 35.0, y: 25.0 },
            PointerEvent::End,
        ],
    );
    assert_eq!(grid.get_cell(2, 1), 1);
    assert_eq!(grid.get_cell(2, 3), 0);
}

#[test]
fn test_end_without_start_is_ignored() {
    let mut grid = counter_grid(10, 10);
    play(&mut grid, vec![PointerEvent::End]);
    assert!(grid.store().iter().all(|(_, s)| *s == 0));
}

// ============================================================================
// Hover
// ============================================================================

fn hover_grid() -> common::TestGrid<ugrid::FnPolicy<i64>> {
    let settings = GridSettings {
        highlight_hovered_cell: true,
        hovered_cell_color: "yellow".to_string(),
        translate_on_drag: false,
        ..GridSettings::with_size(10, 10)
    };
    build(settings, counter_policy())
}

#[test]
fn test_hover_highlights_and_restores() {
    let mut grid = hover_grid();
    let a = WindowIndex::new(2, 1);
    let b = WindowIndex::new(2, 3);

    play(&mut grid, vec![PointerEvent::Move { x: 15.0, y: 25.0 }]);
    assert_eq!(grid.hovered(), Some(a));
    assert_eq!(painted_fill(&grid, a), "yellow");

    play(&mut grid, vec![PointerEvent::Move { x: 35.0, y: 25.0 }]);
    assert_eq!(painted_fill(&grid, a), "white");
    assert_eq!(painted_fill(&grid, b), "yellow");

    play(&mut grid, vec![PointerEvent::Leave]);
    assert_eq!(grid.hovered(), None);
    assert_eq!(painted_fill(&grid, b), "white");
    assert_eq!(grid.refresh_count(), 1);
}

#[test]
fn test_click_under_hover_shows_status_color() {
    let mut grid = hover_grid();
    let a = WindowIndex::new(2, 1);
    let b = WindowIndex::new(2, 3);
    ScriptedPointerSource::click(15.0, 25.0).pump(&mut grid);
    assert_eq!(grid.get_cell(2, 1), 1);
    assert_eq!(grid.hovered(), Some(a));
    assert_eq!(painted_fill(&grid, a), "black");

    // Moving inside the clicked slot keeps the status color.
    play(&mut grid, vec![PointerEvent::Move { x: 16.0, y: 26.0 }]);
    assert_eq!(painted_fill(&grid, a), "black");

    // Leaving and re-entering brings the highlight back.
    play(&mut grid, vec![PointerEvent::Move { x: 35.0, y: 25.0 }]);
    assert_eq!(painted_fill(&grid, a), "black");
    assert_eq!(painted_fill(&grid, b), "yellow");
    play(&mut grid, vec![PointerEvent::Move { x: 15.0, y: 25.0 }]);
    assert_eq!(painted_fill(&grid, a), "yellow");

    play(&mut grid, vec![PointerEvent::Leave]);
    assert_eq!(painted_fill(&grid, a), "black");
}

#[test]
fn test_refresh_after_click_keeps_status_color() {
    let mut grid = hover_grid();
    ScriptedPointerSource::click(15.0, 25.0).pump(&mut grid);
    grid.refresh();
    assert_eq!(painted_fill(&grid, WindowIndex::new(2, 1)), "black");
}

#[test]
fn test_hover_survives_refresh() {
    let mut grid = hover_grid();
    play(&mut grid, vec![PointerEvent::Move { x: 15.0, y: 25.0 }]);
    grid.set_cell(50, 50, 1);
    assert_eq!(painted_fill(&grid, WindowIndex::new(2, 1)), "yellow");
}

#[test]
fn test_hover_off_paints_nothing() {
    let mut grid = counter_grid(10, 10);
    let paints = grid.backend().paint_count();
    play(
        &mut grid,
        vec![
            PointerEvent::Move { x: 15.0, y: 25.0 },
            PointerEvent::Move { x: 35.0, y: 25.0 },
            PointerEvent::Leave,
        ],
    );
    assert_eq!(grid.backend().paint_count(), paints);
}
