//! Continuous pan offset and drag handling.
//!
//! The offset is stored in viewbox units with the sign convention the grid has
//! always used: dragging content to the right decreases `horizontal`, dragging
//! it down increases `vertical`. The window only re-binds in whole-cell steps;
//! anything finer is drawn as a translation of the already-bound slots.

use crate::config::DragSpeed;
use crate::coords::{ceileyfloor, cells_to_units, integral_cell};
use crate::error::Result;
use crate::types::CellOffset;

/// Continuous pan offset plus the cell size used to convert it to cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetState {
    pub horizontal: f64,
    pub vertical: f64,
    cell_width: f64,
    cell_height: f64,
}

impl OffsetState {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            horizontal: 0.0,
            vertical: 0.0,
            cell_width,
            cell_height,
        }
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Whole-cell shift derived from the continuous offset.
    pub fn cell_offset(&self) -> CellOffset {
        CellOffset::new(
            ceileyfloor(self.vertical, self.cell_height),
            ceileyfloor(-self.horizontal, self.cell_width),
        )
    }

    /// Sub-cell remainder `(tx, ty)` left after [`cell_offset`](Self::cell_offset).
    ///
    /// Both components lie in `(-cell, 0]`.
    pub fn translation(&self) -> (f64, f64) {
        let cells = self.cell_offset();
        // A snapped whole-cell offset can leave a remainder of a few ulps above zero.
        (
            (-self.horizontal - cells_to_units(cells.col, self.cell_width)).min(0.0),
            (self.vertical - cells_to_units(cells.row, self.cell_height)).min(0.0),
        )
    }

    /// Place the offset so window index `(0, 0)` binds to `(row, col)`.
    pub fn align_to_cell(&mut self, row: i64, col: i64) {
        self.horizontal = cells_to_units(col, self.cell_width);
        self.vertical = -cells_to_units(row, self.cell_height);
    }
}

/// Pointer position and offset captured when a drag (re-)anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    x: f64,
    y: f64,
    horizontal: f64,
    vertical: f64,
}

/// Result of a pan step that the window has to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanStep {
    pub cell_offset: CellOffset,
    pub translation: (f64, f64),
}

/// Tracks the pan offset across drag gestures and `move_to` jumps.
///
/// `cell_offset()` and `translation()` describe what was last applied to the
/// window. A drag move that is held back by the fractional-remainder rule
/// updates the offset but not the applied values.
#[derive(Debug, Clone)]
pub struct PanController {
    offset: OffsetState,
    speed: DragSpeed,
    anchor: Option<DragAnchor>,
    last_pointer: (f64, f64),
    applied: CellOffset,
    translation: (f64, f64),
}

impl PanController {
    pub fn new(offset: OffsetState, speed: DragSpeed) -> Self {
        let applied = offset.cell_offset();
        let translation = offset.translation();
        Self {
            offset,
            speed,
            anchor: None,
            last_pointer: (0.0, 0.0),
            applied,
            translation,
        }
    }

    pub fn offset(&self) -> &OffsetState {
        &self.offset
    }

    /// Cell-offset the window is currently bound with.
    pub fn cell_offset(&self) -> CellOffset {
        self.applied
    }

    /// Sub-cell translation currently applied to the window.
    pub fn translation(&self) -> (f64, f64) {
        self.translation
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Start a drag at pointer position `(x, y)`.
    pub fn begin(&mut self, x: f64, y: f64) {
        self.last_pointer = (x, y);
        self.anchor = Some(DragAnchor {
            x,
            y,
            horizontal: self.offset.horizontal,
            vertical: self.offset.vertical,
        });
    }

    /// Continue a drag. Returns the step to apply when the window should
    /// re-render, i.e. when the new offset has a fractional cell remainder on
    /// both axes. An axis with zero drag speed never moves and is left out of
    /// that test.
    pub fn drag(&mut self, x: f64, y: f64) -> Option<PanStep> {
        let anchor = self.anchor?;
        self.last_pointer = (x, y);

        let dx = (x - anchor.x) * self.speed.horizontal;
        let dy = (y - anchor.y) * self.speed.vertical;
        self.offset.horizontal = anchor.horizontal - dx;
        self.offset.vertical = anchor.vertical + dy;

        let col_fractional = self.speed.horizontal == 0.0
            || (self.offset.horizontal / self.offset.cell_width).fract() != 0.0;
        let row_fractional = self.speed.vertical == 0.0
            || (self.offset.vertical / self.offset.cell_height).fract() != 0.0;
        if !(col_fractional && row_fractional) {
            return None;
        }

        self.reanchor();
        Some(self.apply())
    }

    /// Finish the drag and forget the anchor.
    pub fn end(&mut self) {
        self.anchor = None;
    }

    /// Jump so window index `(0, 0)` shows logical cell `(row, col)`.
    ///
    /// Any sub-cell translation is reset. A drag in progress continues from
    /// the new position.
    ///
    /// # Errors
    /// Returns [`UgridError::InvalidCoordinate`](crate::error::UgridError::InvalidCoordinate)
    /// if either argument is not a whole cell; the offset is left unchanged.
    pub fn move_to(&mut self, row: f64, col: f64) -> Result<PanStep> {
        let (row, col) = integral_cell(row, col)?;
        self.offset.align_to_cell(row, col);
        if self.anchor.is_some() {
            self.reanchor();
        }
        tracing::debug!(row, col, "pan moved to cell");
        Ok(self.apply())
    }

    fn reanchor(&mut self) {
        let (x, y) = self.last_pointer;
        self.anchor = Some(DragAnchor {
            x,
            y,
            horizontal: self.offset.horizontal,
            vertical: self.offset.vertical,
        });
    }

    fn apply(&mut self) -> PanStep {
        self.applied = self.offset.cell_offset();
        self.translation = self.offset.translation();
        PanStep {
            cell_offset: self.applied,
            translation: self.translation,
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
    use crate::error::UgridError;

    fn controller(speed: DragSpeed) -> PanController {
        PanController::new(OffsetState::new(10.0, 10.0), speed)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_initial_state() {
        let pan = controller(DragSpeed::default());
        assert_eq!(pan.cell_offset(), CellOffset::new(0, 0));
        assert_eq!(pan.translation(), (0.0, 0.0));
        assert!(!pan.is_dragging());
    }

    #[test]
    fn test_move_to_aligns_origin_slot() {
        let mut pan = controller(DragSpeed::default());
        let step = pan.move_to(3.0, -4.0).unwrap();
        assert_eq!(step.cell_offset, CellOffset::new(-3, 4));
        assert_eq!(step.translation, (0.0, 0.0));
        assert_eq!(pan.offset().horizontal, -40.0);
        assert_eq!(pan.offset().vertical, -30.0);
    }

    #[test]
    fn test_move_to_rejects_fraction_without_change() {
        let mut pan = controller(DragSpeed::default());
        pan.move_to(2.0, 2.0).unwrap();
        let before = *pan.offset();
        assert!(matches!(
            pan.move_to(1.5, 0.0),
            Err(UgridError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            pan.move_to(0.0, -2.5),
            Err(UgridError::InvalidCoordinate { .. })
        ));
        assert_eq!(*pan.offset(), before);
        assert_eq!(pan.cell_offset(), CellOffset::new(-2, -2));
    }

    #[test]
    fn test_drag_sub_cell_translation() {
        let mut pan = controller(DragSpeed::default());
        pan.begin(50.0, 50.0);
        let step = pan.drag(53.0, 52.0).unwrap();
        // Content follows the pointer: 0.3 cells right, 0.2 cells down.
        assert_eq!(step.cell_offset, CellOffset::new(1, 1));
        assert!(approx(step.translation.0, -7.0));
        assert!(approx(step.translation.1, -8.0));
        assert!(approx(pan.offset().horizontal, -3.0));
        assert!(approx(pan.offset().vertical, 2.0));
    }

    #[test]
    fn test_drag_holds_back_whole_cell_remainder() {
        let mut pan = controller(DragSpeed::default());
        pan.begin(0.0, 0.0);
        // Vertical offset stays exactly 0: no re-render.
        assert_eq!(pan.drag(5.0, 0.0), None);
        assert_eq!(pan.cell_offset(), CellOffset::new(0, 0));
        // The held-back move is not counted twice.
        let step = pan.drag(6.0, 1.0).unwrap();
        assert!(approx(pan.offset().horizontal, -6.0));
        assert!(approx(pan.offset().vertical, 1.0));
        assert_eq!(step.cell_offset, CellOffset::new(1, 1));
    }

    #[test]
    fn test_drag_with_locked_axis_still_renders() {
        let mut pan = controller(DragSpeed {
            horizontal: 1.0,
            vertical: 0.0,
        });
        pan.begin(0.0, 0.0);
        let step = pan.drag(15.0, 40.0).unwrap();
        assert_eq!(step.cell_offset, CellOffset::new(0, 2));
        assert_eq!(pan.offset().vertical, 0.0);
    }

    #[test]
    fn test_drag_speed_scales_and_inverts() {
        let mut pan = controller(DragSpeed {
            horizontal: -0.5,
            vertical: 2.0,
        });
        pan.begin(0.0, 0.0);
        pan.drag(3.0, 1.5).unwrap();
        assert!(approx(pan.offset().horizontal, 1.5));
        assert!(approx(pan.offset().vertical, 3.0));
    }

    #[test]
    fn test_drag_reanchors_between_moves() {
        let mut pan = controller(DragSpeed::default());
        pan.begin(0.0, 0.0);
        pan.drag(2.5, 2.5).unwrap();
        pan.drag(5.5, 5.5).unwrap();
        assert!(approx(pan.offset().horizontal, -5.5));
        assert!(approx(pan.offset().vertical, 5.5));
    }

    #[test]
    fn test_drag_without_begin_is_ignored() {
        let mut pan = controller(DragSpeed::default());
        assert_eq!(pan.drag(7.0, 7.0), None);
        assert_eq!(pan.offset().horizontal, 0.0);
    }

    #[test]
    fn test_end_clears_anchor() {
        let mut pan = controller(DragSpeed::default());
        pan.begin(1.0, 1.0);
        assert!(pan.is_dragging());
        pan.end();
        assert!(!pan.is_dragging());
        assert_eq!(pan.drag(9.0, 9.0), None);
    }

    #[test]
    fn test_move_to_during_drag_continues_from_new_position() {
        let mut pan = controller(DragSpeed::default());
        pan.begin(0.0, 0.0);
        pan.drag(2.5, 2.5).unwrap();
        pan.move_to(0.0, 0.0).unwrap();
        pan.drag(3.5, 3.5).unwrap();
        assert!(approx(pan.offset().horizontal, -1.0));
        assert!(approx(pan.offset().vertical, 1.0));
    }

    #[test]
    fn test_translation_stays_within_one_cell() {
        let mut offset = OffsetState::new(10.0, 10.0);
        for h in [-25.0, -10.0, -0.5, 0.0, 0.5, 10.0, 19.99] {
            offset.horizontal = h;
            offset.vertical = -h;
            let (tx, ty) = offset.translation();
            assert!(tx <= 0.0 && tx > -10.0, "tx {tx} for {h}");
            assert!(ty <= 0.0 && ty > -10.0, "ty {ty} for {h}");
        }
    }
}
