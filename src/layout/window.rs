//! The fixed window of render slots.

use crate::config::{CellBorder, GridSettings, ViewBox};
use crate::coords::cells_to_i64;
use crate::error::Result;
use crate::types::{CellCoord, CellOffset, WindowIndex};

/// Fixed rectangle of one render slot plus where its text is anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub index: WindowIndex,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Horizontal text anchor (cell centre).
    pub text_x: f64,
    /// Text baseline, a little below the vertical centre.
    pub text_y: f64,
    pub font_size: f64,
}

/// Shape of the window: dimensions, cell size and cosmetic settings the
/// render backend needs when it mounts.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowGeometry {
    pub rows: i32,
    pub cols: i32,
    pub cell_width: f64,
    pub cell_height: f64,
    pub viewbox: ViewBox,
    pub cell_border: CellBorder,
    pub grid_border: String,
}

impl WindowGeometry {
    /// Derive the geometry from validated settings.
    ///
    /// # Errors
    /// Returns an error if the settings fail validation.
    pub fn from_settings(settings: &GridSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            rows: i32::try_from(settings.rows).unwrap_or(i32::MAX),
            cols: i32::try_from(settings.cols).unwrap_or(i32::MAX),
            cell_width: settings.cell_width(),
            cell_height: settings.cell_height(),
            viewbox: settings.viewbox,
            cell_border: settings.cell_border.clone(),
            grid_border: settings.grid_border.clone(),
        })
    }

    /// Total number of slots, border included.
    pub fn slot_count(&self) -> usize {
        self.span_rows() * self.span_cols()
    }

    /// Every window index in row-major order, border included.
    pub fn indices(&self) -> impl Iterator<Item = WindowIndex> + '_ {
        (-1..=self.rows)
            .flat_map(move |row| (-1..=self.cols).map(move |col| WindowIndex::new(row, col)))
    }

    pub fn contains(&self, index: WindowIndex) -> bool {
        (-1..=self.rows).contains(&index.row) && (-1..=self.cols).contains(&index.col)
    }

    /// Row-major position of `index` in a slot array.
    pub fn position(&self, index: WindowIndex) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let row = usize::try_from(index.row + 1).ok()?;
        let col = usize::try_from(index.col + 1).ok()?;
        Some(row * self.span_cols() + col)
    }

    /// Rectangle and text anchor of the slot at `index`.
    pub fn slot(&self, index: WindowIndex) -> SlotGeometry {
        let w = self.cell_width;
        let h = self.cell_height;
        let x = f64::from(index.col) * w;
        let y = f64::from(index.row) * h;
        SlotGeometry {
            index,
            x,
            y,
            width: w,
            height: h,
            text_x: x + w / 2.0,
            text_y: y + h / 1.6,
            font_size: w.min(h) / 2.0,
        }
    }

    /// Slot under the grid-local point `(x, y)` when the slots are drawn
    /// shifted by `translation`.
    pub fn index_at(&self, x: f64, y: f64, translation: (f64, f64)) -> Option<WindowIndex> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let col = cells_to_i64(((x - translation.0) / self.cell_width).floor());
        let row = cells_to_i64(((y - translation.1) / self.cell_height).floor());
        let index = WindowIndex::new(i32::try_from(row).ok()?, i32::try_from(col).ok()?);
        self.contains(index).then_some(index)
    }

    fn span_rows(&self) -> usize {
        usize::try_from(self.rows).unwrap_or(0) + 2
    }

    fn span_cols(&self) -> usize {
        usize::try_from(self.cols).unwrap_or(0) + 2
    }
}

/// A render slot: a fixed window index and the logical cell it currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSlot {
    pub index: WindowIndex,
    pub bound: CellCoord,
}

/// The `(rows + 2) x (cols + 2)` array of render slots.
///
/// Slots are allocated once; only their bindings change.
#[derive(Debug, Clone)]
pub struct ViewportWindow {
    geometry: WindowGeometry,
    slots: Vec<RenderSlot>,
    offset: CellOffset,
}

impl ViewportWindow {
    /// Allocate every slot, bound for a zero cell-offset.
    pub fn new(geometry: WindowGeometry) -> Self {
        let offset = CellOffset::default();
        let slots = geometry
            .indices()
            .map(|index| RenderSlot {
                index,
                bound: offset.bind(index),
            })
            .collect();
        Self {
            geometry,
            slots,
            offset,
        }
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    /// Cell-offset of the current bindings.
    pub fn offset(&self) -> CellOffset {
        self.offset
    }

    /// Re-bind every slot to `(r - off_r, c - off_c)`.
    pub fn rebind(&mut self, offset: CellOffset) {
        self.offset = offset;
        for slot in &mut self.slots {
            slot.bound = offset.bind(slot.index);
        }
    }

    pub fn slots(&self) -> &[RenderSlot] {
        &self.slots
    }

    pub fn slot(&self, index: WindowIndex) -> Option<&RenderSlot> {
        self.geometry
            .position(index)
            .and_then(|pos| self.slots.get(pos))
    }

    /// Logical coordinate currently shown at `index`.
    pub fn bound_coord(&self, index: WindowIndex) -> Option<CellCoord> {
        self.slot(index).map(|slot| slot.bound)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
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
    use std::collections::HashSet;

    fn geometry(rows: u32, cols: u32) -> WindowGeometry {
        WindowGeometry::from_settings(&GridSettings::with_size(rows, cols)).unwrap()
    }

    #[test]
    fn test_slot_count_includes_border() {
        let g = geometry(3, 4);
        assert_eq!(g.slot_count(), 5 * 6);
        assert_eq!(g.indices().count(), 30);
        assert_eq!(ViewportWindow::new(g).len(), 30);
    }

    #[test]
    fn test_positions_are_row_major_and_unique() {
        let g = geometry(2, 3);
        let positions: Vec<usize> = g.indices().map(|i| g.position(i).unwrap()).collect();
        assert_eq!(positions, (0..g.slot_count()).collect::<Vec<_>>());
        assert_eq!(g.position(WindowIndex::new(-2, 0)), None);
        assert_eq!(g.position(WindowIndex::new(0, 4)), None);
    }

    #[test]
    fn test_slot_geometry() {
        let g = geometry(4, 5); // cell 20 x 25
        let s = g.slot(WindowIndex::new(2, 3));
        assert_eq!((s.x, s.y, s.width, s.height), (60.0, 50.0, 20.0, 25.0));
        assert_eq!(s.text_x, 70.0);
        assert_eq!(s.text_y, 50.0 + 25.0 / 1.6);
        assert_eq!(s.font_size, 10.0);

        let border = g.slot(WindowIndex::new(-1, -1));
        assert_eq!((border.x, border.y), (-20.0, -25.0));
    }

    #[test]
    fn test_rebind_shifts_every_slot() {
        let mut w = ViewportWindow::new(geometry(3, 3));
        w.rebind(CellOffset::new(-2, 5));
        assert_eq!(w.bound_coord(WindowIndex::new(0, 0)), Some(CellCoord::new(2, -5)));
        assert_eq!(w.bound_coord(WindowIndex::new(-1, 3)), Some(CellCoord::new(1, -2)));
        let bound: HashSet<CellCoord> = w.slots().iter().map(|s| s.bound).collect();
        assert_eq!(bound.len(), w.len());
    }

    #[test]
    fn test_index_at_with_translation() {
        let g = geometry(10, 10); // 10 x 10 cells
        assert_eq!(g.index_at(0.0, 0.0, (0.0, 0.0)), Some(WindowIndex::new(0, 0)));
        assert_eq!(g.index_at(99.9, 15.0, (0.0, 0.0)), Some(WindowIndex::new(1, 9)));
        // Slots drawn 4 units left: x = 3 falls into column 0, x = 7 into column 1.
        assert_eq!(g.index_at(3.0, 0.0, (-4.0, 0.0)), Some(WindowIndex::new(0, 0)));
        assert_eq!(g.index_at(7.0, 0.0, (-4.0, 0.0)), Some(WindowIndex::new(0, 1)));
        // Border slots are reachable, anything beyond is not.
        assert_eq!(g.index_at(-5.0, 0.0, (0.0, 0.0)), Some(WindowIndex::new(0, -1)));
        assert_eq!(g.index_at(-15.0, 0.0, (0.0, 0.0)), None);
        assert_eq!(g.index_at(f64::NAN, 0.0, (0.0, 0.0)), None);
    }
}
