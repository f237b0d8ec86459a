//! The unbounded grid engine.
//!
//! [`UnboundedGrid`] owns the sparse store, the fixed window of render slots
//! and the pan controller, and drives a [`RenderBackend`]. Every public
//! mutation ends with exactly one [`refresh`](UnboundedGrid::refresh), except
//! a click, which repaints only the clicked slot.

use crate::config::GridSettings;
use crate::error::Result;
use crate::input::PointerSink;
use crate::layout::{OffsetState, PanController, PanStep, ViewportWindow, WindowGeometry};
use crate::policy::CellPolicy;
use crate::render::{RenderBackend, SlotPaint};
use crate::store::LogicalGrid;
use crate::types::{CellCoord, CellOffset, CellUpdate, WindowIndex};

/// Press that may still become a click.
#[derive(Debug, Clone, Copy)]
struct Press {
    slot: Option<WindowIndex>,
    dragged: bool,
}

/// An infinite grid of cells shown through a fixed window.
pub struct UnboundedGrid<P: CellPolicy, B: RenderBackend> {
    settings: GridSettings,
    policy: P,
    backend: B,
    store: LogicalGrid<P::Status>,
    window: ViewportWindow,
    pan: PanController,
    refresh_count: u64,
    hovered: Option<WindowIndex>,
    /// The hovered slot was clicked; show its status until the pointer moves on.
    hover_suppressed: bool,
    press: Option<Press>,
    pointer: (f64, f64),
}

impl<P: CellPolicy, B: RenderBackend> UnboundedGrid<P, B> {
    /// Allocate the window, mount it on `backend` and draw the first frame.
    ///
    /// # Errors
    /// Returns [`UgridError::InvalidConfig`](crate::error::UgridError::InvalidConfig)
    /// for unusable settings and
    /// [`UgridError::Render`](crate::error::UgridError::Render) if the backend
    /// cannot mount.
    pub fn build(settings: GridSettings, policy: P, mut backend: B) -> Result<Self> {
        let geometry = WindowGeometry::from_settings(&settings)?;
        let _span = tracing::debug_span!("build", rows = geometry.rows, cols = geometry.cols)
            .entered();
        backend.mount(&geometry)?;

        let pan = PanController::new(
            OffsetState::new(geometry.cell_width, geometry.cell_height),
            settings.drag_speed,
        );
        let store = LogicalGrid::new(settings.init_cell_on_access)
            .with_warn_threshold(settings.store_warn_threshold);
        let mut grid = Self {
            window: ViewportWindow::new(geometry),
            settings,
            policy,
            backend,
            store,
            pan,
            refresh_count: 0,
            hovered: None,
            hover_suppressed: false,
            press: None,
            pointer: (0.0, 0.0),
        };
        grid.refresh();
        tracing::debug!(slots = grid.window.len(), "grid built");
        Ok(grid)
    }

    /// Re-bind every slot to the current cell-offset and repaint it.
    pub fn refresh(&mut self) {
        let _span = tracing::debug_span!("refresh", n = self.refresh_count).entered();
        self.window.rebind(self.pan.cell_offset());
        let (tx, ty) = self.pan.translation();
        self.backend.set_translation(tx, ty);

        let hovered = self.highlighted_slot();
        for slot in self.window.slots() {
            let status = self
                .store
                .get_or_materialize(slot.bound, |c| self.policy.default_status(c.row, c.col));
            paint(
                &self.policy,
                &mut self.backend,
                &self.settings,
                slot.index,
                slot.bound,
                &status,
                hovered == Some(slot.index),
            );
        }
        self.backend.present();
        self.refresh_count += 1;
    }

    /// Pan so window index `(0, 0)` shows logical cell `(row, col)`.
    ///
    /// # Errors
    /// Returns [`UgridError::InvalidCoordinate`](crate::error::UgridError::InvalidCoordinate)
    /// if either argument is not a whole number; nothing changes in that case.
    pub fn move_to(&mut self, row: f64, col: f64) -> Result<()> {
        self.pan.move_to(row, col)?;
        self.refresh();
        Ok(())
    }

    /// Reset every materialized cell to its default status.
    pub fn clear(&mut self) {
        let policy = &self.policy;
        self.store
            .reset_materialized(|c| policy.default_status(c.row, c.col));
        tracing::debug!(cells = self.store.len(), "grid cleared");
        self.refresh();
    }

    pub fn set_cell(&mut self, row: i64, col: i64, status: P::Status) {
        self.store.set(CellCoord::new(row, col), status);
        self.refresh();
    }

    /// Apply every update, then refresh once. Returns the number of writes.
    pub fn set_cells<I>(&mut self, updates: I) -> usize
    where
        I: IntoIterator<Item = CellUpdate<P::Status>>,
    {
        let applied = self.store.set_many(updates);
        self.refresh();
        applied
    }

    /// Status at `(row, col)`. Stores the default only with `init_cell_on_access`.
    pub fn get_cell(&mut self, row: i64, col: i64) -> P::Status {
        let policy = &self.policy;
        self.store
            .get(CellCoord::new(row, col), |c| policy.default_status(c.row, c.col))
    }

    /// Apply the click transition to the cell shown at `index` and repaint
    /// that slot only. Returns the clicked logical coordinate.
    ///
    /// The slot is painted with its status color even when hovered; the
    /// highlight returns once the pointer enters another slot and comes back.
    pub fn click_slot(&mut self, index: WindowIndex) -> Option<CellCoord> {
        let coord = self.window.bound_coord(index)?;
        let policy = &self.policy;
        let current = self
            .store
            .get_or_materialize(coord, |c| policy.default_status(c.row, c.col));
        let next = self.policy.on_click(&current, coord.row, coord.col);
        self.store.set(coord, next.clone());
        if self.hovered == Some(index) {
            self.hover_suppressed = true;
        }
        paint(
            &self.policy,
            &mut self.backend,
            &self.settings,
            index,
            coord,
            &next,
            false,
        );
        tracing::debug!(row = coord.row, col = coord.col, "cell clicked");
        Some(coord)
    }

    /// Slot under the grid-local point `(x, y)`, in viewbox units.
    pub fn slot_at(&self, x: f64, y: f64) -> Option<WindowIndex> {
        self.window
            .geometry()
            .index_at(x, y, self.pan.translation())
    }

    /// Logical coordinate currently shown at `index`.
    pub fn bound_coord(&self, index: WindowIndex) -> Option<CellCoord> {
        self.window.bound_coord(index)
    }

    /// Every `(window index, bound coordinate)` pair in row-major order.
    pub fn bindings(&self) -> impl Iterator<Item = (WindowIndex, CellCoord)> + '_ {
        self.window.slots().iter().map(|s| (s.index, s.bound))
    }

    pub fn cell_offset(&self) -> CellOffset {
        self.window.offset()
    }

    /// Sub-cell translation currently applied to the window.
    pub fn translation(&self) -> (f64, f64) {
        self.pan.translation()
    }

    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn store(&self) -> &LogicalGrid<P::Status> {
        &self.store
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn geometry(&self) -> &WindowGeometry {
        self.window.geometry()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_dragging(&self) -> bool {
        self.pan.is_dragging()
    }

    pub fn hovered(&self) -> Option<WindowIndex> {
        self.hovered
    }

    fn highlighted_slot(&self) -> Option<WindowIndex> {
        if self.settings.highlight_hovered_cell && !self.hover_suppressed {
            self.hovered
        } else {
            None
        }
    }

    fn apply_step(&mut self, step: PanStep) {
        tracing::trace!(
            off_r = step.cell_offset.row,
            off_c = step.cell_offset.col,
            tx = step.translation.0,
            ty = step.translation.1,
            "drag step"
        );
        self.refresh();
    }

    /// Move the hover highlight to `next`, repainting the slot it leaves and
    /// the one it enters.
    fn set_hovered(&mut self, next: Option<WindowIndex>) {
        if self.hovered == next {
            return;
        }
        let previous = std::mem::replace(&mut self.hovered, next);
        self.hover_suppressed = false;
        if !self.settings.highlight_hovered_cell {
            return;
        }
        for index in [previous, next].into_iter().flatten() {
            self.repaint_slot(index);
        }
    }

    fn repaint_slot(&mut self, index: WindowIndex) {
        let Some(coord) = self.window.bound_coord(index) else {
            return;
        };
        let policy = &self.policy;
        let status = self
            .store
            .get_or_materialize(coord, |c| policy.default_status(c.row, c.col));
        let highlighted = self.highlighted_slot() == Some(index);
        paint(
            &self.policy,
            &mut self.backend,
            &self.settings,
            index,
            coord,
            &status,
            highlighted,
        );
    }
}

fn paint<P: CellPolicy, B: RenderBackend>(
    policy: &P,
    backend: &mut B,
    settings: &GridSettings,
    index: WindowIndex,
    coord: CellCoord,
    status: &P::Status,
    highlighted: bool,
) {
    let fill = if highlighted {
        settings.hovered_cell_color.clone()
    } else {
        policy.color(status, coord.row, coord.col)
    };
    let text = policy.text(status, coord.row, coord.col);
    backend.paint_slot(&SlotPaint {
        index,
        coord,
        fill: &fill,
        text: &text,
    });
}

impl<P: CellPolicy, B: RenderBackend> PointerSink for UnboundedGrid<P, B> {
    fn pointer_start(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
        let slot = self.slot_at(x, y);
        self.press = Some(Press {
            slot,
            dragged: false,
        });
        if self.settings.translate_on_drag {
            self.pan.begin(x, y);
        }
        self.set_hovered(slot);
    }

    fn pointer_move(&mut self, x: f64, y: f64) {
        let moved = self.pointer != (x, y);
        self.pointer = (x, y);
        if self.pan.is_dragging() {
            if let Some(press) = self.press.as_mut() {
                press.dragged |= moved;
            }
            if let Some(step) = self.pan.drag(x, y) {
                self.apply_step(step);
            }
        }
        let slot = self.slot_at(x, y);
        self.set_hovered(slot);
    }

    fn pointer_end(&mut self) {
        self.pan.end();
        let Some(press) = self.press.take() else {
            return;
        };
        if press.dragged || !self.settings.update_on_click {
            return;
        }
        let (x, y) = self.pointer;
        if let Some(slot) = press.slot.filter(|s| self.slot_at(x, y) == Some(*s)) {
            self.click_slot(slot);
        }
    }

    fn pointer_leave(&mut self) {
        self.pan.end();
        self.press = None;
        self.set_hovered(None);
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
    use crate::policy::FnPolicy;
    use crate::render::HeadlessRenderer;

    fn grid(rows: u32, cols: u32) -> UnboundedGrid<FnPolicy<i64>, HeadlessRenderer> {
        UnboundedGrid::build(
            GridSettings::with_size(rows, cols),
            FnPolicy::default(),
            HeadlessRenderer::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_draws_first_frame() {
        let g = grid(3, 3);
        assert_eq!(g.refresh_count(), 1);
        assert_eq!(g.backend().frames(), 1);
        assert_eq!(g.store().len(), 25);
    }

    #[test]
    fn test_build_rejects_empty_window() {
        let result = UnboundedGrid::build(
            GridSettings::with_size(0, 3),
            FnPolicy::<i64>::default(),
            HeadlessRenderer::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_click_slot_repaints_one_slot() {
        let mut g = UnboundedGrid::build(
            GridSettings::with_size(2, 2),
            FnPolicy::new(|_, _| 0_i64).with_on_click(|s: &i64, _, _| s + 1),
            HeadlessRenderer::new(),
        )
        .unwrap();
        let paints = g.backend().paint_count();
        let coord = g.click_slot(WindowIndex::new(1, 0)).unwrap();
        assert_eq!(coord, CellCoord::new(1, 0));
        assert_eq!(g.get_cell(1, 0), 1);
        assert_eq!(g.backend().paint_count(), paints + 1);
        assert_eq!(g.refresh_count(), 1);
        assert_eq!(g.click_slot(WindowIndex::new(5, 5)), None);
    }
}
