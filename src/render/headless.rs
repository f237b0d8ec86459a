//! Headless backend that records what would have been drawn.

use std::collections::HashMap;

use super::backend::{CssColor, RenderBackend, SlotPaint};
use crate::error::{Result, UgridError};
use crate::layout::WindowGeometry;
use crate::types::{CellCoord, WindowIndex};

/// Last paint received by one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintedSlot {
    pub coord: CellCoord,
    pub fill: CssColor,
    pub text: String,
}

/// In-memory backend used by tests, benches and the CLI.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    geometry: Option<WindowGeometry>,
    slots: HashMap<WindowIndex, PaintedSlot>,
    translation: (f64, f64),
    frames: u64,
    paints: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn geometry(&self) -> Option<&WindowGeometry> {
        self.geometry.as_ref()
    }

    /// Last paint of the slot at `index`.
    pub fn painted(&self, index: WindowIndex) -> Option<&PaintedSlot> {
        self.slots.get(&index)
    }

    /// Number of completed full refreshes.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of individual slot paints, refreshes and single-slot updates alike.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }

    pub fn translation(&self) -> (f64, f64) {
        self.translation
    }

    /// One line per visible row, one `glyph` per visible column. The overscan
    /// border is left out; unpainted slots show as `?`.
    pub fn snapshot<F>(&self, glyph: F) -> String
    where
        F: Fn(&PaintedSlot) -> char,
    {
        let Some(geometry) = &self.geometry else {
            return String::new();
        };
        let mut out = String::new();
        for row in 0..geometry.rows {
            for col in 0..geometry.cols {
                let ch = self
                    .slots
                    .get(&WindowIndex::new(row, col))
                    .map_or('?', &glyph);
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl RenderBackend for HeadlessRenderer {
    fn mount(&mut self, geometry: &WindowGeometry) -> Result<()> {
        if self.geometry.is_some() {
            return Err(UgridError::Render("headless renderer already mounted".into()));
        }
        self.geometry = Some(geometry.clone());
        self.slots.reserve(geometry.slot_count());
        Ok(())
    }

    fn paint_slot(&mut self, paint: &SlotPaint<'_>) {
        self.paints += 1;
        self.slots.insert(
            paint.index,
            PaintedSlot {
                coord: paint.coord,
                fill: paint.fill.to_string(),
                text: paint.text.to_string(),
            },
        );
    }

    fn set_translation(&mut self, tx: f64, ty: f64) {
        self.translation = (tx, ty);
    }

    fn present(&mut self) {
        self.frames += 1;
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
    use crate::config::GridSettings;

    #[test]
    fn test_mount_twice_fails() {
        let geometry = WindowGeometry::from_settings(&GridSettings::with_size(2, 2)).unwrap();
        let mut r = HeadlessRenderer::new();
        r.mount(&geometry).unwrap();
        assert!(matches!(r.mount(&geometry), Err(UgridError::Render(_))));
    }

    #[test]
    fn test_snapshot_skips_border() {
        let geometry = WindowGeometry::from_settings(&GridSettings::with_size(2, 3)).unwrap();
        let mut r = HeadlessRenderer::new();
        r.mount(&geometry).unwrap();
        for index in geometry.indices() {
            let text = if index.row == index.col { "x" } else { "" };
            r.paint_slot(&SlotPaint {
                index,
                coord: CellCoord::new(i64::from(index.row), i64::from(index.col)),
                fill: "white",
                text,
            });
        }
        r.present();
        let snap = r.snapshot(|p| p.text.chars().next().unwrap_or('.'));
        assert_eq!(snap, "x..\n.x.\n");
        assert_eq!(r.frames(), 1);
        assert_eq!(r.paint_count(), 20);
    }
}
