//! Render backend trait for pluggable drawing implementations.
//!
//! The engine decides *what* every slot shows; a backend decides *how* it is
//! drawn. Backends never call back into the engine.

use crate::error::Result;
use crate::layout::WindowGeometry;
use crate::types::{CellCoord, WindowIndex};

/// A CSS color string (e.g., "white", "#FF0000", "rgba(0,0,0,0.5)")
pub type CssColor = String;

/// Appearance of one slot after a (re-)bind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPaint<'a> {
    pub index: WindowIndex,
    /// Logical cell the slot is bound to.
    pub coord: CellCoord,
    pub fill: &'a str,
    pub text: &'a str,
}

/// Trait for render backends
///
/// Implementations handle the actual drawing of the slot array (SVG, test
/// recorders, ...). `mount` is called exactly once, before any paint.
pub trait RenderBackend {
    /// Create the drawing surface and one element per slot.
    fn mount(&mut self, geometry: &WindowGeometry) -> Result<()>;

    /// Update one slot's fill and text.
    fn paint_slot(&mut self, paint: &SlotPaint<'_>);

    /// Shift every slot by a sub-cell amount.
    fn set_translation(&mut self, tx: f64, ty: f64);

    /// Called after a full refresh has painted every slot.
    fn present(&mut self) {}
}
