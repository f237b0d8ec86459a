//! Window geometry and pan arithmetic.
//!
//! This module handles:
//! - The fixed window of render slots and their viewbox rectangles
//! - Binding slots to logical coordinates for a given cell-offset
//! - The continuous pan offset, drag anchoring and sub-cell translation

mod offset;
mod window;

pub use offset::{OffsetState, PanController, PanStep};
pub use window::{RenderSlot, SlotGeometry, ViewportWindow, WindowGeometry};
