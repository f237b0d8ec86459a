//! Rendering backends for the viewport window.
//!
//! This module provides:
//! - The backend-agnostic `RenderBackend` trait and paint records
//! - A headless backend that records paints (tests, benches, CLI)
//! - An SVG backend built on web-sys (wasm32 only)

pub mod backend;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod svg;

pub use backend::{CssColor, RenderBackend, SlotPaint};
pub use headless::{HeadlessRenderer, PaintedSlot};

#[cfg(target_arch = "wasm32")]
pub use svg::SvgRenderer;
