//! ugrid - an unbounded, pannable grid of cells
//!
//! A logically infinite two-dimensional grid is shown through a small fixed
//! window of render slots:
//! - Sparse storage: only visited or written cells exist
//! - Drag panning with sub-cell translation, re-binding whole cells as needed
//! - Caller-defined cell status, color, text and click behaviour
//! - Headless rendering for tests and tooling, SVG rendering in the browser
//!
//! # Usage (Rust)
//!
//! ```
//! use ugrid::{BinaryPolicy, GridSettings, HeadlessRenderer, UnboundedGrid};
//!
//! let mut grid = UnboundedGrid::build(
//!     GridSettings::with_size(3, 3),
//!     BinaryPolicy::default(),
//!     HeadlessRenderer::new(),
//! )?;
//! grid.set_cell(1, 1, true);
//! grid.move_to(1.0, 1.0)?;
//! assert!(grid.get_cell(1, 1));
//! # Ok::<(), ugrid::UgridError>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { UgView, PointerKind } from 'ugrid';
//! await init();
//! const view = new UgView({ rows: 10, cols: 10 }, callbacks);
//! view.build(container, PointerKind.Mouse);
//! ```

pub mod config;
pub mod coords;
pub mod engine;
pub mod error;
pub mod input;
pub mod layout;
pub mod policy;
pub mod render;
pub mod store;
pub mod types;

// Browser glue (SVG + DOM events)
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{CellBorder, DragSpeed, GridSettings, ViewBox};
pub use engine::UnboundedGrid;
pub use error::{Result, UgridError};
pub use input::{PointerEvent, PointerEventSource, PointerSink, ScriptedPointerSource};
pub use policy::{BinaryPolicy, CellPolicy, FnPolicy};
pub use render::{HeadlessRenderer, RenderBackend};
pub use store::LogicalGrid;
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::{PointerKind, UgView};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
