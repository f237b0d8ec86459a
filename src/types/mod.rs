//! Data types shared by the grid store, the viewport window and the renderers.

mod cell;
mod window;

pub use cell::*;
pub use window::*;
