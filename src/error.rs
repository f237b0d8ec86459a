//! Structured error types for ugrid.

/// All errors that can occur while building or driving an unbounded grid.
#[derive(Debug, thiserror::Error)]
pub enum UgridError {
    /// A coordinate-taking operation received a non-integral cell position.
    #[error("Invalid coordinate ({row}, {col}): cell coordinates must be integers")]
    InvalidCoordinate { row: f64, col: f64 },

    /// Settings that cannot describe a usable grid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The render backend could not mount or draw the window.
    #[error("Render error: {0}")]
    Render(String),

    /// An operation was called before `build`.
    #[error("Grid has not been built yet")]
    NotBuilt,

    /// The grid is already borrowed, e.g. a cell callback called back into the grid.
    #[error("Grid is busy handling another call")]
    Busy,

    /// Settings JSON could not be parsed.
    #[error("Settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UgridError>;

#[cfg(target_arch = "wasm32")]
impl From<UgridError> for wasm_bindgen::JsValue {
    fn from(e: UgridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
