//! Construction-time settings for an unbounded grid.
//!
//! Every field has a default, so a settings object (JSON or a JS object) only
//! needs to name what it changes. Field names match the option names the grid
//! has always accepted (`rows`, `translate_on_drag`, `drag_speed`, ...).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, UgridError};
use crate::render::CssColor;

/// Largest window, in render slots including the overscan border.
pub const MAX_WINDOW_SLOTS: u64 = 1 << 20;

/// Per-axis multipliers applied to pointer movement while dragging.
///
/// Negative values invert an axis; zero locks it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSpeed {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for DragSpeed {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: 1.0,
        }
    }
}

/// Grid-line styling. Purely cosmetic, consumed by the render backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellBorder {
    pub color: CssColor,
    /// Stroke width; a numeric string such as `"0.25"` is accepted too.
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub width: f64,
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Width {
        Number(f64),
        Text(String),
    }

    match Width::deserialize(deserializer)? {
        Width::Number(n) => Ok(n),
        Width::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid border width {text:?}"))),
    }
}

impl Default for CellBorder {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            width: 0.25,
        }
    }
}

/// Size of the coordinate space the window is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

/// All recognized grid options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Visible rows in the window (the overscan border is added on top).
    pub rows: u32,
    /// Visible columns in the window.
    pub cols: u32,
    /// Reading an unmaterialized cell through `get_cell` also stores its default.
    pub init_cell_on_access: bool,
    /// Clicking a cell applies the policy's click transition.
    pub update_on_click: bool,
    pub highlight_hovered_cell: bool,
    pub hovered_cell_color: CssColor,
    /// Dragging pans the grid.
    pub translate_on_drag: bool,
    pub drag_speed: DragSpeed,
    pub cell_border: CellBorder,
    /// CSS border around the whole grid.
    pub grid_border: String,
    pub viewbox: ViewBox,
    /// Number of materialized cells after which the store logs a warning.
    pub store_warn_threshold: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            init_cell_on_access: false,
            update_on_click: true,
            highlight_hovered_cell: false,
            hovered_cell_color: "rgba(0,0,0,0.0)".to_string(),
            translate_on_drag: true,
            drag_speed: DragSpeed::default(),
            cell_border: CellBorder::default(),
            grid_border: "2px solid black".to_string(),
            viewbox: ViewBox::default(),
            store_warn_threshold: 1 << 20,
        }
    }
}

impl GridSettings {
    /// Settings for a `rows` x `cols` window, everything else default.
    pub fn with_size(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or describes an unusable grid.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings describe a grid that can be built.
    ///
    /// # Errors
    /// Returns [`UgridError::InvalidConfig`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(UgridError::InvalidConfig(format!(
                "rows and cols must be at least 1 (got {}x{})",
                self.rows, self.cols
            )));
        }
        // The window adds a one-cell border on every side.
        let slots = (u64::from(self.rows) + 2).checked_mul(u64::from(self.cols) + 2);
        if slots.filter(|n| *n <= MAX_WINDOW_SLOTS).is_none() {
            return Err(UgridError::InvalidConfig(format!(
                "a {}x{} window exceeds {MAX_WINDOW_SLOTS} render slots",
                self.rows, self.cols
            )));
        }
        if !(self.viewbox.width.is_finite() && self.viewbox.width > 0.0)
            || !(self.viewbox.height.is_finite() && self.viewbox.height > 0.0)
        {
            return Err(UgridError::InvalidConfig(
                "viewbox dimensions must be positive and finite".into(),
            ));
        }
        if !self.drag_speed.horizontal.is_finite() || !self.drag_speed.vertical.is_finite() {
            return Err(UgridError::InvalidConfig(
                "drag_speed must be finite on both axes".into(),
            ));
        }
        Ok(())
    }

    /// Width of one cell in viewbox units.
    pub fn cell_width(&self) -> f64 {
        self.viewbox.width / f64::from(self.cols.max(1))
    }

    /// Height of one cell in viewbox units.
    pub fn cell_height(&self) -> f64 {
        self.viewbox.height / f64::from(self.rows.max(1))
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

    #[test]
    fn test_defaults_match_documented_values() {
        let s = GridSettings::default();
        assert_eq!((s.rows, s.cols), (10, 10));
        assert!(!s.init_cell_on_access);
        assert!(s.update_on_click);
        assert!(s.translate_on_drag);
        assert!(!s.highlight_hovered_cell);
        assert_eq!(s.cell_border.color, "black");
        assert_eq!(s.cell_border.width, 0.25);
        assert_eq!(s.cell_width(), 10.0);
        assert_eq!(s.cell_height(), 10.0);
    }

    #[test]
    fn test_from_json_partial() {
        let s = GridSettings::from_json(
            r#"{"rows": 4, "cols": 5, "drag_speed": {"vertical": -0.5}, "update_on_click": false}"#,
        )
        .unwrap();
        assert_eq!((s.rows, s.cols), (4, 5));
        assert_eq!(s.drag_speed.horizontal, 1.0);
        assert_eq!(s.drag_speed.vertical, -0.5);
        assert!(!s.update_on_click);
        assert_eq!(s.cell_width(), 20.0);
        assert_eq!(s.cell_height(), 25.0);
    }

    #[test]
    fn test_from_json_rejects_zero_rows() {
        let err = GridSettings::from_json(r#"{"rows": 0}"#).unwrap_err();
        assert!(matches!(err, UgridError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = GridSettings::from_json("{rows:").unwrap_err();
        assert!(matches!(err, UgridError::Json(_)));
    }

    #[test]
    fn test_validate_rejects_bad_viewbox() {
        let mut s = GridSettings::default();
        s.viewbox.width = 0.0;
        assert!(s.validate().is_err());
        s.viewbox.width = f64::NAN;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_window() {
        let s = GridSettings::with_size(u32::MAX, 3);
        assert!(s.validate().is_err());
        let s = GridSettings::with_size(u32::MAX, u32::MAX);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_from_json_rejects_window_too_many_slots() {
        let err = GridSettings::from_json(r#"{"rows": 100000, "cols": 100000}"#).unwrap_err();
        assert!(matches!(err, UgridError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_window_slot_limit_is_inclusive() {
        // 1022 + 2 = 1024 slots per axis, 1024 * 1024 = MAX_WINDOW_SLOTS.
        assert!(GridSettings::with_size(1022, 1022).validate().is_ok());
        assert!(GridSettings::with_size(1023, 1022).validate().is_err());
    }

    #[test]
    fn test_border_width_accepts_numeric_string() {
        let s = GridSettings::from_json(r#"{"cell_border": {"color": "black", "width": "0.25"}}"#)
            .unwrap();
        assert_eq!(s.cell_border.width, 0.25);
        let s = GridSettings::from_json(r#"{"cell_border": {"width": 1.5}}"#).unwrap();
        assert_eq!(s.cell_border.width, 1.5);
        assert_eq!(s.cell_border.color, "black");
    }

    #[test]
    fn test_border_width_rejects_non_numeric_string() {
        let err = GridSettings::from_json(r#"{"cell_border": {"width": "thin"}}"#).unwrap_err();
        assert!(matches!(err, UgridError::Json(_)));
    }
}
