//! Cell policy backed by JavaScript functions.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::policy::CellPolicy;
use crate::render::CssColor;

/// [`CellPolicy`] whose hooks are JS functions read from a callbacks object.
///
/// Recognized keys are `initial_status(row, col)`,
/// `status_on_click(status, row, col)`, `cell_color_function(status, row, col)`
/// and `cell_text_function(status, row, col)`. Missing keys fall back to
/// status `0`, unchanged status on click, `white` and empty text. A hook that
/// throws or returns the wrong type falls back the same way and logs a warning.
#[derive(Debug, Clone, Default)]
pub struct JsPolicy {
    initial_status: Option<Function>,
    status_on_click: Option<Function>,
    cell_color: Option<Function>,
    cell_text: Option<Function>,
}

fn lookup(callbacks: &JsValue, key: &str) -> Option<Function> {
    if callbacks.is_undefined() || callbacks.is_null() {
        return None;
    }
    Reflect::get(callbacks, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

// JS numbers are doubles; coordinates beyond 2^53 lose precision on the way out.
#[allow(clippy::cast_precision_loss)]
fn js_coord(v: i64) -> JsValue {
    JsValue::from_f64(v as f64)
}

fn warn_failed(hook: &str, err: &JsValue) {
    tracing::warn!(hook, error = ?err, "cell callback failed; using default");
}

impl JsPolicy {
    pub fn from_callbacks(callbacks: &JsValue) -> Self {
        Self {
            initial_status: lookup(callbacks, "initial_status"),
            status_on_click: lookup(callbacks, "status_on_click"),
            cell_color: lookup(callbacks, "cell_color_function"),
            cell_text: lookup(callbacks, "cell_text_function"),
        }
    }

    fn call_status(
        f: Option<&Function>,
        hook: &str,
        status: &JsValue,
        row: i64,
        col: i64,
    ) -> Option<JsValue> {
        let f = f?;
        match f.call3(&JsValue::NULL, status, &js_coord(row), &js_coord(col)) {
            Ok(value) => Some(value),
            Err(err) => {
                warn_failed(hook, &err);
                None
            }
        }
    }
}

impl CellPolicy for JsPolicy {
    type Status = JsValue;

    fn default_status(&self, row: i64, col: i64) -> JsValue {
        let Some(f) = &self.initial_status else {
            return JsValue::from_f64(0.0);
        };
        f.call2(&JsValue::NULL, &js_coord(row), &js_coord(col))
            .unwrap_or_else(|err| {
                warn_failed("initial_status", &err);
                JsValue::from_f64(0.0)
            })
    }

    fn color(&self, status: &JsValue, row: i64, col: i64) -> CssColor {
        Self::call_status(
            self.cell_color.as_ref(),
            "cell_color_function",
            status,
            row,
            col,
        )
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| "white".to_string())
    }

    fn text(&self, status: &JsValue, row: i64, col: i64) -> String {
        Self::call_status(
            self.cell_text.as_ref(),
            "cell_text_function",
            status,
            row,
            col,
        )
        .map(|v| {
            v.as_string()
                .or_else(|| v.as_f64().map(|n| n.to_string()))
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    fn on_click(&self, status: &JsValue, row: i64, col: i64) -> JsValue {
        Self::call_status(
            self.status_on_click.as_ref(),
            "status_on_click",
            status,
            row,
            col,
        )
        .unwrap_or_else(|| status.clone())
    }
}
