//! `UgView`: the WASM-exported grid handle.
//!
//! ```javascript
//! import init, { UgView, PointerKind } from 'ugrid';
//! await init();
//! const view = new UgView({ rows: 20, cols: 20 }, {
//!   initial_status: (row, col) => 0,
//!   status_on_click: (status) => 1 - status,
//!   cell_color_function: (status) => (status ? 'black' : 'white'),
//! });
//! view.build(document.getElementById('grid'), PointerKind.Mouse);
//! view.moveTo(5, 5);
//! ```

mod callbacks;
mod events;
mod logging;

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub use callbacks::JsPolicy;
pub use events::{DomPointerSource, PointerKind};

use crate::config::GridSettings;
use crate::coords::integral_cell;
use crate::engine::UnboundedGrid;
use crate::error::{Result, UgridError};
use crate::render::SvgRenderer;
use crate::types::CellUpdate;

type SharedGrid = Rc<RefCell<UnboundedGrid<JsPolicy, SvgRenderer>>>;

/// Browser handle around one unbounded grid.
#[wasm_bindgen]
pub struct UgView {
    settings: GridSettings,
    policy: JsPolicy,
    grid: Option<SharedGrid>,
    #[allow(dead_code)]
    pointer_source: Option<DomPointerSource>,
}

fn field(object: &JsValue, key: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn cell_arg(object: &JsValue, key: &str) -> f64 {
    field(object, key).as_f64().unwrap_or(f64::NAN)
}

impl UgView {
    fn shared(&self) -> Result<&SharedGrid> {
        self.grid.as_ref().ok_or(UgridError::NotBuilt)
    }

    fn grid_mut(&self) -> Result<RefMut<'_, UnboundedGrid<JsPolicy, SvgRenderer>>> {
        self.shared()?
            .try_borrow_mut()
            .map_err(|_| UgridError::Busy)
    }
}

#[wasm_bindgen]
impl UgView {
    /// Create a grid from a settings object and a callbacks object. Either may
    /// be `undefined`; missing options take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue, callbacks: JsValue) -> std::result::Result<UgView, JsValue> {
        console_error_panic_hook::set_once();
        logging::init();
        let settings = if settings.is_undefined() || settings.is_null() {
            GridSettings::default()
        } else {
            serde_wasm_bindgen::from_value::<GridSettings>(settings)
                .map_err(|e| UgridError::InvalidConfig(e.to_string()))?
        };
        settings.validate()?;
        Ok(Self {
            settings,
            policy: JsPolicy::from_callbacks(&callbacks),
            grid: None,
            pointer_source: None,
        })
    }

    /// Mount the grid inside `container` and start listening for `pointer_kind` input.
    pub fn build(
        &mut self,
        container: HtmlElement,
        pointer_kind: PointerKind,
    ) -> std::result::Result<(), JsValue> {
        if self.grid.is_some() {
            return Err(UgridError::Render("grid is already built".into()).into());
        }
        let translate = self.settings.translate_on_drag;
        let viewbox = self.settings.viewbox;
        let grid = UnboundedGrid::build(
            self.settings.clone(),
            self.policy.clone(),
            SvgRenderer::new(container),
        )?;
        let svg = grid
            .backend()
            .svg_element()
            .cloned()
            .ok_or_else(|| UgridError::Render("svg element missing after mount".into()))?;
        let grid: SharedGrid = Rc::new(RefCell::new(grid));

        // Without panning or clicking there is still hover to track.
        let wants_pointer = translate
            || self.settings.update_on_click
            || self.settings.highlight_hovered_cell;
        if wants_pointer {
            self.pointer_source = Some(DomPointerSource::attach(
                &svg,
                pointer_kind,
                viewbox,
                Rc::clone(&grid),
            )?);
        }
        self.grid = Some(grid);
        Ok(())
    }

    /// Pan so the top-left visible cell is `(row, col)`. Rejects non-integers.
    #[wasm_bindgen(js_name = moveTo)]
    pub fn move_to(&self, row: f64, col: f64) -> std::result::Result<(), JsValue> {
        self.grid_mut()?.move_to(row, col)?;
        Ok(())
    }

    /// Reset every stored cell to its initial status.
    pub fn clear(&self) -> std::result::Result<(), JsValue> {
        self.grid_mut()?.clear();
        Ok(())
    }

    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(
        &self,
        row: f64,
        col: f64,
        status: JsValue,
    ) -> std::result::Result<(), JsValue> {
        let (row, col) = integral_cell(row, col)?;
        self.grid_mut()?.set_cell(row, col, status);
        Ok(())
    }

    /// Write an array of `{row, col, status}` objects and redraw once.
    ///
    /// Every entry is validated before anything is written.
    #[wasm_bindgen(js_name = setCells)]
    pub fn set_cells(&self, updates: Array) -> std::result::Result<usize, JsValue> {
        let updates = updates
            .iter()
            .map(|entry| {
                let (row, col) = integral_cell(cell_arg(&entry, "row"), cell_arg(&entry, "col"))?;
                Ok(CellUpdate::new(row, col, field(&entry, "status")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.grid_mut()?.set_cells(updates))
    }

    #[wasm_bindgen(js_name = getCell)]
    pub fn get_cell(&self, row: f64, col: f64) -> std::result::Result<JsValue, JsValue> {
        let (row, col) = integral_cell(row, col)?;
        Ok(self.grid_mut()?.get_cell(row, col))
    }

    /// Redraw every cell, e.g. after the cell functions start returning
    /// something different.
    pub fn refresh(&self) -> std::result::Result<(), JsValue> {
        self.grid_mut()?.refresh();
        Ok(())
    }

    /// Number of full redraws so far.
    #[wasm_bindgen(js_name = refreshCount)]
    pub fn refresh_count(&self) -> std::result::Result<f64, JsValue> {
        let grid = self.shared()?.try_borrow().map_err(|_| UgridError::Busy)?;
        #[allow(clippy::cast_precision_loss)]
        let count = grid.refresh_count() as f64;
        Ok(count)
    }
}
