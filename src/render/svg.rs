//! SVG backend: one `<rect>` and one `<text>` per render slot.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement};

use super::backend::{RenderBackend, SlotPaint};
use crate::error::{Result, UgridError};
use crate::layout::WindowGeometry;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

struct SlotElements {
    rect: Element,
    text: Element,
}

/// Draws the window into an `<svg>` appended to a container element.
pub struct SvgRenderer {
    container: HtmlElement,
    svg: Option<Element>,
    grid: Option<Element>,
    slots: Vec<SlotElements>,
    geometry: Option<WindowGeometry>,
}

fn render_err(err: &JsValue) -> UgridError {
    UgridError::Render(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn create(document: &Document, tag: &str, attrs: &[(&str, &str)]) -> Result<Element> {
    let element = document
        .create_element_ns(Some(SVG_NS), tag)
        .map_err(|e| render_err(&e))?;
    for (name, value) in attrs {
        element.set_attribute(name, value).map_err(|e| render_err(&e))?;
    }
    Ok(element)
}

impl SvgRenderer {
    pub fn new(container: HtmlElement) -> Self {
        Self {
            container,
            svg: None,
            grid: None,
            slots: Vec::new(),
            geometry: None,
        }
    }

    /// The outer `<svg>` element; pointer listeners are attached here.
    pub fn svg_element(&self) -> Option<&Element> {
        self.svg.as_ref()
    }
}

impl RenderBackend for SvgRenderer {
    fn mount(&mut self, geometry: &WindowGeometry) -> Result<()> {
        if self.svg.is_some() {
            return Err(UgridError::Render("svg renderer already mounted".into()));
        }
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| UgridError::Render("no document available".into()))?;

        let viewbox = format!("0 0 {} {}", geometry.viewbox.width, geometry.viewbox.height);
        let style = format!(
            "border: {}; width: 100%; height: 100%; touch-action: none;",
            geometry.grid_border
        );
        let svg = create(
            &document,
            "svg",
            &[
                ("viewBox", &viewbox),
                ("preserveAspectRatio", "none"),
                ("style", &style),
            ],
        )?;
        let grid = create(&document, "g", &[])?;
        svg.append_child(&grid).map_err(|e| render_err(&e))?;

        let stroke_width = geometry.cell_border.width.to_string();
        let mut slots = Vec::with_capacity(geometry.slot_count());
        for index in geometry.indices() {
            let s = geometry.slot(index);
            let group = create(&document, "g", &[])?;
            let rect = create(
                &document,
                "rect",
                &[
                    ("x", &s.x.to_string()),
                    ("y", &s.y.to_string()),
                    ("width", &s.width.to_string()),
                    ("height", &s.height.to_string()),
                    ("stroke", &geometry.cell_border.color),
                    ("stroke-width", &stroke_width),
                    ("fill", "white"),
                ],
            )?;
            let text = create(
                &document,
                "text",
                &[
                    ("x", &s.text_x.to_string()),
                    ("y", &s.text_y.to_string()),
                    ("fill", "white"),
                    ("text-anchor", "middle"),
                    ("font-size", &s.font_size.to_string()),
                    ("style", "user-select: none; pointer-events: none;"),
                ],
            )?;
            group.append_child(&rect).map_err(|e| render_err(&e))?;
            group.append_child(&text).map_err(|e| render_err(&e))?;
            grid.append_child(&group).map_err(|e| render_err(&e))?;
            slots.push(SlotElements { rect, text });
        }

        self.container.append_child(&svg).map_err(|e| render_err(&e))?;
        self.svg = Some(svg);
        self.grid = Some(grid);
        self.slots = slots;
        self.geometry = Some(geometry.clone());
        Ok(())
    }

    fn paint_slot(&mut self, paint: &SlotPaint<'_>) {
        let Some(pos) = self.geometry.as_ref().and_then(|g| g.position(paint.index)) else {
            return;
        };
        let Some(slot) = self.slots.get(pos) else {
            return;
        };
        let _ = slot.rect.set_attribute("fill", paint.fill);
        slot.text.set_text_content(Some(paint.text));
    }

    fn set_translation(&mut self, tx: f64, ty: f64) {
        if let Some(grid) = &self.grid {
            let _ = grid.set_attribute("transform", &format!("translate({tx} {ty})"));
        }
    }
}
