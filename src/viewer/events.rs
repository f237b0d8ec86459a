//! DOM pointer listeners.
//!
//! Listeners queue normalized [`PointerEvent`]s and then try to deliver the
//! queue to the grid. If the grid is busy (a cell callback is still running)
//! the events stay queued and go out with the next delivery.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, MouseEvent, TouchEvent};

use crate::config::ViewBox;
use crate::error::{Result, UgridError};
use crate::input::{PointerEvent, PointerEventSource, PointerSink};

/// Which DOM event family drives the grid.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Start,
    Move,
    End,
    Leave,
}

impl PointerKind {
    fn table(self) -> &'static [(&'static str, Phase)] {
        match self {
            Self::Mouse => &[
                ("mousedown", Phase::Start),
                ("mousemove", Phase::Move),
                ("mouseup", Phase::End),
                ("mouseleave", Phase::Leave),
            ],
            Self::Touch => &[
                ("touchstart", Phase::Start),
                ("touchmove", Phase::Move),
                ("touchend", Phase::End),
                ("touchcancel", Phase::Leave),
            ],
        }
    }
}

type Queue = Rc<RefCell<VecDeque<PointerEvent>>>;

/// Client position of a mouse event, or of the first active (else first
/// changed) touch.
fn client_position(event: &Event) -> Option<(f64, f64)> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())));
    }
    let touch_event = event.dyn_ref::<TouchEvent>()?;
    let touch = touch_event
        .touches()
        .get(0)
        .or_else(|| touch_event.changed_touches().get(0))?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

/// Convert a client pixel position into grid viewbox units.
fn to_viewbox(target: &Element, viewbox: ViewBox, client: (f64, f64)) -> Option<(f64, f64)> {
    let rect = target.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some((
        (client.0 - rect.left()) / rect.width() * viewbox.width,
        (client.1 - rect.top()) / rect.height() * viewbox.height,
    ))
}

fn drain(queue: &Queue, sink: &mut dyn PointerSink) -> usize {
    let mut delivered = 0;
    loop {
        let Some(event) = queue.borrow_mut().pop_front() else {
            return delivered;
        };
        sink.dispatch(event);
        delivered += 1;
    }
}

/// Mouse or touch listeners attached to one element.
pub struct DomPointerSource {
    target: Element,
    queue: Queue,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl DomPointerSource {
    /// Attach the `kind` listeners to `target` and deliver their events to `sink`.
    ///
    /// # Errors
    /// Returns [`UgridError::Render`] if a listener cannot be registered.
    pub fn attach<S>(
        target: &Element,
        kind: PointerKind,
        viewbox: ViewBox,
        sink: Rc<RefCell<S>>,
    ) -> Result<Self>
    where
        S: PointerSink + 'static,
    {
        let queue: Queue = Rc::new(RefCell::new(VecDeque::new()));
        let mut listeners = Vec::new();

        for &(name, phase) in kind.table() {
            let queue = Rc::clone(&queue);
            let sink = Rc::clone(&sink);
            let element = target.clone();
            let closure = Closure::wrap(Box::new(move |event: Event| {
                if kind == PointerKind::Touch {
                    event.prevent_default();
                }
                let pointer = match phase {
                    Phase::Start | Phase::Move => {
                        let Some((x, y)) = client_position(&event)
                            .and_then(|client| to_viewbox(&element, viewbox, client))
                        else {
                            return;
                        };
                        if matches!(phase, Phase::Start) {
                            PointerEvent::Start { x, y }
                        } else {
                            PointerEvent::Move { x, y }
                        }
                    }
                    Phase::End => PointerEvent::End,
                    Phase::Leave => PointerEvent::Leave,
                };
                queue.borrow_mut().push_back(pointer);
                match sink.try_borrow_mut() {
                    Ok(mut sink) => {
                        drain(&queue, &mut *sink);
                    }
                    Err(_) => tracing::trace!("grid busy; pointer event queued"),
                }
            }) as Box<dyn FnMut(Event)>);
            target
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
                .map_err(|err| {
                    UgridError::Render(format!("cannot listen for {name}: {err:?}"))
                })?;
            listeners.push((name, closure));
        }

        tracing::debug!(?kind, "pointer listeners attached");
        Ok(Self {
            target: target.clone(),
            queue,
            listeners,
        })
    }

    /// Events received while the grid was busy.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl PointerEventSource for DomPointerSource {
    fn pump(&mut self, sink: &mut dyn PointerSink) -> usize {
        drain(&self.queue, sink)
    }
}

impl Drop for DomPointerSource {
    fn drop(&mut self) {
        for (name, closure) in &self.listeners {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}
