//! Normalized pointer stream.
//!
//! Mouse and touch input both arrive as [`PointerEvent`]s with positions in
//! viewbox units, relative to the top-left corner of the grid.

/// One pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Start { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    End,
    /// The pointer left the grid without a release.
    Leave,
}

/// Consumer of pointer events.
pub trait PointerSink {
    fn pointer_start(&mut self, x: f64, y: f64);
    fn pointer_move(&mut self, x: f64, y: f64);
    fn pointer_end(&mut self);
    fn pointer_leave(&mut self) {}

    /// Route `event` to the matching handler.
    fn dispatch(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Start { x, y } => self.pointer_start(x, y),
            PointerEvent::Move { x, y } => self.pointer_move(x, y),
            PointerEvent::End => self.pointer_end(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }
}

/// Producer of pointer events.
pub trait PointerEventSource {
    /// Deliver every pending event to `sink`, in order. Returns how many were delivered.
    fn pump(&mut self, sink: &mut dyn PointerSink) -> usize;
}

/// Replays a fixed list of events.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPointerSource {
    events: Vec<PointerEvent>,
    cursor: usize,
}

impl ScriptedPointerSource {
    pub fn new(events: Vec<PointerEvent>) -> Self {
        Self { events, cursor: 0 }
    }

    /// A press at `from`, one move per step along the straight line to `to`,
    /// then a release.
    pub fn drag(from: (f64, f64), to: (f64, f64), steps: u32) -> Self {
        let steps = steps.max(1);
        let mut events = Vec::with_capacity(usize::try_from(steps).unwrap_or(0) + 2);
        events.push(PointerEvent::Start {
            x: from.0,
            y: from.1,
        });
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            events.push(PointerEvent::Move {
                x: from.0 + (to.0 - from.0) * t,
                y: from.1 + (to.1 - from.1) * t,
            });
        }
        events.push(PointerEvent::End);
        Self::new(events)
    }

    /// A press and release at the same point.
    pub fn click(x: f64, y: f64) -> Self {
        Self::new(vec![PointerEvent::Start { x, y }, PointerEvent::End])
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len().saturating_sub(self.cursor)
    }
}

impl PointerEventSource for ScriptedPointerSource {
    fn pump(&mut self, sink: &mut dyn PointerSink) -> usize {
        let pending = self.events.get(self.cursor..).unwrap_or_default();
        for event in pending {
            sink.dispatch(*event);
        }
        let delivered = pending.len();
        self.cursor = self.events.len();
        delivered
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

    #[derive(Default)]
    struct Recorder(Vec<PointerEvent>);

    impl PointerSink for Recorder {
        fn pointer_start(&mut self, x: f64, y: f64) {
            self.0.push(PointerEvent::Start { x, y });
        }
        fn pointer_move(&mut self, x: f64, y: f64) {
            self.0.push(PointerEvent::Move { x, y });
        }
        fn pointer_end(&mut self) {
            self.0.push(PointerEvent::End);
        }
    }

    #[test]
    fn test_drag_script_shape() {
        let mut source = ScriptedPointerSource::drag((0.0, 0.0), (10.0, -4.0), 2);
        let mut sink = Recorder::default();
        assert_eq!(source.pump(&mut sink), 4);
        assert_eq!(
            sink.0,
            vec![
                PointerEvent::Start { x: 0.0, y: 0.0 },
                PointerEvent::Move { x: 5.0, y: -2.0 },
                PointerEvent::Move { x: 10.0, y: -4.0 },
                PointerEvent::End,
            ]
        );
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.pump(&mut sink), 0);
    }

    #[test]
    fn test_leave_defaults_to_noop() {
        let mut source = ScriptedPointerSource::new(vec![PointerEvent::Leave]);
        let mut sink = Recorder::default();
        assert_eq!(source.pump(&mut sink), 1);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_push_after_pump() {
        let mut source = ScriptedPointerSource::click(1.0, 1.0);
        let mut sink = Recorder::default();
        source.pump(&mut sink);
        source.push(PointerEvent::End);
        assert_eq!(source.remaining(), 1);
        source.pump(&mut sink);
        assert_eq!(sink.0.len(), 3);
    }
}
