/// Input events the engine understands.
/// Pointer coordinates are CSS pixels relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began.
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended.
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved.
    PointerMove { x: f32, y: f32 },
    /// Scroll wheel; positive zooms out.
    Wheel { delta: f32 },
}

/// A queue of input events.
/// The host writes events into the queue; the frame loop drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks an in-progress drag so pointer moves become orbit deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragTracker {
    last: Option<(f32, f32)>,
}

impl DragTracker {
    /// Feed one event; returns the pointer delta while a drag is active.
    pub fn feed(&mut self, event: &InputEvent) -> Option<(f32, f32)> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.last = Some((x, y));
                None
            }
            InputEvent::PointerUp { .. } => {
                self.last = None;
                None
            }
            InputEvent::PointerMove { x, y } => {
                let (px, py) = self.last?;
                self.last = Some((x, y));
                Some((x - px, y - py))
            }
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::Wheel { delta: 1.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn drag_produces_deltas_only_while_pressed() {
        let mut drag = DragTracker::default();
        assert_eq!(drag.feed(&InputEvent::PointerMove { x: 5.0, y: 5.0 }), None);
        drag.feed(&InputEvent::PointerDown { x: 10.0, y: 10.0 });
        assert_eq!(
            drag.feed(&InputEvent::PointerMove { x: 14.0, y: 7.0 }),
            Some((4.0, -3.0))
        );
        drag.feed(&InputEvent::PointerUp { x: 14.0, y: 7.0 });
        assert!(!drag.is_dragging());
        assert_eq!(drag.feed(&InputEvent::PointerMove { x: 20.0, y: 7.0 }), None);
    }
}
