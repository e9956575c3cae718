/// Input event types the engine understands.
/// Generic — no game-specific semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at viewport pixel (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at viewport pixel (x, y).
    PointerUp { x: f32, y: f32 },
    /// The cursor moved to viewport pixel (x, y).
    PointerMove { x: f32, y: f32 },
    /// Mouse wheel; positive `delta_y` scrolls away from the user.
    Wheel { delta_y: f32 },
    /// A key was pressed (DOM `keyCode`).
    KeyDown { key_code: u32 },
    /// The viewport changed size.
    Resize { width: f32, height: f32 },
    /// The host finished (or failed) loading the manifest entry in `slot`.
    AssetLoaded { slot: u32, ok: bool },
    /// A custom event from the UI layer (GUI panel, buttons, minimap).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS pushes events as they arrive; the runner hands the queue to the game once per tick.
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

    /// Iterate over pending events in arrival order without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 1.0, y: 2.0 });
        q.push(InputEvent::PointerDown { x: 1.0, y: 2.0 });
        q.push(InputEvent::Wheel { delta_y: -3.0 });
        let kinds: Vec<_> = q.iter().copied().collect();
        assert_eq!(kinds[1], InputEvent::PointerDown { x: 1.0, y: 2.0 });
        assert_eq!(kinds[2], InputEvent::Wheel { delta_y: -3.0 });
    }

    #[test]
    fn drain_empties_queue() {
        let mut q = InputQueue::new();
        q.push(InputEvent::AssetLoaded { slot: 4, ok: false });
        q.push(InputEvent::Resize { width: 800.0, height: 600.0 });
        assert_eq!(q.drain().len(), 2);
        assert!(q.is_empty());
    }
}
