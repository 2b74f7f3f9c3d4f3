use std::cell::RefCell;
use crate::event::{DrawEvent, EventHandler};

/// A simple event bus for broadcasting draw events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Emit an event to all registered handlers.
    ///
    /// Handlers must not emit on the same bus from inside `handle_event`.
    pub fn emit(&self, event: DrawEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use parking_lot::Mutex;

    #[test]
    fn test_emit_reaches_every_handler() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0));
        for _ in 0..2 {
            let seen = seen.clone();
            bus.subscribe(Box::new(move |_: &DrawEvent| *seen.lock() += 1));
        }

        bus.emit(DrawEvent::PathsCleared { count: 3 });
        assert_eq!(*seen.lock(), 2);
        assert_eq!(bus.handler_count(), 2);
    }
}
