use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        // When cloning, create a new empty event bus
        Self::new()
    }
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

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: EditorEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}

/// Handler that queues events for whoever polls it, e.g. once per frame.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolKind;

    #[test]
    fn test_log_receives_and_drains() {
        let bus = EventBus::new();
        let log = EventLog::new();
        bus.subscribe(Box::new(log.clone()));

        bus.emit(EditorEvent::ToolChanged { old: ToolKind::Pen, new: ToolKind::Tape });
        assert_eq!(log.len(), 1);
        assert_eq!(
            log.drain(),
            vec![EditorEvent::ToolChanged { old: ToolKind::Pen, new: ToolKind::Tape }]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_closure_handlers() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0usize));
        let counter = seen.clone();
        bus.subscribe(Box::new(move |_: &EditorEvent| *counter.lock() += 1));
        bus.emit(EditorEvent::ToolChanged { old: ToolKind::Pen, new: ToolKind::Lasso });
        bus.emit(EditorEvent::ToolChanged { old: ToolKind::Lasso, new: ToolKind::Pen });
        assert_eq!(*seen.lock(), 2);
    }
}
