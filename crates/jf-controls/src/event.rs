//! Subscriber lists for control events.

use std::sync::{Arc, Mutex};

/// A list of event handlers.
///
/// Handlers run on whichever thread raises the event; for feedback-driven
/// events that is the transport's callback thread. The handler list is
/// cloned out of the lock before invocation, so a handler may subscribe
/// further handlers without deadlocking.
pub struct Event<T> {
    handlers: Mutex<Vec<Arc<dyn Fn(&T) + Send + Sync>>>,
}

impl<T> Event<T> {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Add a handler.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) {
        self.handlers.lock().unwrap().push(Arc::new(handler));
    }

    /// Invoke every handler with `args`.
    pub fn raise(&self, args: &T) {
        let handlers: Vec<_> = self.handlers.lock().unwrap().clone();
        for handler in handlers {
            handler(args);
        }
    }

    /// Drop all handlers. Part of control teardown.
    pub fn clear(&self) {
        self.handlers.lock().unwrap().clear();
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn handlers_receive_args() {
        let event = Event::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_handler = Arc::clone(&hits);
        event.subscribe(move |value: &u16| {
            assert_eq!(*value, 3);
            hits_in_handler.fetch_add(1, Ordering::SeqCst);
        });

        event.raise(&3);
        event.raise(&3);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clear_drops_handlers() {
        let event: Event<()> = Event::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_handler = Arc::clone(&hits);
        event.subscribe(move |_| {
            hits_in_handler.fetch_add(1, Ordering::SeqCst);
        });

        event.clear();
        event.raise(&());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
