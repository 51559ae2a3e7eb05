//! Named publish/subscribe bus for action events
//!
//! Input handling never calls action consumers directly; it publishes on
//! the bus and whoever subscribed to the name reacts. Subscriptions are
//! removed when their [`Subscription`] handle is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Event name the dispatch listener publishes under
pub const ACTION_EVENT: &str = "key-binding-triggered";

/// Payload of [`ACTION_EVENT`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    pub binding_id: String,
    pub action: String,
}

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Listener<E> {
    id: u64,
    handler: Handler<E>,
}

struct BusInner<E> {
    next_id: u64,
    listeners: HashMap<String, Vec<Listener<E>>>,
}

/// Single-threaded event bus keyed by event name
pub struct EventBus<E> {
    inner: Rc<RefCell<BusInner<E>>>,
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 0,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Register `handler` for events published under `name`
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, name: &str, handler: impl FnMut(&E) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .listeners
            .entry(name.to_string())
            .or_default()
            .push(Listener {
                id,
                handler: Rc::new(RefCell::new(handler)),
            });

        let weak: Weak<RefCell<BusInner<E>>> = Rc::downgrade(&self.inner);
        let name = name.to_string();
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = inner.borrow_mut();
                    if let Some(listeners) = inner.listeners.get_mut(&name) {
                        listeners.retain(|l| l.id != id);
                        if listeners.is_empty() {
                            inner.listeners.remove(&name);
                        }
                    }
                }
            })),
        }
    }

    /// Deliver `event` to every handler subscribed to `name`
    ///
    /// Returns the number of handlers invoked. A handler that is already
    /// running further up the stack is skipped.
    pub fn publish(&self, name: &str, event: &E) -> usize {
        // Clone the handler list so handlers may (un)subscribe while running
        let handlers: Vec<Handler<E>> = match self.inner.borrow().listeners.get(name) {
            Some(listeners) => listeners.iter().map(|l| Rc::clone(&l.handler)).collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (&mut *handler)(event);
                    delivered += 1;
                }
                Err(_) => {
                    tracing::warn!(event = name, "Skipping reentrant event handler");
                }
            }
        }
        delivered
    }

    /// Number of live subscriptions for `name`
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(name)
            .map_or(0, Vec::len)
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("events", &inner.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Handle for a bus subscription; unsubscribes on drop
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Explicitly unregister the handler
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
