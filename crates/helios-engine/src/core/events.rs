//! Single-threaded publish/subscribe bus.
//!
//! Components receive an `Rc<EventBus>` at construction instead of reaching
//! for a global emitter. Emitting only queues; delivery happens in
//! [`EventBus::dispatch`], which the frame loop calls once per tick, so a
//! subscriber may emit without re-entering itself.

use std::cell::{Cell, RefCell};

use crate::api::types::WorldEvent;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Subscriber = Box<dyn FnMut(&WorldEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    pending: RefCell<Vec<WorldEvent>>,
    next_id: Cell<u32>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked for every dispatched event.
    pub fn subscribe(&self, callback: impl FnMut(&WorldEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Queue an event for the next dispatch.
    pub fn emit(&self, event: WorldEvent) {
        self.pending.borrow_mut().push(event);
    }

    /// Deliver queued events (including ones emitted by subscribers while
    /// dispatching) and return them in delivery order.
    pub fn dispatch(&self) -> Vec<WorldEvent> {
        let mut delivered = Vec::new();
        loop {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                break;
            }
            // Subscribers are taken out so callbacks may subscribe or emit.
            let mut active = std::mem::take(&mut *self.subscribers.borrow_mut());
            for event in &batch {
                for (_, callback) in active.iter_mut() {
                    callback(event);
                }
            }
            let mut subscribers = self.subscribers.borrow_mut();
            active.append(&mut subscribers);
            *subscribers = active;
            delivered.extend(batch);
        }
        delivered
    }

    /// Number of events waiting for dispatch.
    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("pending", &self.pending_len())
            .finish()
    }
}
