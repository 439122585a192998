//! Synchronous publish/subscribe for bout events.
//!
//! Listeners run in registration order, inside the call that emitted the
//! event. They only observe; the controller's state is never reachable
//! from a listener.

use joust_core::events::{BoutEvent, EventKind};

/// A listener callback.
pub type Listener = Box<dyn FnMut(&BoutEvent) + Send>;

/// Handle returned by a subscription. Pass it back to unsubscribe.
///
/// A no-op handle (from an unknown event name) unsubscribes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "dropping the handle makes the listener impossible to remove"]
pub struct Subscription {
    id: Option<u64>,
}

impl Subscription {
    pub const NOOP: Subscription = Subscription { id: None };

    pub fn is_noop(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(u64, EventKind, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, listener: Listener) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, kind, listener));
        Subscription { id: Some(id) }
    }

    /// Subscribe by wire name. Unknown names are warned about and yield
    /// a no-op subscription.
    pub fn on_named(&mut self, name: &str, listener: Listener) -> Subscription {
        match name.parse::<EventKind>() {
            Ok(kind) => self.on(kind, listener),
            Err(err) => {
                tracing::warn!(%err, "ignoring subscription");
                Subscription::NOOP
            }
        }
    }

    /// Returns whether a listener was removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let Some(id) = subscription.id else {
            return false;
        };
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &BoutEvent) {
        let kind = event.kind();
        for (_, _, listener) in self.listeners.iter_mut().filter(|(_, k, _)| *k == kind) {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
