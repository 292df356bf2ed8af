//! Fan-out bus broadcasting change events to subscribers.

use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{ChangeEvent, SubscriptionHandle, SubscriptionId};

/// Default per-subscriber buffer size (events).
const DEFAULT_EVENT_BUFFER: usize = 64;

/// Broadcasts change events to any number of subscribers.
///
/// Emission never blocks: a subscriber whose buffer is full or whose
/// receiver was dropped is removed from the bus.
pub struct EventBus {
    /// Active subscriptions by ID.
    subscribers: RwLock<HashMap<SubscriptionId, Sender<ChangeEvent>>>,

    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a subscription with the default buffer size.
    pub fn subscribe(&self) -> SubscriptionHandle {
        self.subscribe_with_buffer(DEFAULT_EVENT_BUFFER)
    }

    /// Create a subscription with a custom buffer size.
    pub fn subscribe_with_buffer(&self, buffer: usize) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(buffer);

        self.subscribers.write().insert(id, sender);

        SubscriptionHandle { id, receiver }
    }

    /// Remove a subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.write().remove(&id);
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Broadcast an event to all subscribers.
    pub fn emit(&self, event: ChangeEvent) {
        let mut dropped = Vec::new();

        {
            let subscribers = self.subscribers.read();
            if subscribers.is_empty() {
                return;
            }

            for (id, sender) in subscribers.iter() {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                        dropped.push(*id);
                    }
                }
            }
        }

        if !dropped.is_empty() {
            let mut subscribers = self.subscribers.write();
            for id in dropped {
                subscribers.remove(&id);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;

    fn added(id: &str) -> ChangeEvent {
        ChangeEvent::EntityAdded {
            id: EntityId::from(id),
        }
    }

    #[test]
    fn test_subscribe_and_emit() {
        let bus = EventBus::new();
        let handle = bus.subscribe();

        bus.emit(added("a"));
        bus.emit(added("b"));

        let events = handle.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], added("a"));
        assert_eq!(events[1], added("b"));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let handle = bus.subscribe();

        bus.unsubscribe(handle.id);
        bus.emit(added("a"));

        assert!(handle.try_recv().is_none());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_full_buffer_drops_subscriber() {
        let bus = EventBus::new();
        let _handle = bus.subscribe_with_buffer(1);

        bus.emit(added("a"));
        bus.emit(added("b"));

        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_dropped_receiver_is_removed() {
        let bus = EventBus::new();
        let handle = bus.subscribe();
        drop(handle);

        bus.emit(added("a"));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
