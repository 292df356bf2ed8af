//! Event and subscription types.

use crate::types::EntityId;
use crossbeam_channel::Receiver;
use std::fmt;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

/// A change observed on an entity or group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// One or more attributes were assigned new values.
    AttributesSet {
        id: EntityId,
        /// Names of the attributes whose values actually changed.
        changed: Vec<String>,
    },

    /// An entity joined a group.
    EntityAdded { id: EntityId },

    /// An entity left a group.
    EntityRemoved { id: EntityId },
}

impl ChangeEvent {
    /// The entity the event concerns.
    pub fn entity_id(&self) -> &EntityId {
        match self {
            ChangeEvent::AttributesSet { id, .. }
            | ChangeEvent::EntityAdded { id }
            | ChangeEvent::EntityRemoved { id } => id,
        }
    }
}

/// Handle for receiving change events.
///
/// Dropping the handle ends the subscription; the bus removes it on the
/// next emission.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    pub receiver: Receiver<ChangeEvent>,
}

impl SubscriptionHandle {
    /// Next buffered event, if any.
    pub fn try_recv(&self) -> Option<ChangeEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drain all buffered events.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.receiver.try_iter().collect()
    }
}
