//! Identity-bearing mutable records.

use crate::error::{HistoryError, Result};
use crate::events::{ChangeEvent, EventBus, SubscriptionHandle};
use crate::types::{Attributes, EntityId, EntityState};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};

struct EntityInner {
    id: EntityId,
    attributes: RwLock<Attributes>,
    events: EventBus,
}

/// Shared handle to a mutable record with a stable identity.
///
/// Cloning the handle shares the underlying record: attribute writes are
/// visible through every clone and produce change notifications on the
/// record's event bus.
#[derive(Clone)]
pub struct Entity {
    inner: Arc<EntityInner>,
}

impl Entity {
    /// Create an entity with the given identifier and initial attributes.
    pub fn new(id: impl Into<EntityId>, attributes: Attributes) -> Self {
        Self {
            inner: Arc::new(EntityInner {
                id: id.into(),
                attributes: RwLock::new(attributes),
                events: EventBus::new(),
            }),
        }
    }

    /// Create an entity from any serializable payload.
    ///
    /// The payload must serialize to a JSON object; anything else is a
    /// contract violation and returns an error.
    pub fn from_serialize(id: impl Into<EntityId>, payload: &impl Serialize) -> Result<Self> {
        match serde_json::to_value(payload)? {
            Value::Object(attributes) => Ok(Self::new(id, attributes)),
            other => Err(HistoryError::NotAnObject(value_kind(&other))),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.inner.id
    }

    /// Current value of one attribute.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.attributes.read().get(name).cloned()
    }

    /// Assign one attribute. Emits a change notification if the value
    /// actually changed.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();

        let changed = {
            let mut attributes = self.inner.attributes.write();
            if attributes.get(&name) == Some(&value) {
                false
            } else {
                attributes.insert(name.clone(), value);
                true
            }
        };

        if changed {
            self.inner.events.emit(ChangeEvent::AttributesSet {
                id: self.inner.id.clone(),
                changed: vec![name],
            });
        }
    }

    /// Full attribute mapping, deep-copied.
    pub fn attributes(&self) -> Attributes {
        self.inner.attributes.read().clone()
    }

    /// Batch-assign attributes, merging into the existing mapping.
    ///
    /// Attributes absent from `attributes` keep their current values.
    /// Emits a single change notification listing the attributes whose
    /// values actually changed, or nothing if the assignment was a no-op.
    pub fn set_attributes(&self, attributes: Attributes) {
        let mut changed = Vec::new();

        {
            let mut current = self.inner.attributes.write();
            for (name, value) in attributes {
                if current.get(&name) != Some(&value) {
                    changed.push(name.clone());
                    current.insert(name, value);
                }
            }
        }

        if !changed.is_empty() {
            self.inner.events.emit(ChangeEvent::AttributesSet {
                id: self.inner.id.clone(),
                changed,
            });
        }
    }

    /// Identity plus a deep copy of the current attributes.
    pub fn state(&self) -> EntityState {
        EntityState {
            id: self.inner.id.clone(),
            attributes: self.attributes(),
        }
    }

    /// Subscribe to this record's change notifications.
    pub fn subscribe(&self) -> SubscriptionHandle {
        self.inner.events.subscribe()
    }

    /// Non-owning handle to this record.
    pub fn downgrade(&self) -> WeakEntity {
        WeakEntity {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same live record.
    pub fn ptr_eq(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.inner.id)
    }
}

/// Non-owning entity handle.
///
/// A failed upgrade means the record is gone; there is no dangling state.
#[derive(Clone)]
pub struct WeakEntity {
    inner: Weak<EntityInner>,
}

impl WeakEntity {
    pub fn upgrade(&self) -> Option<Entity> {
        self.inner.upgrade().map(|inner| Entity { inner })
    }
}

impl fmt::Debug for WeakEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.upgrade() {
            Some(inner) => write!(f, "WeakEntity({})", inner.id),
            None => write!(f, "WeakEntity(<gone>)"),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
