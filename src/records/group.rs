//! Ordered, mutable containers of entities.

use crate::error::{HistoryError, Result};
use crate::events::{ChangeEvent, EventBus, SubscriptionHandle};
use crate::records::Entity;
use crate::types::{EntityId, EntityState};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

struct GroupInner {
    members: RwLock<Vec<Entity>>,
    events: EventBus,
}

/// Shared handle to an ordered collection of entities, addressable by
/// identifier.
///
/// Membership changes (add/remove/apply) emit change notifications on the
/// group's event bus; attribute merges go through the members' own
/// setters and notify there.
#[derive(Clone)]
pub struct Group {
    inner: Arc<GroupInner>,
}

impl Group {
    /// Create a group from the given members, preserving order.
    ///
    /// Fails if two members share an identifier.
    pub fn new(members: Vec<Entity>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entity in &members {
            if !seen.insert(entity.id().clone()) {
                return Err(HistoryError::DuplicateEntity(entity.id().clone()));
            }
        }

        Ok(Self {
            inner: Arc::new(GroupInner {
                members: RwLock::new(members),
                events: EventBus::new(),
            }),
        })
    }

    /// Create a group with no members.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(GroupInner {
                members: RwLock::new(Vec::new()),
                events: EventBus::new(),
            }),
        }
    }

    /// Look up a member by identifier.
    pub fn get(&self, id: &EntityId) -> Option<Entity> {
        self.inner
            .members
            .read()
            .iter()
            .find(|entity| entity.id() == id)
            .cloned()
    }

    /// Member at a position.
    pub fn at(&self, index: usize) -> Option<Entity> {
        self.inner.members.read().get(index).cloned()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.inner
            .members
            .read()
            .iter()
            .any(|entity| entity.id() == id)
    }

    pub fn len(&self) -> usize {
        self.inner.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.members.read().is_empty()
    }

    /// Member handles, in order.
    pub fn entities(&self) -> Vec<Entity> {
        self.inner.members.read().clone()
    }

    /// Member identifiers, in order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.inner
            .members
            .read()
            .iter()
            .map(|entity| entity.id().clone())
            .collect()
    }

    /// Append an entity. Fails if the identifier is already present.
    pub fn add(&self, entity: Entity) -> Result<()> {
        let id = entity.id().clone();

        {
            let mut members = self.inner.members.write();
            if members.iter().any(|member| member.id() == &id) {
                return Err(HistoryError::DuplicateEntity(id));
            }
            members.push(entity);
        }

        self.inner.events.emit(ChangeEvent::EntityAdded { id });
        Ok(())
    }

    /// Remove a member by identifier, returning the detached entity.
    pub fn remove(&self, id: &EntityId) -> Option<Entity> {
        let removed = {
            let mut members = self.inner.members.write();
            members
                .iter()
                .position(|entity| entity.id() == id)
                .map(|index| members.remove(index))
        };

        if removed.is_some() {
            self.inner
                .events
                .emit(ChangeEvent::EntityRemoved { id: id.clone() });
        }
        removed
    }

    /// Full membership state in order, deep-copied.
    pub fn state(&self) -> Vec<EntityState> {
        self.inner.members.read().iter().map(Entity::state).collect()
    }

    /// Merge a captured membership state back into the group.
    ///
    /// Identifiers with a live member keep their object identity and have
    /// the captured attributes merged in; identifiers with no live member
    /// are re-created as fresh entities and appended; members absent from
    /// `states` are removed. Existing member order is preserved, so a
    /// removed-then-restored entity may come back at a different position
    /// than it originally held.
    pub fn apply(&self, states: &[EntityState]) {
        let mut merges: Vec<(Entity, EntityState)> = Vec::new();
        let mut added = Vec::new();
        let mut removed = Vec::new();

        {
            let mut members = self.inner.members.write();

            let keep: HashSet<&EntityId> = states.iter().map(|state| &state.id).collect();
            members.retain(|entity| {
                if keep.contains(entity.id()) {
                    true
                } else {
                    removed.push(entity.id().clone());
                    false
                }
            });

            for state in states {
                match members.iter().find(|entity| entity.id() == &state.id) {
                    Some(entity) => merges.push((entity.clone(), state.clone())),
                    None => {
                        members.push(Entity::new(state.id.clone(), state.attributes.clone()));
                        added.push(state.id.clone());
                    }
                }
            }
        }

        for (entity, state) in merges {
            entity.set_attributes(state.attributes);
        }
        for id in removed {
            self.inner.events.emit(ChangeEvent::EntityRemoved { id });
        }
        for id in added {
            self.inner.events.emit(ChangeEvent::EntityAdded { id });
        }
    }

    /// Subscribe to this group's membership notifications.
    pub fn subscribe(&self) -> SubscriptionHandle {
        self.inner.events.subscribe()
    }

    /// Non-owning handle to this group.
    pub fn downgrade(&self) -> WeakGroup {
        WeakGroup {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same live group.
    pub fn ptr_eq(&self, other: &Group) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group(len={})", self.len())
    }
}

/// Non-owning group handle.
#[derive(Clone)]
pub struct WeakGroup {
    inner: Weak<GroupInner>,
}

impl WeakGroup {
    pub fn upgrade(&self) -> Option<Group> {
        self.inner.upgrade().map(|inner| Group { inner })
    }
}

impl fmt::Debug for WeakGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(group) => write!(f, "WeakGroup(len={})", group.len()),
            None => write!(f, "WeakGroup(<gone>)"),
        }
    }
}
