//! Core types for the history engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::records::{Entity, Group};

/// Attribute mapping for an entity: name to JSON value.
///
/// Values are plain `serde_json` trees, so a `clone` is a deep copy and
/// `==` is structural equality over the whole mapping.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Stable identifier for an entity.
///
/// Identity is immutable for the entity's lifetime; attribute values are
/// not. Two entities with the same identifier are the "same" record even
/// if they are distinct live objects (e.g. after a remove/re-add cycle).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

static NEXT_AUTO_ID: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Generate a fresh process-unique identifier.
    pub fn auto() -> Self {
        EntityId(format!("e{}", NEXT_AUTO_ID.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

/// Captured identity plus attributes of one entity at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub id: EntityId,
    pub attributes: Attributes,
}

/// Operand for a history operation.
///
/// The original duck-typed "model, collection, or array thereof" dispatch
/// is resolved once here, at the API boundary; everything downstream
/// matches on the variant.
#[derive(Clone, Debug)]
pub enum Target {
    Entity(Entity),
    Group(Group),
    Entities(Vec<Entity>),
    Groups(Vec<Group>),
}

impl Target {
    /// An empty list cannot be tracked; scalar operands never count as
    /// empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Target::Entity(_) | Target::Group(_) => false,
            Target::Entities(entities) => entities.is_empty(),
            Target::Groups(groups) => groups.is_empty(),
        }
    }

    /// Number of snapshots a capture of this operand will produce.
    pub fn len(&self) -> usize {
        match self {
            Target::Entity(_) | Target::Group(_) => 1,
            Target::Entities(entities) => entities.len(),
            Target::Groups(groups) => groups.len(),
        }
    }
}

impl From<Entity> for Target {
    fn from(entity: Entity) -> Self {
        Target::Entity(entity)
    }
}

impl From<&Entity> for Target {
    fn from(entity: &Entity) -> Self {
        Target::Entity(entity.clone())
    }
}

impl From<Group> for Target {
    fn from(group: Group) -> Self {
        Target::Group(group)
    }
}

impl From<&Group> for Target {
    fn from(group: &Group) -> Self {
        Target::Group(group.clone())
    }
}

impl From<Vec<Entity>> for Target {
    fn from(entities: Vec<Entity>) -> Self {
        Target::Entities(entities)
    }
}

impl From<&[Entity]> for Target {
    fn from(entities: &[Entity]) -> Self {
        Target::Entities(entities.to_vec())
    }
}

impl From<Vec<Group>> for Target {
    fn from(groups: Vec<Group>) -> Self {
        Target::Groups(groups)
    }
}

impl From<&[Group]> for Target {
    fn from(groups: &[Group]) -> Self {
        Target::Groups(groups.to_vec())
    }
}
