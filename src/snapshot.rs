//! Mementos: immutable captured state of one entity or one group.

use crate::records::{Entity, Group, WeakEntity, WeakGroup};
use crate::types::{Attributes, EntityId, EntityState, Target};
use std::fmt;

/// Captured identity and attribute state of a single entity.
pub struct EntitySnapshot {
    target: WeakEntity,
    id: EntityId,
    state: Attributes,
}

impl EntitySnapshot {
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// The captured attribute mapping.
    pub fn state(&self) -> &Attributes {
        &self.state
    }

    /// The live entity this snapshot currently points at, if any.
    pub fn target(&self) -> Option<Entity> {
        self.target.upgrade()
    }
}

/// Captured membership state of a whole group, one entry per member in
/// order. Member identity is resolved at the group level, so there is no
/// single entity reference here.
pub struct GroupSnapshot {
    target: WeakGroup,
    state: Vec<EntityState>,
}

impl GroupSnapshot {
    /// The captured member states, in order.
    pub fn state(&self) -> &[EntityState] {
        &self.state
    }

    /// The live group this snapshot points at, if any.
    pub fn target(&self) -> Option<Group> {
        self.target.upgrade()
    }
}

/// Immutable captured state of one entity or one group.
///
/// The back-reference to the live record is non-owning: restoring a
/// snapshot whose record has been dropped is inert, and the snapshot is
/// retained so [`Snapshot::reference`] can repair the binding if a record
/// with the same identifier comes back.
pub enum Snapshot {
    Entity(EntitySnapshot),
    Group(GroupSnapshot),
}

impl Snapshot {
    /// Capture an entity's current attributes (deep copy).
    pub fn of_entity(entity: &Entity) -> Self {
        Snapshot::Entity(EntitySnapshot {
            target: entity.downgrade(),
            id: entity.id().clone(),
            state: entity.attributes(),
        })
    }

    /// Capture a group's current membership and member attributes.
    pub fn of_group(group: &Group) -> Self {
        Snapshot::Group(GroupSnapshot {
            target: group.downgrade(),
            state: group.state(),
        })
    }

    /// Write the captured state back onto the live record, triggering the
    /// record's normal change notifications. No-op if the record is gone.
    pub fn restore(&self) {
        match self {
            Snapshot::Entity(snapshot) => {
                if let Some(entity) = snapshot.target.upgrade() {
                    entity.set_attributes(snapshot.state.clone());
                }
            }
            Snapshot::Group(snapshot) => {
                if let Some(group) = snapshot.target.upgrade() {
                    group.apply(&snapshot.state);
                }
            }
        }
    }

    /// Rebind an entity snapshot to the live member of `group` carrying
    /// the same identifier.
    ///
    /// Group snapshots are left alone (their identity is the group
    /// itself), and a lookup miss leaves the reference stale -- the
    /// entity is genuinely absent from that group.
    pub fn reference(&mut self, group: &Group) {
        let Snapshot::Entity(snapshot) = self else {
            return;
        };

        if let Some(live) = group.get(&snapshot.id) {
            snapshot.target = live.downgrade();
        }
    }

    /// Whether the live record's state differs from the captured state.
    /// A dropped record counts as unchanged.
    pub fn is_dirty(&self) -> bool {
        match self {
            Snapshot::Entity(snapshot) => snapshot
                .target
                .upgrade()
                .map_or(false, |entity| entity.attributes() != snapshot.state),
            Snapshot::Group(snapshot) => snapshot
                .target
                .upgrade()
                .map_or(false, |group| group.state() != snapshot.state),
        }
    }

    /// Capture the live record's *current* state as a fresh snapshot of
    /// the same kind. `None` if the record is gone.
    pub fn recapture(&self) -> Option<Snapshot> {
        match self {
            Snapshot::Entity(snapshot) => snapshot
                .target
                .upgrade()
                .map(|entity| Snapshot::of_entity(&entity)),
            Snapshot::Group(snapshot) => snapshot
                .target
                .upgrade()
                .map(|group| Snapshot::of_group(&group)),
        }
    }

    /// The live group behind a whole-group snapshot, if still alive.
    pub fn group_target(&self) -> Option<Group> {
        match self {
            Snapshot::Group(snapshot) => snapshot.target.upgrade(),
            Snapshot::Entity(_) => None,
        }
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Snapshot::Entity(snapshot) => write!(f, "Snapshot::Entity({})", snapshot.id),
            Snapshot::Group(snapshot) => {
                write!(f, "Snapshot::Group({} members)", snapshot.state.len())
            }
        }
    }
}

/// One atomic undoable step: the ordered snapshots captured together from
/// a single operand. Order matches the operand; no reordering, no
/// deduplication.
#[derive(Debug, Default)]
pub struct Step {
    snapshots: Vec<Snapshot>,
}

impl Step {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture one snapshot per element of the operand, in order.
    pub fn capture(target: &Target) -> Self {
        let snapshots = match target {
            Target::Entity(entity) => vec![Snapshot::of_entity(entity)],
            Target::Group(group) => vec![Snapshot::of_group(group)],
            Target::Entities(entities) => entities.iter().map(Snapshot::of_entity).collect(),
            Target::Groups(groups) => groups.iter().map(Snapshot::of_group).collect(),
        };
        Step { snapshots }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Snapshot> {
        self.snapshots.iter_mut()
    }

    pub(crate) fn extend(&mut self, snapshots: impl IntoIterator<Item = Snapshot>) {
        self.snapshots.extend(snapshots);
    }
}

impl FromIterator<Snapshot> for Step {
    fn from_iter<I: IntoIterator<Item = Snapshot>>(iter: I) -> Self {
        Step {
            snapshots: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Step {
    type Item = Snapshot;
    type IntoIter = std::vec::IntoIter<Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.into_iter()
    }
}

impl<'a> IntoIterator for &'a Step {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
