//! The host record framework: identity-bearing entities and ordered
//! groups of entities.
//!
//! The history engine never creates or destroys records on its own. It
//! reads and writes attributes through [`Entity`] handles, observes
//! membership through [`Group`], and holds only non-owning
//! [`WeakEntity`]/[`WeakGroup`] back-references inside snapshots.

mod entity;
mod group;

pub use entity::{Entity, WeakEntity};
pub use group::{Group, WeakGroup};
