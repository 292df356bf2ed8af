//! # Rewind
//!
//! A memento-based undo/redo history engine for identity-bearing records.
//!
//! ## Core Concepts
//!
//! - **Entities**: mutable records with a stable identifier and a JSON
//!   attribute mapping
//! - **Groups**: ordered collections of entities, addressable by
//!   identifier
//! - **Snapshots**: immutable captured state, grouped into atomic steps
//! - **History**: two LIFO stacks with `save`/`undo`/`redo` plus
//!   `begin`/`end` batching of many edits into one step
//!
//! Callers mutate records directly; the engine only observes state at
//! explicit commit points and restores it on demand, repairing entity
//! references after group membership changes so identity survives
//! remove/re-add cycles.
//!
//! ## Example
//!
//! ```
//! use rewind::{Entity, History};
//! use serde_json::json;
//!
//! let model = Entity::from_serialize("m1", &json!({ "foo": 10 }))?;
//! let mut history = History::new();
//!
//! history.save(&model);
//! model.set("foo", 200);
//! history.save(&model);
//!
//! history.undo();
//! assert_eq!(model.get("foo"), Some(json!(10)));
//!
//! history.redo();
//! assert_eq!(model.get("foo"), Some(json!(200)));
//! # Ok::<(), rewind::HistoryError>(())
//! ```

pub mod error;
pub mod events;
pub mod history;
pub mod records;
pub mod snapshot;
pub mod types;

// Re-exports
pub use error::{HistoryError, Result};
pub use events::{ChangeEvent, EventBus, SubscriptionHandle, SubscriptionId};
pub use history::History;
pub use records::{Entity, Group, WeakEntity, WeakGroup};
pub use snapshot::{EntitySnapshot, GroupSnapshot, Snapshot, Step};
pub use types::{Attributes, EntityId, EntityState, Target};
