//! Change notifications for entities and groups.
//!
//! Each [`Entity`](crate::records::Entity) and [`Group`](crate::records::Group)
//! owns an [`EventBus`]; attribute writes and membership changes are
//! broadcast to subscribers after the fact. The history engine does not
//! listen to these events itself -- it observes state only through
//! explicit `save`/`begin`/`end` calls -- but restores go through the
//! normal setters, so undo and redo produce the same notifications as any
//! other edit.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{ChangeEvent, SubscriptionHandle, SubscriptionId};
